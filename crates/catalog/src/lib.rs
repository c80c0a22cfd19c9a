//! Catalog domain module.
//!
//! This crate contains business rules for the product catalog (price and stock
//! edits, deletion, stock deduction for committed bills), implemented purely
//! as deterministic domain logic (no IO, no storage).

pub mod catalog;
pub mod product;

pub use catalog::{
    ApplyBillDeductions, Catalog, CatalogCommand, CatalogEvent, DeleteProduct, EditProduct,
    ProductDeleted, ProductEdited, StockDeducted, StockDeduction,
};
pub use product::{Product, ProductId};
