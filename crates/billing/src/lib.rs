//! Billing domain module.
//!
//! This crate contains business rules for composing a bill (line items,
//! stock guards, totals), committing it into an immutable `Bill`, and keeping
//! the newest-first bill history. Pure domain logic: no IO, no storage.

pub mod bill;
pub mod draft;
pub mod history;

pub use bill::{Bill, BillId, BillItem};
pub use draft::{
    AddItem, BillCommitted, BillDraft, CommitBill, DraftCommand, DraftEvent, ItemAdded,
    ItemRemoved, RemoveItem, StockPolicy,
};
pub use history::BillHistory;
