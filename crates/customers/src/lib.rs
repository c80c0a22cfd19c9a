//! Customers module.
//!
//! The desk bills a fixed set of named customers; this crate validates names
//! and resolves a raw selection against that directory.

pub mod customer;

pub use customer::{CustomerDirectory, CustomerName};
