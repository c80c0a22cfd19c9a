//! `billdesk-desk`: the application layer the UI shell talks to.
//!
//! A [`BillingDesk`] owns the catalog, the bill under composition, the
//! customer directory and the bill history, and exposes typed operations for
//! each user action (edit, delete, add line, remove line, generate bill).

pub mod config;
pub mod desk;
pub mod seed;
pub mod view;

pub use config::DeskConfig;
pub use desk::BillingDesk;
pub use seed::SeedProfile;
pub use view::{BillSummary, DeskSnapshot, PendingLine, ProductView};
