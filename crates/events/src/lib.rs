//! Domain events emitted by the catalog and billing aggregates.

pub mod event;

pub use event::Event;
