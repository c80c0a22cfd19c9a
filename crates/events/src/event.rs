use chrono::{DateTime, Utc};

/// A domain event.
///
/// Events are immutable facts returned by an aggregate's `handle` and fed back
/// through `apply`. The desk logs every applied event with all three fields.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "catalog.product.edited").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
