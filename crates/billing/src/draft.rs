use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use billdesk_catalog::{Product, ProductId};
use billdesk_core::{Aggregate, AggregateId, AggregateRoot, DomainError, Entity, Money};
use billdesk_customers::CustomerName;
use billdesk_events::Event;

use crate::bill::{Bill, BillId, BillItem};

/// How `AddItem` measures a quantity against the catalog's stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// Lines already on the bill reserve their quantity: a new line is
    /// accepted only if `pending + quantity <= stock`.
    #[default]
    Reserve,
    /// Each line is checked on its own (`quantity <= stock`). A bill can then
    /// hold more of a product than is in stock; the catalog refuses it at commit.
    Recheck,
}

impl core::str::FromStr for StockPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reserve" => Ok(StockPolicy::Reserve),
            "recheck" => Ok(StockPolicy::Recheck),
            other => Err(DomainError::validation(format!(
                "unknown stock policy {other:?} (expected \"reserve\" or \"recheck\")"
            ))),
        }
    }
}

impl core::fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockPolicy::Reserve => f.write_str("reserve"),
            StockPolicy::Recheck => f.write_str("recheck"),
        }
    }
}

/// Aggregate root: the bill under composition.
///
/// Two states: composing (collecting lines) and committed. Committing emits
/// `BillCommitted`, whose application empties the line list, so the draft is
/// immediately composing a fresh bill again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillDraft {
    id: AggregateId,
    policy: StockPolicy,
    items: Vec<BillItem>,
    committed: u64,
    version: u64,
}

impl BillDraft {
    pub fn new(id: AggregateId, policy: StockPolicy) -> Self {
        Self {
            id,
            policy,
            items: Vec::new(),
            committed: 0,
            version: 0,
        }
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    pub fn items(&self) -> &[BillItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of bills committed from this draft so far.
    pub fn committed_count(&self) -> u64 {
        self.committed
    }

    /// Quantity of `product_id` across all pending lines, saturating at `i64::MAX`.
    pub fn pending_quantity(&self, product_id: &ProductId) -> i64 {
        self.items
            .iter()
            .filter(|item| &item.product_id == product_id)
            .fold(0i64, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of the pending line totals (zero for an empty draft).
    pub fn total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::ZERO, |acc, item| acc.saturating_add(item.total()))
    }
}

impl AggregateRoot for BillDraft {
    type Id = AggregateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
///
/// Carries the product's price and stock as read from the catalog when the
/// user picked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
    pub available_stock: i64,
    pub occurred_at: DateTime<Utc>,
}

impl AddItem {
    pub fn for_product(product: &Product, quantity: i64, occurred_at: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id().clone(),
            quantity,
            unit_price: product.price(),
            available_stock: product.stock(),
            occurred_at,
        }
    }
}

/// Command: RemoveItem (by position in the line list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub index: usize,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CommitBill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitBill {
    pub bill_id: BillId,
    /// Raw selector value; empty means no customer was chosen.
    pub customer: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    CommitBill(CommitBill),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: BillItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub index: usize,
    pub item: BillItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BillCommitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillCommitted {
    pub bill: Bill,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftEvent {
    ItemAdded(ItemAdded),
    ItemRemoved(ItemRemoved),
    BillCommitted(BillCommitted),
}

impl Event for DraftEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DraftEvent::ItemAdded(_) => "billing.draft.item_added",
            DraftEvent::ItemRemoved(_) => "billing.draft.item_removed",
            DraftEvent::BillCommitted(_) => "billing.bill.committed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DraftEvent::ItemAdded(e) => e.occurred_at,
            DraftEvent::ItemRemoved(e) => e.occurred_at,
            DraftEvent::BillCommitted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for BillDraft {
    type Command = DraftCommand;
    type Event = DraftEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DraftEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            DraftEvent::ItemRemoved(e) => {
                if e.index < self.items.len() {
                    self.items.remove(e.index);
                }
            }
            DraftEvent::BillCommitted(_) => {
                self.items.clear();
                self.committed += 1;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DraftCommand::AddItem(cmd) => self.handle_add(cmd),
            DraftCommand::RemoveItem(cmd) => self.handle_remove(cmd),
            DraftCommand::CommitBill(cmd) => self.handle_commit(cmd),
        }
    }
}

impl BillDraft {
    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<DraftEvent>, DomainError> {
        if cmd.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        if cmd.unit_price.is_zero() {
            return Err(DomainError::validation("unit_price must be positive"));
        }

        let requested = match self.policy {
            StockPolicy::Reserve => self
                .pending_quantity(&cmd.product_id)
                .checked_add(cmd.quantity),
            StockPolicy::Recheck => Some(cmd.quantity),
        };
        match requested {
            Some(requested) if requested <= cmd.available_stock => {}
            _ => {
                return Err(DomainError::validation(format!(
                    "insufficient stock for product {} (adding {}, pending {}, available {})",
                    cmd.product_id,
                    cmd.quantity,
                    self.pending_quantity(&cmd.product_id),
                    cmd.available_stock
                )));
            }
        }

        let line_total = cmd
            .unit_price
            .checked_mul(cmd.quantity)
            .ok_or_else(|| DomainError::validation("line total out of range"))?;
        let pending_totals = self.items.iter().map(BillItem::total);
        if Money::checked_sum(pending_totals.chain([line_total])).is_none() {
            return Err(DomainError::validation("bill total out of range"));
        }

        Ok(vec![DraftEvent::ItemAdded(ItemAdded {
            item: BillItem {
                product_id: cmd.product_id.clone(),
                quantity: cmd.quantity,
                unit_price: cmd.unit_price,
            },
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Result<Vec<DraftEvent>, DomainError> {
        let item = self
            .items
            .get(cmd.index)
            .ok_or_else(|| DomainError::not_found(format!("bill line {}", cmd.index)))?;

        Ok(vec![DraftEvent::ItemRemoved(ItemRemoved {
            index: cmd.index,
            item: item.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_commit(&self, cmd: &CommitBill) -> Result<Vec<DraftEvent>, DomainError> {
        if self.items.is_empty() {
            return Err(DomainError::validation("cannot commit a bill without items"));
        }
        let customer = CustomerName::new(&cmd.customer)?;

        let bill = Bill::new(cmd.bill_id, self.items.clone(), customer, cmd.occurred_at)?;

        Ok(vec![DraftEvent::BillCommitted(BillCommitted {
            bill,
            occurred_at: cmd.occurred_at,
        })])
    }
}
