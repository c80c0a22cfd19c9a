use std::collections::VecDeque;

use crate::bill::{Bill, BillId};

/// Committed bills, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillHistory {
    bills: VecDeque<Bill>,
}

impl BillHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a freshly committed bill.
    pub fn record(&mut self, bill: Bill) {
        self.bills.push_front(bill);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bill> {
        self.bills.iter()
    }

    pub fn latest(&self) -> Option<&Bill> {
        self.bills.front()
    }

    pub fn get(&self, id: BillId) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id() == id)
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }
}
