//! The single predicate shared by the list, summary and chart queries.
//! All three views for one set of query parameters run over the set this
//! filter selects, so they cannot disagree.

use chrono::NaiveDate;
use uuid::Uuid;

use super::period::DateWindow;
use crate::transaction::models::{Transaction, TransactionType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Inclusive date bounds; `None` means all time
    pub window: Option<DateWindow>,
    pub category_id: Option<Uuid>,
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilter {
    pub fn new(window: Option<DateWindow>) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category_id: Option<Uuid>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn with_type(mut self, transaction_type: Option<TransactionType>) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.window.map(|w| w.start)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.window.map(|w| w.end)
    }

    /// True iff `t` lies in the window and matches every present constraint.
    pub fn matches(&self, t: &Transaction) -> bool {
        self.window.map_or(true, |w| w.contains(t.date))
            && self.category_id.map_or(true, |id| t.category_id == id)
            && self
                .transaction_type
                .map_or(true, |kind| t.transaction_type == kind)
    }
}
