use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a cash movement as seen from the user's books.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A single booked income or expense, already converted into the reporting currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(user_id: Uuid, kind: TransactionKind, date: NaiveDate, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            date,
            amount,
            recurring: false,
            category: None,
            notes: None,
        }
    }

    pub fn income(user_id: Uuid, date: NaiveDate, amount: f64) -> Self {
        Self::new(user_id, TransactionKind::Income, date, amount)
    }

    pub fn expense(user_id: Uuid, date: NaiveDate, amount: f64) -> Self {
        Self::new(user_id, TransactionKind::Expense, date, amount)
    }

    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
