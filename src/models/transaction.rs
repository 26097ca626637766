use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AgakayiError, Result};

// ---------------------------------------------------------------------------
// Category — fixed classification tags
// ---------------------------------------------------------------------------

/// Fixed category set understood by the Agakayi API.
///
/// Serialized capitalized (`"Food"`, `"Salary"`, ...) to match the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Salary,
    Freelance,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Salary,
        Category::Freelance,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AgakayiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "transport" => Ok(Category::Transport),
            "entertainment" => Ok(Category::Entertainment),
            "salary" => Ok(Category::Salary),
            "freelance" => Ok(Category::Freelance),
            "other" => Ok(Category::Other),
            _ => Err(AgakayiError::Validation(format!("unknown category: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Whether a transaction adds to or subtracts from the balance.
///
/// Determines the sign convention: income amounts are positive, expense
/// amounts negative. Serialized lowercase (`"income"` / `"expense"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = AgakayiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(AgakayiError::Validation(format!(
                "unknown transaction type: {s}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction — the canonical in-memory record
// ---------------------------------------------------------------------------

/// A single income or expense record owned by one user.
///
/// The server is the source of truth: ids and the owner reference are
/// assigned remotely and immutable here. The wire shape is messier than
/// this struct — MongoDB-style `_id` keys and wrapped decimal amounts are
/// normalized during deserialization, and [`reconcile_sign`](Self::reconcile_sign)
/// forces the amount sign to agree with the type tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// ISO 8601 calendar date (`YYYY-MM-DD`). Compared lexicographically.
    pub date: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Absolute value of the amount. Aggregation re-derives magnitude from
    /// here rather than trusting the stored sign.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Force the stored sign to agree with the type tag: expenses negative,
    /// income positive. The backend may return unsigned magnitudes.
    pub fn reconcile_sign(&mut self) {
        self.amount = match self.kind {
            TransactionType::Income => self.amount.abs(),
            TransactionType::Expense => -self.amount.abs(),
        };
    }
}

/// Accept every decimal encoding the API is known to emit: a plain JSON
/// number, a numeric string, or a wrapped `{"$numberDecimal": "..."}`
/// object.
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    wire_amount(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("unsupported amount encoding: {value}")))
}

fn wire_amount(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Object(map) => map.get("$numberDecimal").and_then(wire_amount),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// TransactionDraft — client-composed create payload
// ---------------------------------------------------------------------------

/// Payload for creating a transaction.
///
/// The amount is a positive magnitude regardless of type — the sign
/// convention is a presentation concern, not part of the wire contract.
/// The server assigns the id and owner reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: Category,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TransactionDraft {
    /// Client-side validation, run before any network traffic.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AgakayiError::Validation(
                "title must not be empty".to_string(),
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AgakayiError::Validation(
                "amount must be a positive number".to_string(),
            ));
        }
        if self.date.trim().is_empty() {
            return Err(AgakayiError::Validation("date is required".to_string()));
        }
        Ok(())
    }
}
