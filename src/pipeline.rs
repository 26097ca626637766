//! Pure filter, sort and aggregate transforms over an in-memory
//! transaction collection.
//!
//! Everything here is synchronous and stateless: the same input always
//! produces the same derived view. The ledger hands the full collection
//! to the aggregates (summary cards ignore the active filter) and the
//! filtered view to display and export.

use crate::error::AgakayiError;
use crate::models::{Category, Transaction};
use std::collections::HashMap;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Filter predicates over the collection.
///
/// A predicate left `None` always holds, so the default filter is an
/// identity on membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub category: Option<Category>,
    /// Inclusive lower date bound (ISO 8601, compared lexicographically).
    pub date_from: Option<String>,
    /// Inclusive upper date bound.
    pub date_to: Option<String>,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.date_from.is_none() && self.date_to.is_none()
    }

    /// A record passes when every active predicate holds.
    pub fn matches(&self, t: &Transaction) -> bool {
        if let Some(category) = self.category {
            if t.category != category {
                return false;
            }
        }
        if let Some(from) = &self.date_from {
            if t.date.as_str() < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.date_to {
            if t.date.as_str() > to.as_str() {
                return false;
            }
        }
        true
    }
}

/// Retain the records satisfying the filter, preserving input order.
pub fn filter_transactions(transactions: &[Transaction], filter: &Filter) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Title,
}

impl FromStr for SortKey {
    type Err = AgakayiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "title" => Ok(SortKey::Title),
            _ => Err(AgakayiError::Validation(format!("unknown sort key: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = AgakayiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AgakayiError::Validation(format!("unknown sort order: {s}"))),
        }
    }
}

/// Sort in place by the given key and order.
///
/// The sort is stable: records with equal keys keep their input order in
/// either direction (descending reverses the comparator, not the slice).
/// The `Amount` key compares absolute values, so a -50 expense outranks a
/// 30 income no matter the stored sign; `Date` and `Title` compare the
/// raw field.
pub fn sort_transactions(transactions: &mut [Transaction], key: SortKey, order: SortOrder) {
    transactions.sort_by(|a, b| {
        let ord = match key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.magnitude().total_cmp(&b.magnitude()),
            SortKey::Title => a.title.cmp(&b.title),
        };
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// The three summary-card reductions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Sum of amounts over income records.
    pub total_income: f64,
    /// Sum of magnitudes over expense records.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub balance: f64,
}

/// Reduce a collection to its summary. Callers pass the unfiltered
/// collection; the summary cards ignore the active filter.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let total_income: f64 = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum();
    let total_expenses: f64 = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.magnitude())
        .sum();
    Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
    }
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

/// One category's share of total expenses, for chart rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: f64,
    /// Share of the expense total, 0..=100.
    pub percentage: f64,
}

/// Group expense records by category and compute each group's share of
/// the expense total.
///
/// Sorted descending by amount, ties broken by category name so the
/// output is deterministic. With no expenses the breakdown is empty --
/// never a division by zero.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryShare> {
    let mut totals: HashMap<Category, f64> = HashMap::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        *totals.entry(t.category).or_insert(0.0) += t.magnitude();
    }

    let total: f64 = totals.values().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            percentage: amount / total * 100.0,
        })
        .collect();

    shares.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    shares
}
