//! In-memory cache of the server-side transaction collection.
//!
//! The server is the only durable store: a ledger is discarded and
//! refetched on each authenticated session load. Mutation goes through
//! verified local deltas -- `add` appends the authoritative record the
//! server returned, `remove` drops the row only after the server
//! acknowledged the delete. A failed call leaves the collection exactly
//! as it was.

use crate::error::Result;
use crate::export;
use crate::models::{Transaction, TransactionDraft};
use crate::pipeline::{self, CategoryShare, Filter, SortKey, SortOrder, Summary};
use crate::queries::transactions::TransactionQuery;

/// The client-side transaction collection and its derived views.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// An empty ledger, for callers that want to populate lazily.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the authenticated user's collection and build a ledger over it.
    pub fn load(query: &TransactionQuery<'_>) -> Result<Self> {
        Ok(Self {
            transactions: query.list()?,
        })
    }

    /// Re-fetch the collection wholesale.
    ///
    /// On failure the previous contents are kept; the view never silently
    /// resets to empty.
    pub fn refresh(&mut self, query: &TransactionQuery<'_>) -> Result<()> {
        self.transactions = query.list()?;
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    // -- Mutation ----------------------------------------------------------

    /// Create a transaction remotely, then append the authoritative record
    /// the server returned.
    pub fn add(
        &mut self,
        query: &TransactionQuery<'_>,
        draft: &TransactionDraft,
    ) -> Result<Transaction> {
        let created = query.create(draft)?;
        self.transactions.push(created.clone());
        Ok(created)
    }

    /// Delete a transaction remotely, then drop the local row.
    ///
    /// Returns whether a row was removed. An id absent from the collection
    /// is a local no-op: nothing to delete, no request sent, no error.
    pub fn remove(&mut self, query: &TransactionQuery<'_>, id: &str) -> Result<bool> {
        if !self.transactions.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        query.delete(id)?;
        self.transactions.retain(|t| t.id != id);
        Ok(true)
    }

    // -- Derived views -----------------------------------------------------

    /// The filtered, sorted view for display and export.
    pub fn view(&self, filter: &Filter, key: SortKey, order: SortOrder) -> Vec<Transaction> {
        let mut view = pipeline::filter_transactions(&self.transactions, filter);
        pipeline::sort_transactions(&mut view, key, order);
        view
    }

    /// Summary totals over the full, unfiltered collection.
    pub fn summary(&self) -> Summary {
        pipeline::summarize(&self.transactions)
    }

    /// Per-category expense breakdown over the full collection.
    pub fn breakdown(&self) -> Vec<CategoryShare> {
        pipeline::category_breakdown(&self.transactions)
    }

    /// CSV of the filtered + sorted view.
    pub fn export_csv(&self, filter: &Filter, key: SortKey, order: SortOrder) -> Result<String> {
        export::to_csv_string(&self.view(filter, key, order))
    }
}
