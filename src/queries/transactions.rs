//! Transaction repository calls against the REST endpoints.
//!
//! Every operation requires a valid session token; the wire's decimal and
//! id quirks are normalized here so the rest of the crate only ever sees
//! canonical [`Transaction`] records.

use crate::config;
use crate::error::Result;
use crate::models::{Transaction, TransactionDraft};

// ---------------------------------------------------------------------------
// TransactionQuery
// ---------------------------------------------------------------------------

/// Repository interface bound to an SDK instance.
pub struct TransactionQuery<'a> {
    sdk: &'a crate::AgakayiSdk,
}

impl<'a> TransactionQuery<'a> {
    /// Create a new `TransactionQuery` bound to the given SDK.
    pub fn new(sdk: &'a crate::AgakayiSdk) -> Self {
        Self { sdk }
    }

    // -- List --------------------------------------------------------------

    /// Fetch all transactions belonging to the authenticated owner.
    ///
    /// Amounts arrive as numbers, numeric strings or wrapped decimals;
    /// all are normalized to `f64`, and the sign is reconciled with the
    /// type tag (expenses negative, income positive).
    pub fn list(&self) -> Result<Vec<Transaction>> {
        let token = self.sdk.token()?;
        let mut rows: Vec<Transaction> = self
            .sdk
            .client()
            .get_json(config::TRANSACTIONS_PATH, &token)?;
        for t in &mut rows {
            t.reconcile_sign();
        }
        Ok(rows)
    }

    // -- Create ------------------------------------------------------------

    /// Create a transaction from a draft.
    ///
    /// Validates client-side first -- a non-positive or non-finite amount
    /// never reaches the network. The payload carries the positive
    /// magnitude (sign is a presentation concern); the server assigns id
    /// and owner, and its record is returned normalized.
    pub fn create(&self, draft: &TransactionDraft) -> Result<Transaction> {
        draft.validate()?;
        let token = self.sdk.token()?;

        let payload = TransactionDraft {
            amount: draft.amount.abs(),
            ..draft.clone()
        };
        let mut created: Transaction =
            self.sdk
                .client()
                .post_json(config::TRANSACTIONS_PATH, Some(&token), &payload)?;
        created.reconcile_sign();
        Ok(created)
    }

    // -- Delete ------------------------------------------------------------

    /// Delete a transaction by id.
    ///
    /// Failure leaves all local state unchanged; the ledger only applies
    /// the removal after this returns `Ok`.
    pub fn delete(&self, id: &str) -> Result<()> {
        let token = self.sdk.token()?;
        self.sdk
            .client()
            .delete(&format!("{}/{}", config::TRANSACTIONS_PATH, id), &token)
    }
}
