//! Query modules for the Agakayi SDK.
//!
//! Each module provides a query struct that borrows from an
//! [`AgakayiSdk`](crate::AgakayiSdk) and exposes methods returning
//! `Result<T>` with typed model payloads.

pub mod auth;
pub mod transactions;

pub use auth::AuthQuery;
pub use transactions::TransactionQuery;
