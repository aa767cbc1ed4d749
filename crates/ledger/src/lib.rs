//! Durable order ledger for the checkout system.
//!
//! The ledger is the one piece of state the checkout workflow mutates:
//! an append-mostly mapping from order id to [`domain::Order`], with
//! status-only updates after creation. Two backends are provided with
//! the same contract: an in-memory store with per-order mutual
//! exclusion, and a PostgreSQL store that serializes status updates via
//! row locks.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{LedgerError, Result};
pub use memory::InMemoryLedger;
pub use postgres::PostgresLedger;
pub use store::OrderLedger;
