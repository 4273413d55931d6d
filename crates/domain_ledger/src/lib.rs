//! Ledger Domain - Double-Entry Posting Engine
//!
//! This crate owns the chart of accounts and the life of a journal entry,
//! from a proposed set of debit and credit lines to immutable postings.
//!
//! # Components
//!
//! - **Account Registry**: registers accounts per tenant and resolves the
//!   ones a journal line may post to
//! - **Journal Builder**: turns proposed lines into a DRAFT entry with
//!   exact totals
//! - **Balance Validator**: debits must equal credits, to the paisa
//! - **Posting Engine**: drives `DRAFT → VALIDATED → POSTED` and
//!   `DRAFT → REJECTED`, materializing postings, general-ledger rows and
//!   account balances in one commit
//! - **Ledger Queries**: trial balance, account history and reconciliation,
//!   computed from postings
//!
//! # Example
//!
//! ```rust,ignore
//! let entry = engine
//!     .create_entry(
//!         JournalBuilder::new(tenant_id, "JV-0001", "Cash sale")
//!             .debit(cash, dec!(100.00))
//!             .credit(revenue, dec!(100.00)),
//!     )
//!     .await?;
//!
//! engine.validate(tenant_id, entry.id).await?;
//! engine.post(tenant_id, entry.id, None).await?;
//! ```

pub mod account;
pub mod registry;
pub mod journal;
pub mod builder;
pub mod balance;
pub mod posting;
pub mod engine;
pub mod query;
pub mod ports;
pub mod error;
pub mod adapters;

pub use account::{Account, AccountType, NewAccount, PostingType, StandardChart};
pub use registry::AccountRegistry;
pub use journal::{JournalEntry, JournalLine, JournalStatus};
pub use builder::{JournalBuilder, ProposedPosting};
pub use balance::{check_balance, line_totals};
pub use posting::{
    AccountBalance, BalanceDelta, GeneralLedgerEntry, Posting, PostingBatch, PostingSet,
};
pub use engine::{JournalLocks, PostOutcome, PostingEngine};
pub use query::{
    AccountHistory, Discrepancy, DiscrepancySource, HistoryLine, LedgerQueries,
    ReconciliationReport, TrialBalance, TrialBalanceLine,
};
pub use ports::LedgerPort;
pub use error::LedgerError;
pub use adapters::InMemoryLedgerStore;
