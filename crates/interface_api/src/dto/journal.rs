//! Journal entry DTOs
//!
//! Totals, status and `isBalanced` are never read from the client; unknown
//! fields in the body are ignored.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use core_kernel::TenantId;
use domain_ledger::{JournalBuilder, ProposedPosting};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalEntryRequest {
    pub tenant_id: TenantId,
    #[validate(length(min = 1, max = 50))]
    pub entry_number: String,
    pub entry_date: Option<NaiveDate>,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub lines: Vec<ProposedPosting>,
}

impl From<CreateJournalEntryRequest> for JournalBuilder {
    fn from(req: CreateJournalEntryRequest) -> Self {
        let builder = JournalBuilder::new(req.tenant_id, req.entry_number, req.description)
            .lines(req.lines);
        match req.entry_date {
            Some(date) => builder.dated(date),
            None => builder,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RejectJournalEntryRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Optional body of `POST /journal-entries/{id}/post`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostJournalEntryRequest {
    /// Lines the caller expects to be posted; defaults to the entry's own
    pub posting_set: Option<Vec<ProposedPosting>>,
}
