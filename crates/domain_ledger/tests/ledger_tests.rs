//! Posting engine and ledger query tests over the in-memory stores

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{AccountId, JournalEntryId, TenantId, TenantScope};
use domain_ledger::{
    Account, AccountRegistry, AccountType, InMemoryLedgerStore, JournalBuilder, JournalStatus,
    LedgerError, LedgerPort, LedgerQueries, NewAccount, PostingEngine, ProposedPosting,
};
use domain_tenant::Tenant;
use test_utils::{
    assert_amount_eq, assert_entry_balanced, assert_reconciled, assert_status,
    assert_trial_balance_nets_to_zero, balanced_transfers_strategy, excess_precision_strategy,
    ledger_amount_strategy, AmountFixtures, GstinFixtures, TestBooks, TestServices,
};

struct Books {
    services: TestServices,
    chart: TestBooks,
    store: Arc<InMemoryLedgerStore>,
    registry: AccountRegistry,
    engine: PostingEngine,
    queries: LedgerQueries,
    tenant: Tenant,
    cash: Account,
    revenue: Account,
    expense: Account,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn books() -> Books {
    let services = TestServices::new();
    let chart = services.books(GstinFixtures::primary()).await;

    Books {
        store: services.ledger_store.clone(),
        registry: services.registry.clone(),
        engine: services.engine.clone(),
        queries: services.queries.clone(),
        tenant: chart.tenant.clone(),
        cash: chart.cash.clone(),
        revenue: chart.sales.clone(),
        expense: chart.rent.clone(),
        services,
        chart,
    }
}

impl Books {
    fn sale(&self, number: &str, amount: Decimal) -> JournalBuilder {
        JournalBuilder::new(self.tenant.id, number, "Cash sale")
            .dated(date(2024, 6, 1))
            .debit(self.cash.id, amount)
            .credit(self.revenue.id, amount)
    }

    async fn posted_sale(&self, number: &str, amount: Decimal) -> JournalEntryId {
        let entry = self.services.post(self.sale(number, amount)).await;
        assert_entry_balanced(&entry);
        entry.id
    }
}

mod registry {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let books = books().await;
        let result = books
            .registry
            .register(NewAccount::new(books.tenant.id, "1000", "Petty Cash", AccountType::Asset))
            .await;
        assert!(matches!(result, Err(LedgerError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unknown_tenant_not_found() {
        let books = books().await;
        let result = books
            .registry
            .register(NewAccount::new(TenantId::new(), "1000", "Cash", AccountType::Asset))
            .await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_other_tenants_account_is_not_found() {
        let books = books().await;
        let result = books.registry.resolve(TenantId::new(), books.cash.id).await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_archived_account_is_not_postable() {
        let books = books().await;
        books.registry.archive(books.tenant.id, books.cash.id).await.unwrap();
        let result = books.registry.resolve_postable(books.tenant.id, books.cash.id).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert!(books.registry.resolve(books.tenant.id, books.cash.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_seed_standard_chart_requires_empty_chart() {
        let books = books().await;
        let result = books.registry.seed_standard_chart(books.tenant.id).await;
        assert!(matches!(result, Err(LedgerError::Conflict(_))));
    }
}

mod builder {
    use super::*;

    #[tokio::test]
    async fn test_builds_draft_with_totals_and_line_numbers() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();

        assert_eq!(entry.status, JournalStatus::Draft);
        assert_eq!(entry.total_debit, dec!(100.00));
        assert_eq!(entry.total_credit, dec!(100.00));
        assert_eq!(entry.lines[0].line_number, 1);
        assert_eq!(entry.lines[1].line_number, 2);
        assert_eq!(entry.lines[0].amount.scale(), 2);
    }

    #[tokio::test]
    async fn test_empty_lines_rejected() {
        let books = books().await;
        let builder = JournalBuilder::new(books.tenant.id, "JV-1", "Nothing");
        let result = books.engine.create_entry(builder).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let books = books().await;
        let result = books.engine.create_entry(books.sale("JV-1", dec!(0))).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sub_paisa_amount_rejected() {
        let books = books().await;
        let result = books.engine.create_entry(books.sale("JV-1", dec!(10.005))).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_amount_past_ledger_range_rejected() {
        let books = books().await;
        let result = books
            .engine
            .create_entry(books.sale("JV-1", dec!(1000000000000000000)))
            .await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_totals_past_ledger_range_rejected() {
        let books = books().await;
        let builder = JournalBuilder::new(books.tenant.id, "JV-1", "Split sale")
            .debit(books.cash.id, dec!(60000000000000000))
            .debit(books.cash.id, dec!(60000000000000000))
            .credit(books.revenue.id, dec!(60000000000000000))
            .credit(books.revenue.id, dec!(60000000000000000));
        let result = books.engine.create_entry(builder).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_account_not_found() {
        let books = books().await;
        let builder = JournalBuilder::new(books.tenant.id, "JV-1", "Typo")
            .debit(AccountId::new(), dec!(10))
            .credit(books.revenue.id, dec!(10));
        let result = books.engine.create_entry(builder).await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_blank_entry_number_rejected() {
        let books = books().await;
        let result = books.engine.create_entry(books.sale("  ", dec!(10))).await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_entry_date_defaults_to_tenant_today() {
        let books = books().await;
        let builder = JournalBuilder::new(books.tenant.id, "JV-1", "Undated")
            .debit(books.cash.id, dec!(1))
            .credit(books.revenue.id, dec!(1));
        let entry = books.engine.create_entry(builder).await.unwrap();
        assert_eq!(entry.entry_date, books.tenant.today());
    }
}

mod workflow {
    use super::*;

    #[tokio::test]
    async fn test_balanced_entry_validates() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        let validated = books.engine.validate(books.tenant.id, entry.id).await.unwrap();
        assert_eq!(validated.status, JournalStatus::Validated);
        assert!(validated.is_balanced);
    }

    #[tokio::test]
    async fn test_unbalanced_entry_stays_draft() {
        let books = books().await;
        let builder = JournalBuilder::new(books.tenant.id, "JV-1", "Short credit")
            .debit(books.cash.id, AmountFixtures::cash_sale())
            .credit(books.revenue.id, AmountFixtures::short_credit());
        let entry = books.engine.create_entry(builder).await.unwrap();

        let err = books.engine.validate(books.tenant.id, entry.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Unbalanced { difference } if difference == dec!(10)));
        assert_eq!(err.to_string(), "Unbalanced journal entry: debit minus credit is 10.00");

        let stored = books.engine.get(books.tenant.id, entry.id).await.unwrap();
        assert_status(&stored, JournalStatus::Draft);
        assert!(!stored.is_balanced);
    }

    #[tokio::test]
    async fn test_posting_a_draft_is_invalid() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        let err = books.engine.post(books.tenant.id, entry.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidTransition { from: JournalStatus::Draft, to: JournalStatus::Posted }
        ));
        assert!(books.store.postings_for_journal(books.tenant.id, entry.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_entry_cannot_be_posted_or_validated() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        let rejected = books
            .engine
            .reject(books.tenant.id, entry.id, "duplicate voucher")
            .await
            .unwrap();
        assert_eq!(rejected.status, JournalStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("duplicate voucher"));

        assert!(matches!(
            books.engine.post(books.tenant.id, entry.id, None).await,
            Err(LedgerError::InvalidTransition { .. })
        ));
        assert!(matches!(
            books.engine.validate(books.tenant.id, entry.id).await,
            Err(LedgerError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        assert!(matches!(
            books.engine.reject(books.tenant.id, entry.id, " ").await,
            Err(LedgerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_post_materializes_everything() {
        let books = books().await;
        let id = books.posted_sale("JV-1", dec!(100)).await;

        let entry = books.engine.get(books.tenant.id, id).await.unwrap();
        assert_status(&entry, JournalStatus::Posted);
        assert!(entry.posted_at.is_some());

        let postings = books.engine.postings(books.tenant.id, id).await.unwrap();
        assert_eq!(postings.len(), 2);
        assert!(postings.iter().all(|p| p.sequence > 0));

        let ledger = books
            .store
            .list_general_ledger(TenantScope::Tenant(books.tenant.id))
            .await
            .unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.iter().all(|r| r.is_posted && r.journal_id == id));

        let cash = books.queries.account_balance(books.tenant.id, books.cash.id).await.unwrap();
        let revenue = books.queries.account_balance(books.tenant.id, books.revenue.id).await.unwrap();
        assert_amount_eq(cash.balance, dec!(100));
        assert_amount_eq(revenue.balance, dec!(100));
    }

    #[tokio::test]
    async fn test_repost_is_idempotent() {
        let books = books().await;
        let id = books.posted_sale("JV-1", dec!(100)).await;

        let again = books.engine.post(books.tenant.id, id, None).await.unwrap();
        assert!(again.was_already_posted());

        let same_set = vec![
            ProposedPosting::credit(books.revenue.id, dec!(100.00)),
            ProposedPosting::debit(books.cash.id, dec!(100)),
        ];
        let again = books.engine.post(books.tenant.id, id, Some(same_set)).await.unwrap();
        assert!(again.was_already_posted());

        assert_eq!(books.engine.postings(books.tenant.id, id).await.unwrap().len(), 2);
        let cash = books.queries.account_balance(books.tenant.id, books.cash.id).await.unwrap();
        assert_eq!(cash.balance, dec!(100));
    }

    #[tokio::test]
    async fn test_repost_with_different_set_conflicts() {
        let books = books().await;
        let id = books.posted_sale("JV-1", dec!(100)).await;

        let different = vec![
            ProposedPosting::debit(books.cash.id, dec!(200)),
            ProposedPosting::credit(books.revenue.id, dec!(200)),
        ];
        let err = books.engine.post(books.tenant.id, id, Some(different)).await.unwrap_err();
        assert!(matches!(err, LedgerError::ConflictingRepost(_)));
    }

    #[tokio::test]
    async fn test_mismatched_set_on_first_post_is_validation_error() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        books.engine.validate(books.tenant.id, entry.id).await.unwrap();

        let different = vec![
            ProposedPosting::debit(books.expense.id, dec!(100)),
            ProposedPosting::credit(books.revenue.id, dec!(100)),
        ];
        let err = books.engine.post(books.tenant.id, entry.id, Some(different)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let stored = books.engine.get(books.tenant.id, entry.id).await.unwrap();
        assert_eq!(stored.status, JournalStatus::Validated);
    }

    #[tokio::test]
    async fn test_failed_post_leaves_entry_validated_with_reason() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        books.engine.validate(books.tenant.id, entry.id).await.unwrap();
        books.registry.archive(books.tenant.id, books.revenue.id).await.unwrap();

        let err = books.engine.post(books.tenant.id, entry.id, None).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let stored = books.engine.get(books.tenant.id, entry.id).await.unwrap();
        assert_eq!(stored.status, JournalStatus::Validated);
        assert!(stored.failure_reason.as_deref().unwrap_or_default().contains("archived"));
        assert!(books.engine.postings(books.tenant.id, entry.id).await.unwrap().is_empty());
        assert!(books
            .store
            .account_balances(books.tenant.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_balance_past_ledger_range_writes_nothing() {
        let books = books().await;
        let mut near_limit = books.queries.account_balance(books.tenant.id, books.cash.id).await.unwrap();
        near_limit.debit_total = dec!(99999999999999950.00);
        books.store.overwrite_balance(near_limit).await;

        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        books.engine.validate(books.tenant.id, entry.id).await.unwrap();
        let err = books.engine.post(books.tenant.id, entry.id, None).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let stored = books.engine.get(books.tenant.id, entry.id).await.unwrap();
        assert_eq!(stored.status, JournalStatus::Validated);
        assert!(stored.failure_reason.is_some());
        assert!(books.engine.postings(books.tenant.id, entry.id).await.unwrap().is_empty());
        assert!(books
            .store
            .list_general_ledger(TenantScope::Tenant(books.tenant.id))
            .await
            .unwrap()
            .is_empty());

        let balances = books.store.account_balances(books.tenant.id).await.unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].debit_total, dec!(99999999999999950.00));
    }

    #[tokio::test]
    async fn test_other_tenant_cannot_post() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        books.engine.validate(books.tenant.id, entry.id).await.unwrap();
        let err = books.engine.post(TenantId::new(), entry.id, None).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_posts_write_once() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        books.engine.validate(books.tenant.id, entry.id).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = books.engine.clone();
            let tenant_id = books.tenant.id;
            let id = entry.id;
            handles.push(tokio::spawn(async move { engine.post(tenant_id, id, None).await }));
        }

        let mut posted = 0;
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            if !outcome.was_already_posted() {
                posted += 1;
            }
        }
        assert_eq!(posted, 1);
        assert_eq!(books.engine.postings(books.tenant.id, entry.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_version_is_refused_by_store() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        books.engine.validate(books.tenant.id, entry.id).await.unwrap();

        let result = books.store.save_journal(&entry, entry.version).await;
        assert!(result.unwrap_err().is_conflict());
    }
}

mod queries {
    use super::*;

    #[tokio::test]
    async fn test_trial_balance_after_sales() {
        let books = books().await;
        books.posted_sale("JV-1", dec!(100)).await;
        books.posted_sale("JV-2", dec!(250.50)).await;

        let tb = books.queries.trial_balance(books.tenant.id, date(2024, 12, 31)).await.unwrap();
        assert!(tb.is_balanced);
        assert_eq!(tb.total_debit, dec!(350.50));
        assert_eq!(tb.total_credit, dec!(350.50));
        assert_eq!(tb.net_total(), Decimal::ZERO);
        assert_eq!(tb.lines.len(), 2);
        assert_eq!(tb.lines[0].account_code, "1000");
        assert_eq!(tb.lines[0].net, dec!(350.50));
        assert_eq!(tb.lines[1].net, dec!(-350.50));
    }

    #[tokio::test]
    async fn test_trial_balance_respects_as_of() {
        let books = books().await;
        books.posted_sale("JV-1", dec!(100)).await;

        let tb = books.queries.trial_balance(books.tenant.id, date(2024, 5, 31)).await.unwrap();
        assert!(tb.lines.is_empty());
        assert!(tb.is_balanced);
    }

    #[tokio::test]
    async fn test_unposted_entries_do_not_count() {
        let books = books().await;
        let entry = books.engine.create_entry(books.sale("JV-1", dec!(100))).await.unwrap();
        books.engine.validate(books.tenant.id, entry.id).await.unwrap();

        let tb = books.queries.trial_balance(books.tenant.id, date(2024, 12, 31)).await.unwrap();
        assert!(tb.lines.is_empty());
    }

    #[tokio::test]
    async fn test_account_history_running_balance() {
        let books = books().await;
        books.posted_sale("JV-1", dec!(100)).await;

        let rent = JournalBuilder::new(books.tenant.id, "JV-2", "June rent")
            .dated(date(2024, 6, 2))
            .debit(books.expense.id, dec!(30))
            .credit(books.cash.id, dec!(30));
        let rent = books.engine.create_entry(rent).await.unwrap();
        books.engine.validate(books.tenant.id, rent.id).await.unwrap();
        books.engine.post(books.tenant.id, rent.id, None).await.unwrap();

        let history = books
            .queries
            .account_history(books.tenant.id, books.cash.id, None)
            .await
            .unwrap();
        let running: Vec<_> = history.lines.iter().map(|l| l.running_balance).collect();
        assert_eq!(running, vec![dec!(100), dec!(70)]);
        assert_eq!(history.closing_balance, dec!(70));

        let revenue = books
            .queries
            .account_history(books.tenant.id, books.revenue.id, None)
            .await
            .unwrap();
        assert_eq!(revenue.closing_balance, dec!(100));
    }

    #[tokio::test]
    async fn test_history_orders_by_posting_date_then_sequence() {
        let books = books().await;
        let later = JournalBuilder::new(books.tenant.id, "JV-LATE", "Later sale")
            .dated(date(2024, 7, 1))
            .debit(books.cash.id, dec!(5))
            .credit(books.revenue.id, dec!(5));
        let later = books.engine.create_entry(later).await.unwrap();
        books.engine.validate(books.tenant.id, later.id).await.unwrap();
        books.engine.post(books.tenant.id, later.id, None).await.unwrap();

        books.posted_sale("JV-EARLY", dec!(100)).await;

        let history = books
            .queries
            .account_history(books.tenant.id, books.cash.id, None)
            .await
            .unwrap();
        assert_eq!(history.lines[0].posting_date, date(2024, 6, 1));
        assert_eq!(history.lines[1].posting_date, date(2024, 7, 1));
        assert_eq!(history.lines[1].running_balance, dec!(105));
    }

    #[tokio::test]
    async fn test_reconcile_clean_ledger() {
        let books = books().await;
        books.posted_sale("JV-1", dec!(100)).await;
        let chart = &books.chart;
        books
            .services
            .post_transfer(chart, "JV-2", &chart.rent, &chart.bank, AmountFixtures::monthly_rent())
            .await;

        let report = books.queries.reconcile(books.tenant.id).await.unwrap();
        assert_reconciled(&report);
        assert_eq!(report.accounts_checked, 4);

        let bank = books.queries.account_balance(books.tenant.id, books.chart.bank.id).await.unwrap();
        assert_amount_eq(bank.balance, -AmountFixtures::monthly_rent());
    }

    #[tokio::test]
    async fn test_reconcile_detects_drifted_balance() {
        let books = books().await;
        books.posted_sale("JV-1", dec!(100)).await;

        let mut drifted = books.queries.account_balance(books.tenant.id, books.cash.id).await.unwrap();
        drifted.debit_total = dec!(999);
        books.store.overwrite_balance(drifted).await;

        let report = books.queries.reconcile(books.tenant.id).await.unwrap();
        assert!(!report.is_consistent);
        assert_eq!(report.discrepancies.len(), 1);
        assert_eq!(report.discrepancies[0].account_id, books.cash.id);
    }

    #[tokio::test]
    async fn test_tenant_scope_isolates_lists() {
        let books = books().await;
        books.posted_sale("JV-1", dec!(100)).await;

        let mine = books.engine.list(TenantScope::Tenant(books.tenant.id)).await.unwrap();
        let theirs = books.engine.list(TenantScope::Tenant(TenantId::new())).await.unwrap();
        let all = books.engine.list(TenantScope::All).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(theirs.is_empty());
        assert_eq!(all.len(), 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn trial_balance_nets_to_zero(transfers in balanced_transfers_strategy(3, 12)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let books = books().await;
            let accounts = [books.cash.id, books.revenue.id, books.expense.id];

            for (index, (debit, credit, amount)) in transfers.iter().enumerate() {
                let builder = JournalBuilder::new(books.tenant.id, format!("JV-{}", index), "Generated")
                    .dated(date(2024, 6, 1))
                    .debit(accounts[*debit], *amount)
                    .credit(accounts[*credit], *amount);
                books.services.post(builder).await;
            }

            let tb = books.queries.trial_balance(books.tenant.id, date(2024, 12, 31)).await.unwrap();
            assert_trial_balance_nets_to_zero(&tb);
            assert_reconciled(&books.queries.reconcile(books.tenant.id).await.unwrap());
        });
    }

    #[test]
    fn unbalanced_difference_is_debit_minus_credit(debit in ledger_amount_strategy(), credit in ledger_amount_strategy()) {
        prop_assume!(debit != credit);
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let err = runtime.block_on(async {
            let books = books().await;
            let builder = JournalBuilder::new(books.tenant.id, "JV-X", "Generated")
                .debit(books.cash.id, debit)
                .credit(books.revenue.id, credit);
            let entry = books.engine.create_entry(builder).await.unwrap();
            books.engine.validate(books.tenant.id, entry.id).await.unwrap_err()
        });
        let difference = match err {
            LedgerError::Unbalanced { difference } => difference,
            other => return Err(TestCaseError::fail(format!("expected Unbalanced, got {}", other))),
        };
        prop_assert_eq!(difference, debit - credit);
    }

    #[test]
    fn sub_paisa_amounts_never_draft(amount in excess_precision_strategy()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let result = runtime.block_on(async {
            let books = books().await;
            books.engine.create_entry(books.sale("JV-X", amount)).await
        });
        prop_assert!(matches!(result, Err(LedgerError::Validation(_))));
    }
}
