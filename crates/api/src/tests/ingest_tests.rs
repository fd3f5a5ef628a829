// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the guarded bulk-ingestion pipeline.

use async_trait::async_trait;
use velo_benefit_domain::{EmailAddress, EmployeeProfile, ProfileStatus};
use velo_benefit_store::{
    InviteStore, MemoryStore, NewInvite, StoreError, StoredInvite,
};

use super::helpers::{bearer_token, seeded_store};
use crate::{ApiError, BulkInvitePipeline, IngestReport, RowStatus};

async fn run_as_hr(store: &MemoryStore, csv: &str) -> Result<IngestReport, ApiError> {
    let token = bearer_token("hr-1", Some("hr"));
    let pipeline = BulkInvitePipeline::new(store, store, store);
    pipeline.run(Some(&token), csv).await
}

#[tokio::test]
async fn test_valid_rows_are_invited_into_the_callers_company() {
    let store = seeded_store().await;
    let csv = "email,firstName,lastName\n\
               jane@x.com,Jane,Doe\n\
               john@y.com,John,Smith\n";

    let report = run_as_hr(&store, csv).await.expect("batch should run");

    assert_eq!(report.created, 2);
    assert!(report.results.iter().all(|r| r.invited));
    for outcome in &report.results {
        let body = outcome.body.as_ref().expect("created rows carry a body");
        assert_eq!(body.company_id, "company-a");
    }
    assert_eq!(store.invite_count().await, 2);
}

#[tokio::test]
async fn test_end_to_end_example_batch() {
    // One valid row, one invalid email, one in-batch duplicate.
    let store = seeded_store().await;
    let csv = "email,firstName,lastName,hireDate\n\
               a@x.com,Jane,Doe,2024-01-15\n\
               bad-email,John,Smith,\n\
               a@x.com,Jane,Doe,\n";

    let report = run_as_hr(&store, csv).await.expect("batch should run");

    assert_eq!(report.created, 3);
    assert_eq!(report.results.len(), 3);

    let first = &report.results[0];
    assert_eq!(first.email, "a@x.com");
    assert!(first.invited);
    assert_eq!(first.status, Some(RowStatus::Created));

    let second = &report.results[1];
    assert_eq!(second.email, "bad-email");
    assert!(!second.invited);
    assert_eq!(second.error.as_deref(), Some("invalid_email"));

    let third = &report.results[2];
    assert_eq!(third.email, "a@x.com");
    assert!(!third.invited);
    assert_eq!(third.status, Some(RowStatus::AlreadyExists));

    assert_eq!(store.invite_count().await, 1);
}

#[tokio::test]
async fn test_one_bad_row_never_blocks_the_rest() {
    let store = seeded_store().await;
    let mut csv = String::from("email\n");
    csv.push_str("not-an-email\n");
    for i in 0..9 {
        csv.push_str(&format!("person{i}@x.com\n"));
    }

    let report = run_as_hr(&store, &csv).await.expect("batch should run");

    assert_eq!(report.results.len(), 10);
    let failures: usize = report
        .results
        .iter()
        .filter(|r| r.error.is_some())
        .count();
    let successes: usize = report.results.iter().filter(|r| r.invited).count();
    assert_eq!(failures, 1);
    assert_eq!(successes, 9);
}

#[tokio::test]
async fn test_resubmitting_the_same_batch_is_idempotent() {
    let store = seeded_store().await;
    let csv = "email\njane@x.com\njohn@y.com\n";

    let first = run_as_hr(&store, csv).await.expect("first run");
    assert_eq!(first.results.iter().filter(|r| r.invited).count(), 2);

    let second = run_as_hr(&store, csv).await.expect("second run");
    assert_eq!(second.results.iter().filter(|r| r.invited).count(), 0);
    assert!(
        second
            .results
            .iter()
            .all(|r| r.status == Some(RowStatus::AlreadyExists))
    );
    assert_eq!(store.invite_count().await, 2);
}

#[tokio::test]
async fn test_missing_credential_rejects_the_whole_request() {
    let store = seeded_store().await;
    let pipeline = BulkInvitePipeline::new(&store, &store, &store);

    let result = pipeline.run(None, "email\njane@x.com\n").await;

    assert!(matches!(result, Err(ApiError::InvalidCredential { .. })));
    assert_eq!(store.invite_count().await, 0);
}

#[tokio::test]
async fn test_employee_role_rejects_the_whole_request() {
    let store = seeded_store().await;
    store.seed_role("emp-1", "employee").await;
    let token = bearer_token("emp-1", Some("employee"));
    let pipeline = BulkInvitePipeline::new(&store, &store, &store);

    let result = pipeline.run(Some(&token), "email\njane@x.com\n").await;

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
    assert_eq!(store.invite_count().await, 0);
}

#[tokio::test]
async fn test_claim_without_authoritative_backing_is_rejected() {
    // Token claims hr, but the role store has no assignment for this
    // subject. The store is authoritative.
    let store = seeded_store().await;
    let token = bearer_token("impostor", Some("hr"));
    let pipeline = BulkInvitePipeline::new(&store, &store, &store);

    let result = pipeline.run(Some(&token), "email\njane@x.com\n").await;

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[tokio::test]
async fn test_uploader_without_profile_is_rejected() {
    let store = MemoryStore::new();
    store.seed_role("hr-1", "hr").await;
    let token = bearer_token("hr-1", Some("hr"));
    let pipeline = BulkInvitePipeline::new(&store, &store, &store);

    let result = pipeline.run(Some(&token), "email\njane@x.com\n").await;

    assert_eq!(result, Err(ApiError::ProfileNotFound));
}

#[tokio::test]
async fn test_uploader_without_company_is_rejected() {
    let store = MemoryStore::new();
    store.seed_role("hr-1", "hr").await;
    store
        .seed_profile(EmployeeProfile {
            user_id: String::from("hr-1"),
            email: EmailAddress::new("hr@acme.com").expect("valid email"),
            company_id: None,
            status: ProfileStatus::Active,
        })
        .await;
    let token = bearer_token("hr-1", Some("hr"));
    let pipeline = BulkInvitePipeline::new(&store, &store, &store);

    let result = pipeline.run(Some(&token), "email\njane@x.com\n").await;

    assert_eq!(result, Err(ApiError::NoCompanyAssigned));
}

#[tokio::test]
async fn test_empty_csv_is_fatal() {
    let store = seeded_store().await;

    let result = run_as_hr(&store, "   \n  ").await;
    assert_eq!(result, Err(ApiError::EmptyCsv));
}

#[tokio::test]
async fn test_header_only_csv_is_fatal() {
    let store = seeded_store().await;

    let result = run_as_hr(&store, "email,firstName\n").await;
    assert_eq!(result, Err(ApiError::NoRows));
}

#[tokio::test]
async fn test_missing_email_column_is_fatal() {
    let store = seeded_store().await;

    let result = run_as_hr(&store, "firstName,lastName\nJane,Doe\n").await;
    assert_eq!(
        result,
        Err(ApiError::MissingHeader {
            missing: String::from("email")
        })
    );
}

#[tokio::test]
async fn test_headers_match_across_spellings() {
    let store = seeded_store().await;
    let csv = "First Name,EMAIL,last_name\nJane,jane@x.com,Doe\n";

    let report = run_as_hr(&store, csv).await.expect("batch should run");

    let body = report.results[0].body.as_ref().expect("created row");
    assert_eq!(body.first_name.as_deref(), Some("Jane"));
    assert_eq!(body.last_name.as_deref(), Some("Doe"));
}

#[tokio::test]
async fn test_hire_dates_accept_both_forms() {
    let store = seeded_store().await;
    let csv = "email,hireDate\n\
               jane@x.com,2024-01-15\n\
               john@y.com,1705276800000\n";

    let report = run_as_hr(&store, csv).await.expect("batch should run");

    let jane = report.results[0].body.as_ref().expect("created row");
    let john = report.results[1].body.as_ref().expect("created row");
    assert_eq!(jane.hire_date, john.hire_date);
}

#[tokio::test]
async fn test_garbage_hire_date_fails_only_that_row() {
    let store = seeded_store().await;
    let csv = "email,hireDate\n\
               jane@x.com,last spring\n\
               john@y.com,\n";

    let report = run_as_hr(&store, csv).await.expect("batch should run");

    assert_eq!(
        report.results[0].error.as_deref(),
        Some("invalid_hire_date")
    );
    assert!(report.results[1].invited);
}

#[tokio::test]
async fn test_uploaded_tenant_identifiers_are_ignored() {
    // A company_id column in the upload must never override the
    // uploader's own tenant.
    let store = seeded_store().await;
    let csv = "email,company_id\njane@x.com,company-b\n";

    let report = run_as_hr(&store, csv).await.expect("batch should run");

    let body = report.results[0].body.as_ref().expect("created row");
    assert_eq!(body.company_id, "company-a");
}

#[tokio::test]
async fn test_email_matching_is_case_insensitive_across_batches() {
    let store = seeded_store().await;

    run_as_hr(&store, "email\njane@x.com\n")
        .await
        .expect("first run");
    let report = run_as_hr(&store, "email\nJANE@X.COM\n")
        .await
        .expect("second run");

    assert_eq!(report.results[0].status, Some(RowStatus::AlreadyExists));
    assert_eq!(store.invite_count().await, 1);
}

/// An invite store whose unique constraint always fires on create,
/// simulating a concurrent writer winning the race between the
/// existence check and the insert.
struct RacingInviteStore;

#[async_trait]
impl InviteStore for RacingInviteStore {
    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<StoredInvite>, StoreError> {
        Ok(None)
    }

    async fn create(&self, invite: NewInvite) -> Result<StoredInvite, StoreError> {
        Err(StoreError::Conflict {
            email: invite.email.value().to_string(),
        })
    }
}

#[tokio::test]
async fn test_write_conflict_is_reported_as_already_exists() {
    let store = seeded_store().await;
    let token = bearer_token("hr-1", Some("hr"));
    let pipeline = BulkInvitePipeline::new(&RacingInviteStore, &store, &store);

    let report = pipeline
        .run(Some(&token), "email\njane@x.com\n")
        .await
        .expect("batch should run");

    let outcome = &report.results[0];
    assert!(!outcome.invited);
    assert_eq!(outcome.status, Some(RowStatus::AlreadyExists));
    assert_eq!(outcome.error, None);
}

/// An invite store that fails every write with a transport error.
struct FlakyInviteStore;

#[async_trait]
impl InviteStore for FlakyInviteStore {
    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<StoredInvite>, StoreError> {
        Ok(None)
    }

    async fn create(&self, _invite: NewInvite) -> Result<StoredInvite, StoreError> {
        Err(StoreError::Transport(String::from("connection reset")))
    }
}

#[tokio::test]
async fn test_write_failure_is_isolated_to_its_row() {
    let store = seeded_store().await;
    let token = bearer_token("hr-1", Some("hr"));
    let pipeline = BulkInvitePipeline::new(&FlakyInviteStore, &store, &store);

    let report = pipeline
        .run(Some(&token), "email\njane@x.com\njohn@y.com\n")
        .await
        .expect("batch still completes");

    assert_eq!(report.results.len(), 2);
    assert!(
        report
            .results
            .iter()
            .all(|r| r.error.as_deref() == Some("store_write_failed"))
    );
}
