// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guarded bulk-ingestion pipeline for employee invites.
//!
//! One authenticated, role-checked caller uploads a CSV of invite rows;
//! every row is independently normalized, validated, deduplicated and
//! written, and the batch always completes with a per-row outcome
//! report. The gating checks (who are you, what can you touch) reject
//! the whole request wholesale; row-level work never does.

use csv::StringRecord;
use std::collections::{HashMap, HashSet};
use time::OffsetDateTime;
use tracing::{info, warn};
use velo_benefit_domain::{EmailAddress, parse_hire_date};
use velo_benefit_store::{InviteStore, NewInvite, ProfileStore, RoleStore, StoreError};

use crate::auth::{
    AuthorizationService, BearerClaims, DEFAULT_INVITE_ROLES, Role, decode_bearer_claims,
};
use crate::error::ApiError;
use crate::request_response::{IngestReport, IngestRowOutcome};

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &["email"];

/// A raw invite row as read from the CSV, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawInviteRow {
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    description: Option<String>,
    department: Option<String>,
    hire_date: Option<String>,
}

/// Normalizes a CSV header for case-insensitive, separator-tolerant
/// matching. `firstName`, `first_name` and `First Name` all match.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace([' ', '_'], "")
}

/// Validates the header row and maps normalized names to column indexes.
fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let mut header_map: HashMap<String, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        let normalized: String = normalize_header(header);
        header_map.insert(normalized, idx);
    }

    for required in REQUIRED_HEADERS {
        if !header_map.contains_key(*required) {
            return Err(ApiError::MissingHeader {
                missing: String::from(*required),
            });
        }
    }

    Ok(header_map)
}

/// Parses the CSV content into raw rows.
///
/// Input-shape problems (empty content, missing header, no data rows)
/// are fatal: the batch cannot be meaningfully interpreted at all. A row
/// that fails to parse is NOT fatal and is carried as a per-row error.
fn parse_rows(csv_content: &str) -> Result<Vec<Result<RawInviteRow, String>>, ApiError> {
    if csv_content.trim().is_empty() {
        return Err(ApiError::EmptyCsv);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("csv"),
            message: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();

    let header_map: HashMap<String, usize> = validate_headers(&headers)?;

    let get_field = |record: &StringRecord, name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let mut rows: Vec<Result<RawInviteRow, String>> = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(Ok(RawInviteRow {
                email: get_field(&record, "email").unwrap_or_default(),
                first_name: get_field(&record, "firstname"),
                last_name: get_field(&record, "lastname"),
                description: get_field(&record, "description"),
                department: get_field(&record, "department"),
                hire_date: get_field(&record, "hiredate"),
            })),
            Err(e) => rows.push(Err(format!("CSV parse error: {e}"))),
        }
    }

    if rows.is_empty() {
        return Err(ApiError::NoRows);
    }

    Ok(rows)
}

/// A validated invite row, ready to be stamped with a company and
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidInviteRow {
    email: EmailAddress,
    first_name: Option<String>,
    last_name: Option<String>,
    description: Option<String>,
    department: Option<String>,
    hire_date: Option<OffsetDateTime>,
}

/// Validates one raw row, producing a failure reason code on rejection.
fn validate_row(raw: &RawInviteRow) -> Result<ValidInviteRow, &'static str> {
    let email: EmailAddress = EmailAddress::new(&raw.email).map_err(|_| "invalid_email")?;

    let hire_date: Option<OffsetDateTime> = match raw.hire_date.as_deref() {
        Some(value) => Some(parse_hire_date(value).map_err(|_| "invalid_hire_date")?),
        None => None,
    };

    Ok(ValidInviteRow {
        email,
        first_name: raw.first_name.clone(),
        last_name: raw.last_name.clone(),
        description: raw.description.clone(),
        department: raw.department.clone(),
        hire_date,
    })
}

/// The guarded bulk-ingestion pipeline.
///
/// Composes authentication, the two-way role check, tenant resolution,
/// per-row validation, deduplication by unique email and a best-effort
/// write per row. Rows are processed sequentially in file order; the
/// store's uniqueness constraint remains the final authority for
/// concurrent submissions of the same email.
pub struct BulkInvitePipeline<'a> {
    invites: &'a dyn InviteStore,
    roles: &'a dyn RoleStore,
    profiles: &'a dyn ProfileStore,
    allowed_roles: &'a [Role],
}

impl<'a> BulkInvitePipeline<'a> {
    /// Creates a pipeline with the default allow-list of {hr, admin}.
    ///
    /// # Arguments
    ///
    /// * `invites` - The invite store
    /// * `roles` - The authoritative role store
    /// * `profiles` - The tenant/profile store
    #[must_use]
    pub const fn new(
        invites: &'a dyn InviteStore,
        roles: &'a dyn RoleStore,
        profiles: &'a dyn ProfileStore,
    ) -> Self {
        Self {
            invites,
            roles,
            profiles,
            allowed_roles: DEFAULT_INVITE_ROLES,
        }
    }

    /// Replaces the allow-list of roles permitted to run the pipeline.
    #[must_use]
    pub const fn with_allowed_roles(mut self, allowed_roles: &'a [Role]) -> Self {
        self.allowed_roles = allowed_roles;
        self
    }

    /// Runs the pipeline over one uploaded batch.
    ///
    /// Gating failures (credential, role, tenant, input shape) reject
    /// the whole request before any row is touched. Once gating passes,
    /// the batch always completes: every row gets exactly one outcome in
    /// the report and one bad row never aborts the rest.
    ///
    /// Re-submitting the same batch is safe: rows whose email already
    /// exists anywhere in the system report `already_exists` and are not
    /// re-written.
    ///
    /// # Arguments
    ///
    /// * `authorization` - The raw `Authorization` header value, if any
    /// * `csv_content` - The uploaded CSV text
    ///
    /// # Errors
    ///
    /// Returns an error only for whole-request failures; per-row
    /// failures are reported inside the returned report.
    pub async fn run(
        &self,
        authorization: Option<&str>,
        csv_content: &str,
    ) -> Result<IngestReport, ApiError> {
        let claims: BearerClaims = decode_bearer_claims(authorization)?;
        AuthorizationService::authorize_bulk_invite(self.roles, &claims, self.allowed_roles)
            .await?;
        let company_id: String =
            AuthorizationService::resolve_company(self.profiles, &claims.subject).await?;

        let rows: Vec<Result<RawInviteRow, String>> = parse_rows(csv_content)?;

        info!(
            subject = %claims.subject,
            company_id = %company_id,
            rows = rows.len(),
            "Processing bulk invite batch"
        );

        let mut results: Vec<IngestRowOutcome> = Vec::with_capacity(rows.len());
        let mut seen: HashSet<String> = HashSet::new();

        for row in rows {
            results.push(self.process_row(row, &company_id, &mut seen).await);
        }

        let invited: usize = results.iter().filter(|r| r.invited).count();
        info!(
            subject = %claims.subject,
            processed = results.len(),
            invited,
            "Completed bulk invite batch"
        );

        Ok(IngestReport {
            created: results.len(),
            results,
        })
    }

    /// Processes one row: validate, deduplicate, write.
    ///
    /// Never fails the batch; every code path returns an outcome.
    async fn process_row(
        &self,
        row: Result<RawInviteRow, String>,
        company_id: &str,
        seen: &mut HashSet<String>,
    ) -> IngestRowOutcome {
        let raw: RawInviteRow = match row {
            Ok(raw) => raw,
            Err(message) => {
                warn!(error = %message, "Skipping unparseable CSV row");
                return IngestRowOutcome::failed(String::new(), String::from("csv_parse_error"));
            }
        };

        let valid: ValidInviteRow = match validate_row(&raw) {
            Ok(valid) => valid,
            Err(code) => {
                return IngestRowOutcome::failed(raw.email, String::from(code));
            }
        };

        let email_key: String = valid.email.value().to_string();

        // Earlier rows of this batch count as existing, whether or not
        // the store's read path would already surface them.
        if seen.contains(&email_key) {
            return IngestRowOutcome::already_exists(email_key);
        }

        match self.invites.find_by_email(&valid.email).await {
            Ok(Some(_)) => {
                seen.insert(email_key.clone());
                return IngestRowOutcome::already_exists(email_key);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(email = %email_key, error = %e, "Invite lookup failed");
                return IngestRowOutcome::failed(email_key, String::from("store_lookup_failed"));
            }
        }

        let invite = NewInvite {
            email: valid.email,
            first_name: valid.first_name,
            last_name: valid.last_name,
            description: valid.description,
            department: valid.department,
            hire_date: valid.hire_date,
            company_id: company_id.to_string(),
        };

        match self.invites.create(invite).await {
            Ok(stored) => {
                seen.insert(email_key.clone());
                IngestRowOutcome::created(email_key, stored)
            }
            // The check-then-insert sequence is an optimization; the
            // store's unique constraint is the correctness mechanism. A
            // conflict here means someone else won the race.
            Err(StoreError::Conflict { .. }) => {
                seen.insert(email_key.clone());
                IngestRowOutcome::already_exists(email_key)
            }
            Err(e) => {
                warn!(email = %email_key, error = %e, "Invite write failed");
                IngestRowOutcome::failed(email_key, String::from("store_write_failed"))
            }
        }
    }
}
