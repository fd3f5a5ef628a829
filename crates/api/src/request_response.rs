// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use velo_benefit::BenefitCommand;
use velo_benefit_domain::{BenefitStatus, BikeStep, ContractStatus};
use velo_benefit_store::StoredInvite;

/// The non-failure outcome class of one ingested row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// A new invite was created for this row.
    Created,
    /// An invite with this email already exists; nothing was written.
    AlreadyExists,
}

/// The outcome of one row of a bulk onboarding batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRowOutcome {
    /// The row's email, as uploaded (trimmed).
    pub email: String,
    /// Whether a new invite was created for this row.
    pub invited: bool,
    /// The non-failure outcome class, when the row did not fail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RowStatus>,
    /// The failure reason code, when the row failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The created invite representation, when one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<StoredInvite>,
}

impl IngestRowOutcome {
    /// Builds the outcome for a freshly created invite.
    #[must_use]
    pub const fn created(email: String, body: StoredInvite) -> Self {
        Self {
            email,
            invited: true,
            status: Some(RowStatus::Created),
            error: None,
            body: Some(body),
        }
    }

    /// Builds the outcome for an email that already exists.
    #[must_use]
    pub const fn already_exists(email: String) -> Self {
        Self {
            email,
            invited: false,
            status: Some(RowStatus::AlreadyExists),
            error: None,
            body: None,
        }
    }

    /// Builds the outcome for a failed row.
    #[must_use]
    pub const fn failed(email: String, error: String) -> Self {
        Self {
            email,
            invited: false,
            status: None,
            error: Some(error),
            body: None,
        }
    }
}

/// The aggregate report of a bulk onboarding batch.
///
/// `created` counts processed rows; the per-row truth is in `results`,
/// which preserves upload order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// The number of rows processed.
    pub created: usize,
    /// Per-row outcomes, in upload order.
    pub results: Vec<IngestRowOutcome>,
}

/// API response describing a benefit enrollment's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitStatusResponse {
    /// The employee the record belongs to.
    pub user_id: String,
    /// The chosen bike, if any.
    pub bike_id: Option<String>,
    /// The workflow step marker.
    pub step: Option<BikeStep>,
    /// The derived benefit status.
    pub benefit_status: BenefitStatus,
    /// The persisted contract status.
    pub contract_status: ContractStatus,
    /// When the employee committed to a bike.
    #[serde(with = "time::serde::rfc3339::option")]
    pub committed_at: Option<OffsetDateTime>,
    /// When the bike was delivered.
    #[serde(with = "time::serde::rfc3339::option")]
    pub delivered_at: Option<OffsetDateTime>,
    /// When the benefit was terminated.
    #[serde(with = "time::serde::rfc3339::option")]
    pub benefit_terminated_at: Option<OffsetDateTime>,
    /// When an insurance claim was filed.
    #[serde(with = "time::serde::rfc3339::option")]
    pub benefit_insurance_claim_at: Option<OffsetDateTime>,
}

/// API request to advance a benefit enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceBenefitRequest {
    /// The command to apply.
    #[serde(flatten)]
    pub command: BenefitCommand,
    /// The cause ID for this action (e.g., request ID).
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
}

/// API response for a successful benefit advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceBenefitResponse {
    /// The employee the record belongs to.
    pub user_id: String,
    /// The name of the applied action.
    pub action: String,
    /// The workflow step marker after the transition.
    pub step: Option<BikeStep>,
    /// The derived benefit status after the transition.
    pub benefit_status: BenefitStatus,
    /// The persisted contract status after the transition.
    pub contract_status: ContractStatus,
}

/// Count of benefit records in one derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// The derived benefit status.
    pub status: BenefitStatus,
    /// The number of records currently in this status.
    pub count: usize,
}

/// API response summarizing a company's benefit enrollments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitSummaryResponse {
    /// The company identifier.
    pub company_id: String,
    /// The company name.
    pub company_name: String,
    /// The monthly benefit subsidy, in whole currency units.
    pub monthly_subsidy: u32,
    /// The contract duration in months.
    pub contract_months: u16,
    /// The total number of benefit records.
    pub total: usize,
    /// Per-status counts, in derivation-rule order.
    pub statuses: Vec<StatusCount>,
}
