// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the benefit read path and workflow advance.

use time::OffsetDateTime;
use tracing::info;
use velo_benefit::{TransitionResult, apply};
use velo_benefit_audit::{Actor, Cause};
use velo_benefit_domain::{
    BenefitRecord, BenefitStatus, Company, derive_benefit_status,
};
use velo_benefit_store::{BenefitStore, ProfileStore};

use crate::auth::{AuthorizationService, BearerClaims, Role};
use crate::error::{ApiError, translate_core_error};
use crate::request_response::{
    AdvanceBenefitRequest, AdvanceBenefitResponse, BenefitStatusResponse, BenefitSummaryResponse,
    StatusCount,
};

/// Builds the status view of a benefit record.
///
/// Status is consulted on the read path only; it is derived here, never
/// stored, so it can never drift from the record's facts.
fn to_status_response(record: &BenefitRecord) -> BenefitStatusResponse {
    BenefitStatusResponse {
        user_id: record.user_id.clone(),
        bike_id: record.bike_id.clone(),
        step: record.step,
        benefit_status: derive_benefit_status(record),
        contract_status: record.contract_status,
        committed_at: record.committed_at,
        delivered_at: record.delivered_at,
        benefit_terminated_at: record.benefit_terminated_at,
        benefit_insurance_claim_at: record.benefit_insurance_claim_at,
    }
}

/// Returns the current state of an employee's benefit enrollment.
///
/// Employees may read their own record only; HR and admins may read any
/// record in the system.
///
/// # Arguments
///
/// * `benefits` - The benefit record store
/// * `claims` - The caller's decoded claims
/// * `user_id` - The employee to look up
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if an employee targets another record,
/// `ApiError::ResourceNotFound` if the employee has no benefit record,
/// or `ApiError::Upstream` if the store cannot be queried.
pub async fn benefit_status(
    benefits: &dyn BenefitStore,
    claims: &BearerClaims,
    user_id: &str,
) -> Result<BenefitStatusResponse, ApiError> {
    let elevated: bool = claims
        .role
        .is_some_and(|role| matches!(role, Role::Admin | Role::Hr));
    if !elevated && (claims.role.is_none() || claims.subject != user_id) {
        return Err(ApiError::Forbidden {
            reason: String::from("no_permission_to_access_this_data"),
        });
    }

    let record: BenefitRecord = benefits
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Benefit"),
            message: format!("No benefit record for user '{user_id}'"),
        })?;

    Ok(to_status_response(&record))
}

/// Applies a workflow command to an employee's benefit record.
///
/// This function:
/// - Verifies the caller's role permits the command (administrative
///   commands require HR or admin; employees act on their own record)
/// - Loads the record, creating an implicit inactive one on first touch
/// - Applies the command through the workflow core
/// - Persists the new record and returns the derived statuses
///
/// # Arguments
///
/// * `benefits` - The benefit record store
/// * `claims` - The caller's decoded claims
/// * `user_id` - The employee whose record is being advanced
/// * `request` - The command and its cause
/// * `now` - The timestamp to stamp onto the transition
///
/// # Errors
///
/// Returns an error if the caller is not authorized, the command
/// violates the workflow rules, or the store fails.
pub async fn advance_benefit(
    benefits: &dyn BenefitStore,
    claims: &BearerClaims,
    user_id: &str,
    request: AdvanceBenefitRequest,
    now: OffsetDateTime,
) -> Result<AdvanceBenefitResponse, ApiError> {
    AuthorizationService::authorize_benefit_command(claims, &request.command, user_id)?;

    // A benefit record exists implicitly, inactive, from the moment an
    // employee is invited; first touch materializes it.
    let record: BenefitRecord = benefits
        .find_by_user(user_id)
        .await?
        .unwrap_or_else(|| BenefitRecord::new(user_id.to_string(), now));

    let role: &'static str = claims.role.map_or("employee", |r| r.as_str());
    let actor: Actor = Actor::new(claims.subject.clone(), String::from(role));
    let cause: Cause = Cause::new(request.cause_id, request.cause_description);

    let result: TransitionResult =
        apply(&record, request.command, actor, cause, now).map_err(translate_core_error)?;

    benefits.upsert(&result.new_record).await?;

    info!(
        user_id = %user_id,
        actor = %claims.subject,
        action = %result.audit_event.action.name,
        "Applied benefit command"
    );

    Ok(AdvanceBenefitResponse {
        user_id: user_id.to_string(),
        action: result.audit_event.action.name,
        step: result.new_record.step,
        benefit_status: derive_benefit_status(&result.new_record),
        contract_status: result.new_record.contract_status,
    })
}

/// Summarizes a company's benefit enrollments by derived status.
///
/// Restricted to HR and admin callers; the summary is always scoped to
/// the caller's own company.
///
/// # Arguments
///
/// * `benefits` - The benefit record store
/// * `profiles` - The tenant/profile store
/// * `claims` - The caller's decoded claims
///
/// # Errors
///
/// Returns an error if the caller is not HR/admin, has no company, or
/// the store fails.
pub async fn benefit_status_summary(
    benefits: &dyn BenefitStore,
    profiles: &dyn ProfileStore,
    claims: &BearerClaims,
) -> Result<BenefitSummaryResponse, ApiError> {
    if !claims
        .role
        .is_some_and(|role| matches!(role, Role::Admin | Role::Hr))
    {
        return Err(ApiError::Forbidden {
            reason: String::from("no_permission_to_access_this_data"),
        });
    }

    let company_id: String =
        AuthorizationService::resolve_company(profiles, &claims.subject).await?;
    let company: Company = profiles
        .find_company(&company_id)
        .await
        .map_err(|e| ApiError::ProfileLookupFailed {
            message: e.to_string(),
        })?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Company"),
            message: format!("Company '{company_id}' does not exist"),
        })?;

    let records: Vec<BenefitRecord> = benefits.list_for_company(&company_id).await?;

    let all_statuses: [BenefitStatus; 6] = [
        BenefitStatus::Inactive,
        BenefitStatus::Searching,
        BenefitStatus::Testing,
        BenefitStatus::Active,
        BenefitStatus::InsuranceClaim,
        BenefitStatus::Terminated,
    ];

    let statuses: Vec<StatusCount> = all_statuses
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: records
                .iter()
                .filter(|r| derive_benefit_status(r) == status)
                .count(),
        })
        .collect();

    Ok(BenefitSummaryResponse {
        company_id,
        company_name: company.name,
        monthly_subsidy: company.monthly_subsidy,
        contract_months: company.contract_months,
        total: records.len(),
        statuses,
    })
}
