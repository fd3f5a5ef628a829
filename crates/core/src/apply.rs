// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::BenefitCommand;
use crate::error::CoreError;
use crate::state::{TransitionResult, snapshot};
use time::OffsetDateTime;
use velo_benefit_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use velo_benefit_domain::{BenefitRecord, BikeStep, ContractStatus, DomainError};

/// Moves the step marker forward, never backward.
///
/// Re-entering the current step is allowed (e.g., re-choosing a bike or
/// rebooking a test); regressing to an earlier step is not.
fn advance_step(record: &mut BenefitRecord, target: BikeStep) -> Result<(), DomainError> {
    if let Some(current) = record.step
        && target.position() < current.position()
    {
        return Err(DomainError::StepRegression {
            from: current.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }
    record.step = Some(target);
    Ok(())
}

/// Sets a set-once timestamp, failing if it is already present.
fn stamp(
    slot: &mut Option<OffsetDateTime>,
    field: &'static str,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if slot.is_some() {
        return Err(DomainError::TimestampAlreadySet { field });
    }
    *slot = Some(now);
    Ok(())
}

/// Moves the persisted contract status through the transition table.
fn transition_contract(
    record: &mut BenefitRecord,
    target: ContractStatus,
) -> Result<(), DomainError> {
    record.contract_status.validate_transition(target)?;
    record.contract_status = target;
    Ok(())
}

/// Applies a command to a benefit record, producing a new record and
/// audit event.
///
/// This is the single write-path gate for benefit and contract
/// progression. It enforces, in order:
/// - the frozen-record invariant: once a benefit is terminated or has an
///   insurance claim on file, no command may advance it;
/// - set-once timestamps: a command whose timestamp is already present
///   fails rather than silently overwriting;
/// - monotonic step progression: the step marker never moves backward;
/// - the contract transition table and the signing order (the employer
///   can never sign before the employee).
///
/// The input record is not modified; transitions are atomic and either
/// succeed completely or fail without side effects.
///
/// # Arguments
///
/// * `record` - The current benefit record (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The timestamp to stamp onto the transition
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new record and audit event
/// * `Err(CoreError)` if the command is invalid for this record
///
/// # Errors
///
/// Returns an error if:
/// - The record is administratively frozen
/// - The command's timestamp is already set
/// - The step marker would move backward
/// - A contract transition would skip, reorder, or reverse a stage
#[allow(clippy::too_many_lines)]
pub fn apply(
    record: &BenefitRecord,
    command: BenefitCommand,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    // Frozen records accept nothing, including repeated administrative
    // commands.
    if let Some(flag) = record.frozen_by() {
        return Err(CoreError::DomainViolation(DomainError::RecordFrozen {
            user_id: record.user_id.clone(),
            flag,
        }));
    }

    let before: StateSnapshot = snapshot(record);
    let mut new_record: BenefitRecord = record.clone();
    let action_name: &'static str = command.name();

    let details: Option<String> = match command {
        BenefitCommand::ChooseBike { bike_id } => {
            advance_step(&mut new_record, BikeStep::ChooseBike)?;
            let detail: String = format!("Chose bike '{bike_id}'");
            new_record.bike_id = Some(bike_id);
            Some(detail)
        }
        BenefitCommand::BookLiveTest {
            location_name,
            location_coords,
        } => {
            if new_record.bike_id.is_none() {
                return Err(CoreError::DomainViolation(
                    DomainError::MissingPrerequisite { field: "bike_id" },
                ));
            }
            advance_step(&mut new_record, BikeStep::BookLiveTest)?;
            let detail: String = format!("Booked live test at '{location_name}'");
            new_record.live_test_location_name = Some(location_name);
            new_record.live_test_location_coords = location_coords;
            Some(detail)
        }
        BenefitCommand::RecordLiveTestNotification => {
            if new_record.step.is_none_or(|s| s.position() < BikeStep::BookLiveTest.position()) {
                return Err(CoreError::DomainViolation(
                    DomainError::MissingPrerequisite {
                        field: "step=book_live_test",
                    },
                ));
            }
            stamp(
                &mut new_record.live_test_whatsapp_sent_at,
                "live_test_whatsapp_sent_at",
                now,
            )?;
            None
        }
        BenefitCommand::CheckInLiveTest => {
            if new_record.live_test_whatsapp_sent_at.is_none() {
                return Err(CoreError::DomainViolation(
                    DomainError::MissingPrerequisite {
                        field: "live_test_whatsapp_sent_at",
                    },
                ));
            }
            stamp(
                &mut new_record.live_test_checked_in_at,
                "live_test_checked_in_at",
                now,
            )?;
            None
        }
        BenefitCommand::CommitToBike => {
            if new_record.bike_id.is_none() {
                return Err(CoreError::DomainViolation(
                    DomainError::MissingPrerequisite { field: "bike_id" },
                ));
            }
            advance_step(&mut new_record, BikeStep::CommitToBike)?;
            stamp(&mut new_record.committed_at, "committed_at", now)?;
            None
        }
        BenefitCommand::RequestContract => {
            advance_step(&mut new_record, BikeStep::SignContract)?;
            stamp(
                &mut new_record.contract_requested_at,
                "contract_requested_at",
                now,
            )?;
            None
        }
        BenefitCommand::ViewContract => {
            transition_contract(&mut new_record, ContractStatus::ViewedByEmployee)?;
            stamp(&mut new_record.contract_viewed_at, "contract_viewed_at", now)?;
            None
        }
        BenefitCommand::SignContractAsEmployee => {
            transition_contract(&mut new_record, ContractStatus::SignedByEmployee)?;
            stamp(
                &mut new_record.contract_employee_signed_at,
                "contract_employee_signed_at",
                now,
            )?;
            None
        }
        BenefitCommand::SignContractAsEmployer => {
            // The transition table already orders the statuses; the
            // timestamp guard catches records whose persisted status and
            // timestamps have drifted apart.
            if new_record.contract_employee_signed_at.is_none() {
                return Err(CoreError::DomainViolation(
                    DomainError::SigningOrderViolation {
                        missing: "contract_employee_signed_at",
                        attempted: "contract_employer_signed_at",
                    },
                ));
            }
            transition_contract(&mut new_record, ContractStatus::SignedByEmployer)?;
            stamp(
                &mut new_record.contract_employer_signed_at,
                "contract_employer_signed_at",
                now,
            )?;
            None
        }
        BenefitCommand::ApproveContract => {
            if new_record.contract_employer_signed_at.is_none() {
                return Err(CoreError::DomainViolation(
                    DomainError::SigningOrderViolation {
                        missing: "contract_employer_signed_at",
                        attempted: "contract_approved_at",
                    },
                ));
            }
            transition_contract(&mut new_record, ContractStatus::Approved)?;
            stamp(
                &mut new_record.contract_approved_at,
                "contract_approved_at",
                now,
            )?;
            None
        }
        BenefitCommand::TerminateContract => {
            transition_contract(&mut new_record, ContractStatus::Terminated)?;
            stamp(
                &mut new_record.contract_terminated_at,
                "contract_terminated_at",
                now,
            )?;
            None
        }
        BenefitCommand::RecordDelivery => {
            if new_record.committed_at.is_none() {
                return Err(CoreError::DomainViolation(
                    DomainError::MissingPrerequisite {
                        field: "committed_at",
                    },
                ));
            }
            advance_step(&mut new_record, BikeStep::PickupDelivery)?;
            stamp(&mut new_record.delivered_at, "delivered_at", now)?;
            None
        }
        BenefitCommand::TerminateBenefit => {
            stamp(
                &mut new_record.benefit_terminated_at,
                "benefit_terminated_at",
                now,
            )?;
            None
        }
        BenefitCommand::FileInsuranceClaim => {
            stamp(
                &mut new_record.benefit_insurance_claim_at,
                "benefit_insurance_claim_at",
                now,
            )?;
            None
        }
    };

    new_record.updated_at = now;

    let after: StateSnapshot = snapshot(&new_record);
    let action: Action = Action::new(String::from(action_name), details);
    let user_id: String = new_record.user_id.clone();
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after, user_id);

    Ok(TransitionResult {
        new_record,
        audit_event,
    })
}
