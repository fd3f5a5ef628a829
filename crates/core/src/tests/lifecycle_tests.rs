// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for benefit workflow progression and the frozen-record invariant.

use time::macros::datetime;
use velo_benefit_domain::{BenefitStatus, BikeStep, DomainError, derive_benefit_status};

use super::helpers::{
    blank_record, committed_record, employee_actor, hr_actor, must_apply, t0, test_cause,
};
use crate::{BenefitCommand, CoreError, apply};

#[test]
fn test_choose_bike_starts_the_workflow() {
    let record = blank_record();
    let now = datetime!(2026-01-10 10:00 UTC);

    let result = apply(
        &record,
        BenefitCommand::ChooseBike {
            bike_id: String::from("bike-7"),
        },
        employee_actor(),
        test_cause(),
        now,
    )
    .expect("choose bike should apply");

    assert_eq!(result.new_record.step, Some(BikeStep::ChooseBike));
    assert_eq!(result.new_record.bike_id, Some(String::from("bike-7")));
    assert_eq!(result.new_record.updated_at, now);
    assert_eq!(
        derive_benefit_status(&result.new_record),
        BenefitStatus::Searching
    );
}

#[test]
fn test_full_enrollment_reaches_active() {
    let record = committed_record();
    let record = must_apply(
        &record,
        BenefitCommand::RecordDelivery,
        datetime!(2026-02-01 12:00 UTC),
    );

    assert_eq!(record.step, Some(BikeStep::PickupDelivery));
    assert!(record.delivered_at.is_some());
    assert_eq!(derive_benefit_status(&record), BenefitStatus::Active);
}

#[test]
fn test_notification_turns_booked_test_into_testing() {
    let record = blank_record();
    let record = must_apply(
        &record,
        BenefitCommand::ChooseBike {
            bike_id: String::from("bike-7"),
        },
        datetime!(2026-01-10 10:00 UTC),
    );
    let record = must_apply(
        &record,
        BenefitCommand::BookLiveTest {
            location_name: String::from("City Hub"),
            location_coords: None,
        },
        datetime!(2026-01-12 10:00 UTC),
    );
    assert_eq!(derive_benefit_status(&record), BenefitStatus::Searching);

    let record = must_apply(
        &record,
        BenefitCommand::RecordLiveTestNotification,
        datetime!(2026-01-12 10:05 UTC),
    );
    assert_eq!(derive_benefit_status(&record), BenefitStatus::Testing);
}

#[test]
fn test_book_live_test_requires_a_chosen_bike() {
    let result = apply(
        &blank_record(),
        BenefitCommand::BookLiveTest {
            location_name: String::from("City Hub"),
            location_coords: None,
        },
        employee_actor(),
        test_cause(),
        t0(),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::MissingPrerequisite { field: "bike_id" }
        ))
    );
}

#[test]
fn test_delivery_requires_commitment() {
    let result = apply(
        &blank_record(),
        BenefitCommand::RecordDelivery,
        hr_actor(),
        test_cause(),
        t0(),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::MissingPrerequisite {
                field: "committed_at"
            }
        ))
    );
}

#[test]
fn test_step_marker_never_moves_backward() {
    let record = committed_record();

    let result = apply(
        &record,
        BenefitCommand::BookLiveTest {
            location_name: String::from("Other Hub"),
            location_coords: None,
        },
        employee_actor(),
        test_cause(),
        datetime!(2026-02-01 12:00 UTC),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::StepRegression { .. }))
    ));
}

#[test]
fn test_rechoosing_a_bike_at_the_same_step_is_allowed() {
    let record = blank_record();
    let record = must_apply(
        &record,
        BenefitCommand::ChooseBike {
            bike_id: String::from("bike-7"),
        },
        datetime!(2026-01-10 10:00 UTC),
    );
    let record = must_apply(
        &record,
        BenefitCommand::ChooseBike {
            bike_id: String::from("bike-8"),
        },
        datetime!(2026-01-11 10:00 UTC),
    );

    assert_eq!(record.bike_id, Some(String::from("bike-8")));
    assert_eq!(record.step, Some(BikeStep::ChooseBike));
}

#[test]
fn test_set_once_timestamps_reject_a_second_write() {
    let record = committed_record();

    let result = apply(
        &record,
        BenefitCommand::CommitToBike,
        employee_actor(),
        test_cause(),
        datetime!(2026-02-01 12:00 UTC),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::TimestampAlreadySet {
                field: "committed_at"
            }
        ))
    );
}

#[test]
fn test_terminated_record_is_frozen() {
    let record = committed_record();
    let record = must_apply(
        &record,
        BenefitCommand::TerminateBenefit,
        datetime!(2026-02-01 12:00 UTC),
    );
    assert_eq!(derive_benefit_status(&record), BenefitStatus::Terminated);

    // No command gets through a frozen record, including repeats of the
    // administrative ones.
    let commands = vec![
        BenefitCommand::ChooseBike {
            bike_id: String::from("bike-9"),
        },
        BenefitCommand::CommitToBike,
        BenefitCommand::RequestContract,
        BenefitCommand::RecordDelivery,
        BenefitCommand::TerminateBenefit,
        BenefitCommand::FileInsuranceClaim,
    ];

    for command in commands {
        let result = apply(
            &record,
            command,
            hr_actor(),
            test_cause(),
            datetime!(2026-02-02 12:00 UTC),
        );
        assert!(matches!(
            result,
            Err(CoreError::DomainViolation(DomainError::RecordFrozen { .. }))
        ));
    }
}

#[test]
fn test_insurance_claim_freezes_the_record() {
    let record = committed_record();
    let record = must_apply(
        &record,
        BenefitCommand::FileInsuranceClaim,
        datetime!(2026-02-01 12:00 UTC),
    );
    assert_eq!(derive_benefit_status(&record), BenefitStatus::InsuranceClaim);

    let result = apply(
        &record,
        BenefitCommand::RecordDelivery,
        hr_actor(),
        test_cause(),
        datetime!(2026-02-02 12:00 UTC),
    );
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::RecordFrozen { .. }))
    ));
}

#[test]
fn test_failed_transition_has_no_side_effects() {
    let record = committed_record();
    let reference = record.clone();

    let result = apply(
        &record,
        BenefitCommand::CommitToBike,
        employee_actor(),
        test_cause(),
        datetime!(2026-02-01 12:00 UTC),
    );

    assert!(result.is_err());
    assert_eq!(record, reference);
}

#[test]
fn test_transition_produces_audit_event() {
    let record = blank_record();

    let result = apply(
        &record,
        BenefitCommand::ChooseBike {
            bike_id: String::from("bike-7"),
        },
        employee_actor(),
        test_cause(),
        datetime!(2026-01-10 10:00 UTC),
    )
    .expect("choose bike should apply");

    let event = &result.audit_event;
    assert_eq!(event.action.name, "ChooseBike");
    assert_eq!(event.actor.id, "user-1");
    assert_eq!(event.user_id, "user-1");
    assert!(event.before.data.contains("benefit_status=inactive"));
    assert!(event.after.data.contains("benefit_status=searching"));
}

#[test]
fn test_administrative_command_classification() {
    assert!(!BenefitCommand::ChooseBike {
        bike_id: String::from("bike-7")
    }
    .is_administrative());
    assert!(!BenefitCommand::SignContractAsEmployee.is_administrative());
    assert!(BenefitCommand::SignContractAsEmployer.is_administrative());
    assert!(BenefitCommand::RecordDelivery.is_administrative());
    assert!(BenefitCommand::TerminateBenefit.is_administrative());
    assert!(BenefitCommand::FileInsuranceClaim.is_administrative());
}
