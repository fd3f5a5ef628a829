// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use time::OffsetDateTime;
use time::macros::datetime;
use velo_benefit_audit::{Actor, Cause};
use velo_benefit_domain::BenefitRecord;

use crate::{BenefitCommand, TransitionResult, apply};

pub fn employee_actor() -> Actor {
    Actor::new(String::from("user-1"), String::from("employee"))
}

pub fn hr_actor() -> Actor {
    Actor::new(String::from("hr-9"), String::from("hr"))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn t0() -> OffsetDateTime {
    datetime!(2026-01-05 09:00 UTC)
}

pub fn blank_record() -> BenefitRecord {
    BenefitRecord::new(String::from("user-1"), t0())
}

/// Applies a command, panicking on failure. For building up fixtures.
pub fn must_apply(
    record: &BenefitRecord,
    command: BenefitCommand,
    now: OffsetDateTime,
) -> BenefitRecord {
    let result: TransitionResult = apply(record, command, employee_actor(), test_cause(), now)
        .expect("fixture command should apply");
    result.new_record
}

/// Walks a record through the full enrollment up to a committed bike.
pub fn committed_record() -> BenefitRecord {
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
            location_coords: Some(String::from("52.37,4.89")),
        },
        datetime!(2026-01-12 10:00 UTC),
    );
    let record = must_apply(
        &record,
        BenefitCommand::RecordLiveTestNotification,
        datetime!(2026-01-12 10:05 UTC),
    );
    let record = must_apply(
        &record,
        BenefitCommand::CheckInLiveTest,
        datetime!(2026-01-14 15:00 UTC),
    );
    must_apply(
        &record,
        BenefitCommand::CommitToBike,
        datetime!(2026-01-15 09:00 UTC),
    )
}

/// Walks a committed record through the full contract chain to approval.
pub fn approved_record() -> BenefitRecord {
    let record = committed_record();
    let record = must_apply(
        &record,
        BenefitCommand::RequestContract,
        datetime!(2026-01-16 09:00 UTC),
    );
    let record = must_apply(
        &record,
        BenefitCommand::ViewContract,
        datetime!(2026-01-17 09:00 UTC),
    );
    let record = must_apply(
        &record,
        BenefitCommand::SignContractAsEmployee,
        datetime!(2026-01-18 09:00 UTC),
    );
    let record = must_apply(
        &record,
        BenefitCommand::SignContractAsEmployer,
        datetime!(2026-01-19 09:00 UTC),
    );
    must_apply(
        &record,
        BenefitCommand::ApproveContract,
        datetime!(2026-01-20 09:00 UTC),
    )
}
