// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The benefit enrollment record and its workflow step marker.

use crate::contract::ContractStatus;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The discrete stage marker of a benefit enrollment's guided workflow.
///
/// The marker only ever moves forward. Which stage an enrollment is
/// *effectively* in is derived from the marker plus the accumulated
/// timestamps; see [`crate::derive_benefit_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BikeStep {
    /// Employee is browsing and choosing a bike.
    ChooseBike,
    /// Employee is booking or attending a live test ride.
    BookLiveTest,
    /// Employee has committed to a specific bike.
    CommitToBike,
    /// Contract signing is in progress.
    SignContract,
    /// Bike pickup or delivery is being arranged.
    PickupDelivery,
}

impl BikeStep {
    /// Returns the string representation of the step.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ChooseBike => "choose_bike",
            Self::BookLiveTest => "book_live_test",
            Self::CommitToBike => "commit_to_bike",
            Self::SignContract => "sign_contract",
            Self::PickupDelivery => "pickup_delivery",
        }
    }

    /// Parses a step from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "choose_bike" => Ok(Self::ChooseBike),
            "book_live_test" => Ok(Self::BookLiveTest),
            "commit_to_bike" => Ok(Self::CommitToBike),
            "sign_contract" => Ok(Self::SignContract),
            "pickup_delivery" => Ok(Self::PickupDelivery),
            _ => Err(DomainError::InvalidStep(s.to_string())),
        }
    }

    /// Returns the position of this step in the guided workflow.
    ///
    /// Used to enforce that the step marker never moves backward.
    #[must_use]
    pub const fn position(&self) -> u8 {
        match self {
            Self::ChooseBike => 0,
            Self::BookLiveTest => 1,
            Self::CommitToBike => 2,
            Self::SignContract => 3,
            Self::PickupDelivery => 4,
        }
    }
}

impl FromStr for BikeStep {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for BikeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One employee's benefit enrollment attempt.
///
/// The record accumulates facts: a workflow step marker plus a set of
/// optional, monotonically set-once timestamps. Statuses are never stored
/// here beyond the validated `contract_status`; the benefit status is a
/// pure derivation over these fields.
///
/// Records are never hard-deleted, only terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitRecord {
    /// The identity provider subject identifier of the employee.
    pub user_id: String,
    /// The chosen bike, once one has been selected.
    pub bike_id: Option<String>,
    /// The current workflow step marker. Absent until the employee starts.
    pub step: Option<BikeStep>,
    /// The persisted contract status, validated for monotonicity on write.
    pub contract_status: ContractStatus,
    /// Display name of the live test location.
    pub live_test_location_name: Option<String>,
    /// Coordinates of the live test location.
    pub live_test_location_coords: Option<String>,
    /// When the live test WhatsApp notification was sent.
    #[serde(with = "time::serde::rfc3339::option")]
    pub live_test_whatsapp_sent_at: Option<OffsetDateTime>,
    /// When the employee checked in for the live test.
    #[serde(with = "time::serde::rfc3339::option")]
    pub live_test_checked_in_at: Option<OffsetDateTime>,
    /// When the employee committed to a bike.
    #[serde(with = "time::serde::rfc3339::option")]
    pub committed_at: Option<OffsetDateTime>,
    /// When the contract was requested.
    #[serde(with = "time::serde::rfc3339::option")]
    pub contract_requested_at: Option<OffsetDateTime>,
    /// When the employee first viewed the contract.
    #[serde(with = "time::serde::rfc3339::option")]
    pub contract_viewed_at: Option<OffsetDateTime>,
    /// When the employee signed the contract.
    #[serde(with = "time::serde::rfc3339::option")]
    pub contract_employee_signed_at: Option<OffsetDateTime>,
    /// When the employer signed the contract. Never before the employee.
    #[serde(with = "time::serde::rfc3339::option")]
    pub contract_employer_signed_at: Option<OffsetDateTime>,
    /// When the fully signed contract was approved.
    #[serde(with = "time::serde::rfc3339::option")]
    pub contract_approved_at: Option<OffsetDateTime>,
    /// When the contract was terminated.
    #[serde(with = "time::serde::rfc3339::option")]
    pub contract_terminated_at: Option<OffsetDateTime>,
    /// When the bike was delivered.
    #[serde(with = "time::serde::rfc3339::option")]
    pub delivered_at: Option<OffsetDateTime>,
    /// When the benefit was administratively terminated.
    #[serde(with = "time::serde::rfc3339::option")]
    pub benefit_terminated_at: Option<OffsetDateTime>,
    /// When an insurance claim was filed against the benefit.
    #[serde(with = "time::serde::rfc3339::option")]
    pub benefit_insurance_claim_at: Option<OffsetDateTime>,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl BenefitRecord {
    /// Creates a new, not-yet-started benefit record for an employee.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The identity provider subject identifier
    /// * `created_at` - The creation timestamp
    #[must_use]
    pub const fn new(user_id: String, created_at: OffsetDateTime) -> Self {
        Self {
            user_id,
            bike_id: None,
            step: None,
            contract_status: ContractStatus::NotStarted,
            live_test_location_name: None,
            live_test_location_coords: None,
            live_test_whatsapp_sent_at: None,
            live_test_checked_in_at: None,
            committed_at: None,
            contract_requested_at: None,
            contract_viewed_at: None,
            contract_employee_signed_at: None,
            contract_employer_signed_at: None,
            contract_approved_at: None,
            contract_terminated_at: None,
            delivered_at: None,
            benefit_terminated_at: None,
            benefit_insurance_claim_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns true if the record is administratively frozen.
    ///
    /// A frozen record accepts no further step progression. The two
    /// administrative flags are set manually by HR and are the only
    /// states not reachable by timestamp derivation alone.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.benefit_terminated_at.is_some() || self.benefit_insurance_claim_at.is_some()
    }

    /// Returns the name of the administrative flag freezing this record.
    #[must_use]
    pub const fn frozen_by(&self) -> Option<&'static str> {
        if self.benefit_terminated_at.is_some() {
            Some("benefit_terminated_at")
        } else if self.benefit_insurance_claim_at.is_some() {
            Some("benefit_insurance_claim_at")
        } else {
            None
        }
    }
}
