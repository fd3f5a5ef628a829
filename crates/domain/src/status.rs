// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Benefit status derivation.
//!
//! Benefit status is a read-only view computed from the record's stored
//! facts. It is never itself a writable field, which prevents status/fact
//! drift and keeps the mapping testable as a pure function.

use crate::benefit::{BenefitRecord, BikeStep};
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The derived classification of a benefit enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitStatus {
    /// Benefit created but not yet started (no step marker).
    Inactive,
    /// Employee is browsing and choosing bikes.
    Searching,
    /// Employee has booked a live test and the notification went out.
    Testing,
    /// Bike delivered, benefit is running.
    Active,
    /// An insurance claim has been filed (manually set by HR).
    InsuranceClaim,
    /// Benefit has been terminated (manually set by HR).
    Terminated,
}

impl BenefitStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Searching => "searching",
            Self::Testing => "testing",
            Self::Active => "active",
            Self::InsuranceClaim => "insurance_claim",
            Self::Terminated => "terminated",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "inactive" => Ok(Self::Inactive),
            "searching" => Ok(Self::Searching),
            "testing" => Ok(Self::Testing),
            "active" => Ok(Self::Active),
            "insurance_claim" => Ok(Self::InsuranceClaim),
            "terminated" => Ok(Self::Terminated),
            _ => Err(DomainError::InvalidBenefitStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal for progression purposes.
    ///
    /// `InsuranceClaim` is an administrative override, not a terminal
    /// state: a record whose claim flag is later cleared resumes normal
    /// derivation.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Active | Self::Terminated)
    }
}

impl FromStr for BenefitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for BenefitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derives the benefit status from a record's stored facts.
///
/// Rules are evaluated top to bottom; the first match wins:
/// 1. Terminated flag set: `Terminated`.
/// 2. Insurance claim flag set: `InsuranceClaim`.
/// 3. At `pickup_delivery` with a recorded delivery: `Active`.
/// 4. At `book_live_test` with the notification sent: `Testing`.
/// 5. Any step marker set: `Searching`.
/// 6. No step marker: `Inactive`.
///
/// This is a pure function of the record's fields. It reads no clock and
/// holds no state; the same record always derives the same status.
#[must_use]
pub const fn derive_benefit_status(record: &BenefitRecord) -> BenefitStatus {
    if record.benefit_terminated_at.is_some() {
        return BenefitStatus::Terminated;
    }
    if record.benefit_insurance_claim_at.is_some() {
        return BenefitStatus::InsuranceClaim;
    }
    match record.step {
        Some(BikeStep::PickupDelivery) if record.delivered_at.is_some() => BenefitStatus::Active,
        Some(BikeStep::BookLiveTest) if record.live_test_whatsapp_sent_at.is_some() => {
            BenefitStatus::Testing
        }
        Some(_) => BenefitStatus::Searching,
        None => BenefitStatus::Inactive,
    }
}
