// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contract status tracking and transition logic.
//!
//! The contract signing chain is strictly linear; each status has exactly
//! one legal successor. Termination is an absorbing administrative state
//! reachable from any other status.

use crate::benefit::BenefitRecord;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of the benefit contract's approval sub-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Contract not yet generated.
    #[default]
    NotStarted,
    /// Employee has viewed the contract.
    ViewedByEmployee,
    /// Employee has signed.
    SignedByEmployee,
    /// Employer has signed (always after the employee).
    SignedByEmployer,
    /// Both parties signed, fully executed.
    Approved,
    /// Contract terminated by HR.
    Terminated,
}

impl ContractStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::ViewedByEmployee => "viewed_by_employee",
            Self::SignedByEmployee => "signed_by_employee",
            Self::SignedByEmployer => "signed_by_employer",
            Self::Approved => "approved",
            Self::Terminated => "terminated",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "not_started" => Ok(Self::NotStarted),
            "viewed_by_employee" => Ok(Self::ViewedByEmployee),
            "signed_by_employee" => Ok(Self::SignedByEmployee),
            "signed_by_employer" => Ok(Self::SignedByEmployer),
            "approved" => Ok(Self::Approved),
            "terminated" => Ok(Self::Terminated),
            _ => Err(DomainError::InvalidContractStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns the next expected status in the signing chain.
    ///
    /// `Approved` and `Terminated` have no successor.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::ViewedByEmployee),
            Self::ViewedByEmployee => Some(Self::SignedByEmployee),
            Self::SignedByEmployee => Some(Self::SignedByEmployer),
            Self::SignedByEmployer => Some(Self::Approved),
            Self::Approved | Self::Terminated => None,
        }
    }

    /// Returns true if this status is terminal for the signing chain.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Terminated)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Each status has exactly one legal forward transition; termination
    /// is additionally reachable from any status except itself. A write
    /// that would skip a stage or move the status backward must fail
    /// rather than silently apply.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidContractTransition` if the transition
    /// is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if new_status == Self::Terminated {
            if *self == Self::Terminated {
                return Err(DomainError::InvalidContractTransition {
                    from: self.as_str().to_string(),
                    to: new_status.as_str().to_string(),
                    reason: String::from("contract is already terminated"),
                });
            }
            return Ok(());
        }

        if self.next() == Some(new_status) {
            return Ok(());
        }

        let reason: String = if self.is_terminal() {
            String::from("cannot transition from terminal state")
        } else {
            String::from("signing stages cannot be skipped or reordered")
        };

        Err(DomainError::InvalidContractTransition {
            from: self.as_str().to_string(),
            to: new_status.as_str().to_string(),
            reason,
        })
    }
}

impl FromStr for ContractStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derives the contract status from a record's contract timestamps.
///
/// The persisted `contract_status` field is authoritative; this view
/// exists for the read path and as a consistency check. Later stages win
/// over earlier ones, and termination wins over everything.
#[must_use]
pub const fn derive_contract_status(record: &BenefitRecord) -> ContractStatus {
    if record.contract_terminated_at.is_some() {
        return ContractStatus::Terminated;
    }
    if record.contract_approved_at.is_some() {
        return ContractStatus::Approved;
    }
    if record.contract_employer_signed_at.is_some() {
        return ContractStatus::SignedByEmployer;
    }
    if record.contract_employee_signed_at.is_some() {
        return ContractStatus::SignedByEmployee;
    }
    if record.contract_viewed_at.is_some() {
        return ContractStatus::ViewedByEmployee;
    }
    ContractStatus::NotStarted
}
