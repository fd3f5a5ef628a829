// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Email address is blank or not syntactically valid.
    InvalidEmail(String),
    /// Hire date could not be parsed as epoch milliseconds or as a date string.
    InvalidHireDate {
        /// The raw value that failed to parse.
        value: String,
        /// The parsing error message.
        reason: String,
    },
    /// Workflow step marker is not recognized.
    InvalidStep(String),
    /// Benefit status string is not recognized.
    InvalidBenefitStatus {
        /// The invalid status string.
        status: String,
    },
    /// Contract status string is not recognized.
    InvalidContractStatus {
        /// The invalid status string.
        status: String,
    },
    /// Profile status string is not recognized.
    InvalidProfileStatus(String),
    /// A contract status transition is not permitted.
    InvalidContractTransition {
        /// The current status.
        from: String,
        /// The attempted status.
        to: String,
        /// Why the transition is not allowed.
        reason: String,
    },
    /// A contract timestamp would be set before an earlier stage's timestamp.
    SigningOrderViolation {
        /// The earlier stage whose timestamp is absent.
        missing: &'static str,
        /// The stage that was attempted.
        attempted: &'static str,
    },
    /// The benefit record is administratively frozen and cannot progress.
    RecordFrozen {
        /// The user the record belongs to.
        user_id: String,
        /// The administrative flag that froze the record.
        flag: &'static str,
    },
    /// The workflow step marker would move backward.
    StepRegression {
        /// The current step.
        from: String,
        /// The attempted step.
        to: String,
    },
    /// A set-once timestamp is already present.
    TimestampAlreadySet {
        /// The timestamp field that is already set.
        field: &'static str,
    },
    /// A field required by the attempted operation is absent.
    MissingPrerequisite {
        /// The field that must be set first.
        field: &'static str,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidHireDate { value, reason } => {
                write!(f, "Failed to parse hire date '{value}': {reason}")
            }
            Self::InvalidStep(msg) => write!(f, "Invalid workflow step: {msg}"),
            Self::InvalidBenefitStatus { status } => {
                write!(f, "Invalid benefit status: {status}")
            }
            Self::InvalidContractStatus { status } => {
                write!(f, "Invalid contract status: {status}")
            }
            Self::InvalidProfileStatus(msg) => write!(f, "Invalid profile status: {msg}"),
            Self::InvalidContractTransition { from, to, reason } => {
                write!(f, "Invalid contract transition from '{from}' to '{to}': {reason}")
            }
            Self::SigningOrderViolation { missing, attempted } => {
                write!(
                    f,
                    "Cannot record '{attempted}' while '{missing}' is absent: signing order is monotonic"
                )
            }
            Self::RecordFrozen { user_id, flag } => {
                write!(
                    f,
                    "Benefit record for user '{user_id}' is frozen by '{flag}' and cannot progress"
                )
            }
            Self::StepRegression { from, to } => {
                write!(f, "Workflow step cannot move backward from '{from}' to '{to}'")
            }
            Self::TimestampAlreadySet { field } => {
                write!(f, "Timestamp '{field}' is already set and may only be set once")
            }
            Self::MissingPrerequisite { field } => {
                write!(f, "Field '{field}' must be set before this operation")
            }
        }
    }
}

impl std::error::Error for DomainError {}
