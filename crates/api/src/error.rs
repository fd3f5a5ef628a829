// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use velo_benefit::CoreError;
use velo_benefit_domain::DomainError;
use velo_benefit_store::StoreError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was presented.
    MissingCredential,
    /// The presented credential could not be decoded.
    MalformedCredential {
        /// Why the credential was rejected.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "No bearer credential was presented"),
            Self::MalformedCredential { reason } => {
                write!(f, "Malformed bearer credential: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract. Each variant maps to one wire-level error code; the server
/// layer adds the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The bearer credential is missing or could not be decoded.
    InvalidCredential {
        /// Why the credential was rejected.
        reason: String,
    },
    /// The caller's role does not permit this action.
    Forbidden {
        /// The machine-readable reason code.
        reason: String,
    },
    /// The caller has no profile in the tenant store.
    ProfileNotFound,
    /// The caller's profile has no company assigned.
    NoCompanyAssigned,
    /// The role store could not be consulted during the gating phase.
    RoleLookupFailed {
        /// A description of the lookup failure.
        message: String,
    },
    /// The tenant store could not be consulted during the gating phase.
    ProfileLookupFailed {
        /// A description of the lookup failure.
        message: String,
    },
    /// A multipart body carried no file part.
    NoFile,
    /// The uploaded CSV content is empty.
    EmptyCsv,
    /// The uploaded CSV has a header but no data rows.
    NoRows,
    /// A required CSV column is missing.
    MissingHeader {
        /// The missing column name.
        missing: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An upstream store call failed outside the gating phase.
    Upstream {
        /// A description of the upstream failure.
        message: String,
    },
}

impl ApiError {
    /// Returns the wire-level error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredential { .. } => "invalid_credential",
            Self::Forbidden { .. } => "forbidden",
            Self::ProfileNotFound => "profile_not_found",
            Self::NoCompanyAssigned => "no_company_assigned",
            Self::RoleLookupFailed { .. } => "role_lookup_failed",
            Self::ProfileLookupFailed { .. } => "profile_fetch_failed",
            Self::NoFile => "no_file",
            Self::EmptyCsv => "empty_csv",
            Self::NoRows => "no_rows",
            Self::MissingHeader { .. } => "missing_header",
            Self::InvalidInput { .. } => "invalid_input",
            Self::ResourceNotFound { .. } => "not_found",
            Self::DomainRuleViolation { .. } => "domain_rule_violation",
            Self::Upstream { .. } => "store_unavailable",
        }
    }

    /// Returns the wire-level reason code, when one applies.
    #[must_use]
    pub fn reason_code(&self) -> Option<&str> {
        match self {
            Self::Forbidden { reason } => Some(reason),
            Self::MissingHeader { missing } => Some(missing),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredential { reason } => {
                write!(f, "Invalid credential: {reason}")
            }
            Self::Forbidden { reason } => write!(f, "Forbidden: {reason}"),
            Self::ProfileNotFound => write!(f, "No profile found for the caller"),
            Self::NoCompanyAssigned => {
                write!(f, "The caller's profile has no company assigned")
            }
            Self::RoleLookupFailed { message } => {
                write!(f, "Role lookup failed: {message}")
            }
            Self::ProfileLookupFailed { message } => {
                write!(f, "Profile lookup failed: {message}")
            }
            Self::NoFile => write!(f, "The multipart body carried no file"),
            Self::EmptyCsv => write!(f, "The uploaded CSV content is empty"),
            Self::NoRows => write!(f, "The uploaded CSV has no data rows"),
            Self::MissingHeader { missing } => {
                write!(f, "Missing required CSV column: {missing}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Upstream { message } => write!(f, "Upstream store failure: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredential => Self::InvalidCredential {
                reason: String::from("no bearer credential presented"),
            },
            AuthError::MalformedCredential { reason } => Self::InvalidCredential { reason },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::InvalidHireDate { value, reason } => ApiError::InvalidInput {
            field: String::from("hire_date"),
            message: format!("Failed to parse '{value}': {reason}"),
        },
        DomainError::InvalidStep(msg) => ApiError::InvalidInput {
            field: String::from("step"),
            message: msg,
        },
        DomainError::InvalidBenefitStatus { status } => ApiError::InvalidInput {
            field: String::from("benefit_status"),
            message: format!("Unknown benefit status '{status}'"),
        },
        DomainError::InvalidContractStatus { status } => ApiError::InvalidInput {
            field: String::from("contract_status"),
            message: format!("Unknown contract status '{status}'"),
        },
        DomainError::InvalidProfileStatus(msg) => ApiError::InvalidInput {
            field: String::from("profile_status"),
            message: msg,
        },
        DomainError::InvalidContractTransition { from, to, reason } => {
            ApiError::DomainRuleViolation {
                rule: String::from("contract_transition_order"),
                message: format!("Cannot move contract from '{from}' to '{to}': {reason}"),
            }
        }
        DomainError::SigningOrderViolation { missing, attempted } => {
            ApiError::DomainRuleViolation {
                rule: String::from("contract_signing_order"),
                message: format!("Cannot record '{attempted}' while '{missing}' is absent"),
            }
        }
        DomainError::RecordFrozen { user_id, flag } => ApiError::DomainRuleViolation {
            rule: String::from("frozen_record"),
            message: format!("Benefit record for user '{user_id}' is frozen by '{flag}'"),
        },
        DomainError::StepRegression { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("monotonic_step_progression"),
            message: format!("Workflow step cannot move backward from '{from}' to '{to}'"),
        },
        DomainError::TimestampAlreadySet { field } => ApiError::DomainRuleViolation {
            rule: String::from("set_once_timestamps"),
            message: format!("Timestamp '{field}' is already set"),
        },
        DomainError::MissingPrerequisite { field } => ApiError::DomainRuleViolation {
            rule: String::from("workflow_prerequisites"),
            message: format!("Field '{field}' must be set before this operation"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Upstream {
            message: err.to_string(),
        }
    }
}
