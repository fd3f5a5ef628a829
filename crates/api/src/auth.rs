// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Credential decoding and role-based authorization.
//!
//! Credentials are bearer tokens issued by a hosted identity provider.
//! The transport layer has already authenticated the issuer, so the
//! payload is decoded and trusted without local signature verification.
//! What is NOT trusted is the embedded role claim: it may be stale, so
//! authorization always consults the role store as the authority and the
//! claim only serves as a cheap first gate.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use tracing::warn;
use velo_benefit::BenefitCommand;
use velo_benefit_store::{ProfileStore, RoleAssignment, RoleStore};

use crate::error::{ApiError, AuthError};

/// Caller roles for authorization.
///
/// Roles describe what an authenticated caller may do. Employees act on
/// their own enrollment only; HR and admins hold administrative
/// authority over their company's enrollments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: full administrative authority.
    Admin,
    /// HR role: onboarding and benefit administration for one company.
    Hr,
    /// Employee role: self-service actions on the caller's own record.
    Employee,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Hr => "hr",
            Self::Employee => "employee",
        }
    }

    /// Parses a role from a claim string.
    ///
    /// Unknown role names parse to `None` rather than an error: a stale
    /// or foreign claim simply fails the allow-list check downstream.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "hr" => Some(Self::Hr),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Roles allowed to run bulk onboarding by default.
pub const DEFAULT_INVITE_ROLES: &[Role] = &[Role::Hr, Role::Admin];

/// Claims decoded from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerClaims {
    /// The identity provider subject identifier.
    pub subject: String,
    /// The embedded role claim, if present and recognized.
    pub role: Option<Role>,
}

/// Raw claim payload as carried by the credential.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<String>,
    user_role: Option<String>,
}

/// Decodes the claims of a bearer credential without verifying it.
///
/// Signature verification is delegated to the identity provider that
/// issued the credential; this function only requires the token to be
/// structurally sound and to carry a subject.
///
/// # Arguments
///
/// * `header` - The raw `Authorization` header value, if present
///
/// # Errors
///
/// Returns `AuthError::MissingCredential` if no header was presented,
/// or `AuthError::MalformedCredential` if the token cannot be decoded
/// or carries no subject.
pub fn decode_bearer_claims(header: Option<&str>) -> Result<BearerClaims, AuthError> {
    let header: &str = header.ok_or(AuthError::MissingCredential)?;

    let token: &str = match header.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => &header[7..],
        _ => header,
    };

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::MalformedCredential {
            reason: String::from("token does not have three segments"),
        });
    }

    let payload: Vec<u8> =
        URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|e| AuthError::MalformedCredential {
                reason: format!("payload is not valid base64url: {e}"),
            })?;

    let raw: RawClaims =
        serde_json::from_slice(&payload).map_err(|e| AuthError::MalformedCredential {
            reason: format!("payload is not a valid claim set: {e}"),
        })?;

    let subject: String = match raw.sub {
        Some(sub) if !sub.is_empty() => sub,
        _ => {
            return Err(AuthError::MalformedCredential {
                reason: String::from("claim set carries no subject"),
            });
        }
    };

    let role: Option<Role> = raw.user_role.as_deref().and_then(Role::parse);
    if role.is_none()
        && let Some(claimed) = raw.user_role
    {
        warn!(subject = %subject, claimed = %claimed, "Unrecognized role claim");
    }

    Ok(BearerClaims { subject, role })
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// The reason code attached to every authorization refusal.
    const NO_PERMISSION: &'static str = "no_permission_to_access_this_data";

    /// Checks if a caller is authorized to run bulk onboarding.
    ///
    /// The check is two-fold: the role claim embedded in the credential
    /// must be in the allow-list, AND the role store must confirm the
    /// subject currently holds one of the allowed roles. The embedded
    /// claim may be stale; the store is authoritative.
    ///
    /// # Arguments
    ///
    /// * `role_store` - The authoritative role store
    /// * `claims` - The caller's decoded claims
    /// * `allowed` - The roles permitted to run bulk onboarding
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` if either check fails, or
    /// `ApiError::RoleLookupFailed` if the role store cannot be queried.
    pub async fn authorize_bulk_invite(
        role_store: &dyn RoleStore,
        claims: &BearerClaims,
        allowed: &[Role],
    ) -> Result<(), ApiError> {
        let claim_permits: bool = claims.role.is_some_and(|role| allowed.contains(&role));
        if !claim_permits {
            return Err(ApiError::Forbidden {
                reason: String::from(Self::NO_PERMISSION),
            });
        }

        let role_names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
        let assignments: Vec<RoleAssignment> = role_store
            .roles_for_subject(&claims.subject, &role_names)
            .await
            .map_err(|e| ApiError::RoleLookupFailed {
                message: e.to_string(),
            })?;

        if assignments.is_empty() {
            return Err(ApiError::Forbidden {
                reason: String::from(Self::NO_PERMISSION),
            });
        }

        Ok(())
    }

    /// Checks if a caller may issue a benefit command.
    ///
    /// Administrative commands require the HR or admin role. Self-service
    /// commands are open to every role, but employees may only act on
    /// their own record.
    ///
    /// # Arguments
    ///
    /// * `claims` - The caller's decoded claims
    /// * `command` - The command being issued
    /// * `target_user_id` - The record the command is aimed at
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` if the caller's role does not permit
    /// the command, or if an employee targets another employee's record.
    pub fn authorize_benefit_command(
        claims: &BearerClaims,
        command: &BenefitCommand,
        target_user_id: &str,
    ) -> Result<(), ApiError> {
        let Some(role) = claims.role else {
            return Err(ApiError::Forbidden {
                reason: String::from(Self::NO_PERMISSION),
            });
        };

        let elevated: bool = matches!(role, Role::Admin | Role::Hr);
        if command.is_administrative() && !elevated {
            return Err(ApiError::Forbidden {
                reason: String::from(Self::NO_PERMISSION),
            });
        }

        if !elevated && claims.subject != target_user_id {
            return Err(ApiError::Forbidden {
                reason: String::from(Self::NO_PERMISSION),
            });
        }

        Ok(())
    }

    /// Resolves the caller's own company from the tenant store.
    ///
    /// Every row written in a bulk onboarding batch is stamped with this
    /// company id; uploaded data can never target another tenant.
    ///
    /// # Arguments
    ///
    /// * `profiles` - The tenant/profile store
    /// * `subject_id` - The caller's subject identifier
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ProfileNotFound` if the caller has no profile,
    /// `ApiError::NoCompanyAssigned` if the profile lacks a company, or
    /// `ApiError::ProfileLookupFailed` if the store cannot be queried.
    pub async fn resolve_company(
        profiles: &dyn ProfileStore,
        subject_id: &str,
    ) -> Result<String, ApiError> {
        let profile = profiles
            .find_by_subject(subject_id)
            .await
            .map_err(|e| ApiError::ProfileLookupFailed {
                message: e.to_string(),
            })?
            .ok_or(ApiError::ProfileNotFound)?;

        profile.company_id.ok_or(ApiError::NoCompanyAssigned)
    }
}
