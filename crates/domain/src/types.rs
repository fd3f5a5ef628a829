// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents a validated email address.
///
/// Email is the sole onboarding identifier for an employee and is unique
/// across the whole system, not per company. Addresses are normalized to
/// lowercase to ensure case-insensitive uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress {
    /// The normalized address value.
    value: String,
}

impl EmailAddress {
    /// Creates a new `EmailAddress`.
    ///
    /// The value is trimmed and normalized to lowercase.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw address
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` if the trimmed value is blank
    /// or does not contain an `@`.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidEmail(String::from(
                "address must not be blank",
            )));
        }
        if !trimmed.contains('@') {
            return Err(DomainError::InvalidEmail(format!(
                "'{trimmed}' does not contain '@'"
            )));
        }
        Ok(Self {
            value: trimmed.to_lowercase(),
        })
    }

    /// Returns the normalized address value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for EmailAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Activation state of an employee profile or invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    /// The profile is active.
    Active,
    /// The profile has been created but not activated, or was deactivated.
    Inactive,
}

impl ProfileStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for ProfileStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidProfileStatus(s.to_string())),
        }
    }
}

/// Represents a company (tenant).
///
/// Every profile and therefore every benefit record is owned by exactly
/// one company. The company carries the subsidy terms applied to its
/// employees' contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// The company identifier.
    pub id: String,
    /// The company name.
    pub name: String,
    /// The monthly benefit subsidy, in whole currency units.
    pub monthly_subsidy: u32,
    /// The contract duration in months.
    pub contract_months: u16,
}

/// Represents an employee profile scoped to one company.
///
/// The `user_id` is the identity provider's subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// The identity provider subject identifier.
    pub user_id: String,
    /// The employee's email address.
    pub email: EmailAddress,
    /// The owning company identifier, if assigned.
    pub company_id: Option<String>,
    /// The profile activation state.
    pub status: ProfileStatus,
}
