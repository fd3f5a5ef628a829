// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed records crossing the store boundary.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use velo_benefit_domain::{EmailAddress, ProfileStatus};

/// A new employee invite to be written to the store.
///
/// The `company_id` is always stamped by the ingestion pipeline from the
/// uploader's own tenant; uploaded data never supplies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvite {
    /// The invitee's email address.
    pub email: EmailAddress,
    /// Optional first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Optional last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Optional free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional department name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Optional hire date.
    #[serde(with = "time::serde::rfc3339::option", default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<OffsetDateTime>,
    /// The owning company, resolved from the uploader's profile.
    pub company_id: String,
}

/// An invite as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredInvite {
    /// The store-assigned invite identifier.
    pub invite_id: String,
    /// The invitee's email address.
    pub email: EmailAddress,
    /// Optional first name.
    pub first_name: Option<String>,
    /// Optional last name.
    pub last_name: Option<String>,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional department name.
    pub department: Option<String>,
    /// Optional hire date.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub hire_date: Option<OffsetDateTime>,
    /// The owning company.
    pub company_id: String,
    /// The invite's activation state.
    pub status: ProfileStatus,
    /// When the invite was created.
    #[serde(with = "time::serde::rfc3339")]
    pub invited_at: OffsetDateTime,
}

/// One role granted to a subject in the role store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// The identity provider subject identifier.
    pub user_id: String,
    /// The granted role name.
    pub role: String,
}
