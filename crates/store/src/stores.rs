// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store interfaces consumed by the workflow core.

use async_trait::async_trait;
use velo_benefit_domain::{BenefitRecord, Company, EmailAddress, EmployeeProfile};

use crate::error::StoreError;
use crate::records::{NewInvite, RoleAssignment, StoredInvite};

/// Invite storage with a global unique constraint on email.
#[async_trait]
pub trait InviteStore: Send + Sync {
    /// Looks up an invite by email, case-insensitively, across the whole
    /// system (not scoped to any company).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<StoredInvite>, StoreError>;

    /// Creates an invite and returns the stored representation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if an invite with the same email
    /// already exists, or another error if the write fails.
    async fn create(&self, invite: NewInvite) -> Result<StoredInvite, StoreError>;
}

/// Role assignments keyed by identity provider subject.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Returns the subject's role assignments restricted to `roles`.
    ///
    /// An empty list means the subject holds none of the requested roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the role store cannot be queried.
    async fn roles_for_subject(
        &self,
        subject_id: &str,
        roles: &[&str],
    ) -> Result<Vec<RoleAssignment>, StoreError>;
}

/// Employee profiles and their owning companies.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Looks up a profile by identity provider subject identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn find_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<EmployeeProfile>, StoreError>;

    /// Looks up a company by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn find_company(&self, company_id: &str) -> Result<Option<Company>, StoreError>;
}

/// Benefit record storage.
#[async_trait]
pub trait BenefitStore: Send + Sync {
    /// Looks up the benefit record for an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn find_by_user(&self, user_id: &str) -> Result<Option<BenefitRecord>, StoreError>;

    /// Writes a benefit record, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn upsert(&self, record: &BenefitRecord) -> Result<(), StoreError>;

    /// Lists all benefit records belonging to a company's employees.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn list_for_company(&self, company_id: &str) -> Result<Vec<BenefitRecord>, StoreError>;
}
