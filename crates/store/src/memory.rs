// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process store used for tests and local runs.
//!
//! Emulates the production store's observable behavior, including the
//! case-insensitive unique constraint on invite email. All state sits
//! behind one mutex, so the check-and-write pair for a given email is a
//! single atomic unit.

use async_trait::async_trait;
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use velo_benefit_domain::{BenefitRecord, Company, EmailAddress, EmployeeProfile, ProfileStatus};

use crate::error::StoreError;
use crate::records::{NewInvite, RoleAssignment, StoredInvite};
use crate::stores::{BenefitStore, InviteStore, ProfileStore, RoleStore};

/// Mutable store state. Invites are keyed by normalized email, which is
/// what makes the unique constraint case-insensitive.
#[derive(Debug, Default)]
struct Inner {
    invites: HashMap<String, StoredInvite>,
    roles: Vec<RoleAssignment>,
    profiles: HashMap<String, EmployeeProfile>,
    companies: HashMap<String, Company>,
    benefits: HashMap<String, BenefitRecord>,
    next_invite_id: u64,
}

/// In-memory implementation of every store interface.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a role to a subject.
    pub async fn seed_role(&self, user_id: &str, role: &str) {
        let mut inner = self.inner.lock().await;
        inner.roles.push(RoleAssignment {
            user_id: user_id.to_string(),
            role: role.to_string(),
        });
    }

    /// Registers an employee profile.
    pub async fn seed_profile(&self, profile: EmployeeProfile) {
        let mut inner = self.inner.lock().await;
        inner.profiles.insert(profile.user_id.clone(), profile);
    }

    /// Registers a company.
    pub async fn seed_company(&self, company: Company) {
        let mut inner = self.inner.lock().await;
        inner.companies.insert(company.id.clone(), company);
    }

    /// Stores a benefit record directly.
    pub async fn seed_benefit(&self, record: BenefitRecord) {
        let mut inner = self.inner.lock().await;
        inner.benefits.insert(record.user_id.clone(), record);
    }

    /// Returns the number of invites currently stored.
    pub async fn invite_count(&self) -> usize {
        self.inner.lock().await.invites.len()
    }
}

#[async_trait]
impl InviteStore for MemoryStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredInvite>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.invites.get(email.value()).cloned())
    }

    async fn create(&self, invite: NewInvite) -> Result<StoredInvite, StoreError> {
        let mut inner = self.inner.lock().await;

        let key: String = invite.email.value().to_string();
        if inner.invites.contains_key(&key) {
            return Err(StoreError::Conflict { email: key });
        }

        inner.next_invite_id += 1;
        let stored = StoredInvite {
            invite_id: format!("invite-{}", inner.next_invite_id),
            email: invite.email,
            first_name: invite.first_name,
            last_name: invite.last_name,
            description: invite.description,
            department: invite.department,
            hire_date: invite.hire_date,
            company_id: invite.company_id,
            status: ProfileStatus::Inactive,
            invited_at: OffsetDateTime::now_utc(),
        };
        inner.invites.insert(key, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn roles_for_subject(
        &self,
        subject_id: &str,
        roles: &[&str],
    ) -> Result<Vec<RoleAssignment>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .roles
            .iter()
            .filter(|a| a.user_id == subject_id && roles.contains(&a.role.as_str()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<EmployeeProfile>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.profiles.get(subject_id).cloned())
    }

    async fn find_company(&self, company_id: &str) -> Result<Option<Company>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.companies.get(company_id).cloned())
    }
}

#[async_trait]
impl BenefitStore for MemoryStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<BenefitRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.benefits.get(user_id).cloned())
    }

    async fn upsert(&self, record: &BenefitRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.benefits.insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    async fn list_for_company(&self, company_id: &str) -> Result<Vec<BenefitRecord>, StoreError> {
        let inner = self.inner.lock().await;
        let records: Vec<BenefitRecord> = inner
            .benefits
            .values()
            .filter(|record| {
                inner
                    .profiles
                    .get(&record.user_id)
                    .is_some_and(|p| p.company_id.as_deref() == Some(company_id))
            })
            .cloned()
            .collect();
        Ok(records)
    }
}
