// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! PostgREST-style HTTP store client.
//!
//! Table access goes through `/rest/v1/<table>` with filter query
//! parameters (`column=eq.value`, `column=ilike.value`). Reads return
//! JSON arrays; inserts return the created representation when asked via
//! the `Prefer` header. The service credential authenticates every call;
//! per-user authentication happened upstream at the identity provider.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use velo_benefit_domain::{BenefitRecord, Company, EmailAddress, EmployeeProfile};

use crate::error::StoreError;
use crate::records::{NewInvite, RoleAssignment, StoredInvite};
use crate::stores::{BenefitStore, InviteStore, ProfileStore, RoleStore};

/// Explicit configuration for the REST store.
///
/// Passed into the constructor by the composition root; the store never
/// reads process environment itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the store service, without a trailing slash.
    pub base_url: String,
    /// The service credential presented on every call.
    pub service_key: String,
}

/// HTTP client implementing every store interface against one service.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    config: StoreConfig,
}

impl RestStore {
    /// Creates a new REST store from explicit configuration.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Builds the URL for a table or view.
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.base_url)
    }

    /// Attaches the service credential headers to a request.
    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
    }

    /// Fetches rows matching a single-column filter.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        debug!(table, ?filters, "Querying store");
        let response: Response = self
            .authed(self.client.get(self.table_url(table)))
            .query(filters)
            .send()
            .await?;

        let response: Response = expect_success(response).await?;
        decode_rows(response).await
    }
}

/// Maps a non-success response to a `StoreError`.
async fn expect_success(response: Response) -> Result<Response, StoreError> {
    let status: StatusCode = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: String = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Decodes a JSON array response body.
async fn decode_rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
    response
        .json::<Vec<T>>()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl InviteStore for RestStore {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredInvite>, StoreError> {
        let rows: Vec<StoredInvite> = self
            .select(
                "profile_invites",
                &[("email", format!("ilike.{}", email.value()))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn create(&self, invite: NewInvite) -> Result<StoredInvite, StoreError> {
        let email: String = invite.email.value().to_string();
        let response: Response = self
            .authed(self.client.post(self.table_url("profile_invites")))
            .header("Prefer", "return=representation")
            .json(&invite)
            .send()
            .await?;

        // The unique constraint firing concurrently is equivalent to
        // "already exists", not a hard error.
        if response.status() == StatusCode::CONFLICT {
            return Err(StoreError::Conflict { email });
        }

        let response: Response = expect_success(response).await?;
        let rows: Vec<StoredInvite> = decode_rows(response).await?;
        rows.into_iter().next().ok_or_else(|| {
            StoreError::Decode(String::from("insert returned an empty representation"))
        })
    }
}

#[async_trait]
impl RoleStore for RestStore {
    async fn roles_for_subject(
        &self,
        subject_id: &str,
        roles: &[&str],
    ) -> Result<Vec<RoleAssignment>, StoreError> {
        self.select(
            "user_roles",
            &[
                ("user_id", format!("eq.{subject_id}")),
                ("role", format!("in.({})", roles.join(","))),
            ],
        )
        .await
    }
}

#[async_trait]
impl ProfileStore for RestStore {
    async fn find_by_subject(
        &self,
        subject_id: &str,
    ) -> Result<Option<EmployeeProfile>, StoreError> {
        let rows: Vec<EmployeeProfile> = self
            .select("profiles", &[("user_id", format!("eq.{subject_id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_company(&self, company_id: &str) -> Result<Option<Company>, StoreError> {
        let rows: Vec<Company> = self
            .select("companies", &[("id", format!("eq.{company_id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl BenefitStore for RestStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<BenefitRecord>, StoreError> {
        let rows: Vec<BenefitRecord> = self
            .select("bike_benefits", &[("user_id", format!("eq.{user_id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert(&self, record: &BenefitRecord) -> Result<(), StoreError> {
        let response: Response = self
            .authed(self.client.post(self.table_url("bike_benefits")))
            .header("Prefer", "resolution=merge-duplicates")
            .json(record)
            .send()
            .await?;
        expect_success(response).await?;
        Ok(())
    }

    async fn list_for_company(&self, company_id: &str) -> Result<Vec<BenefitRecord>, StoreError> {
        // `company_benefits` is a store-side view joining benefits to
        // their owning company through the profile table.
        self.select(
            "company_benefits",
            &[("company_id", format!("eq.{company_id}"))],
        )
        .await
    }
}
