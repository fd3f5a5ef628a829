// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use velo_benefit_domain::{Company, EmailAddress, EmployeeProfile, ProfileStatus};
use velo_benefit_store::MemoryStore;

/// Builds a structurally valid bearer token carrying the given claims.
///
/// The signature segment is junk on purpose: decoding trusts the issuer
/// and never verifies it.
pub fn bearer_token(sub: &str, role: Option<&str>) -> String {
    let header: String = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"none\",\"typ\":\"JWT\"}");
    let payload_json: String = role.map_or_else(
        || format!("{{\"sub\":\"{sub}\"}}"),
        |role| format!("{{\"sub\":\"{sub}\",\"user_role\":\"{role}\"}}"),
    );
    let payload: String = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
    format!("Bearer {header}.{payload}.signature")
}

/// Builds a store seeded with one HR uploader in company-a.
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .seed_company(Company {
            id: String::from("company-a"),
            name: String::from("Acme"),
            monthly_subsidy: 50,
            contract_months: 36,
        })
        .await;
    store
        .seed_profile(EmployeeProfile {
            user_id: String::from("hr-1"),
            email: EmailAddress::new("hr@acme.com").expect("valid email"),
            company_id: Some(String::from("company-a")),
            status: ProfileStatus::Active,
        })
        .await;
    store.seed_role("hr-1", "hr").await;
    store
}
