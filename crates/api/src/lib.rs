// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod ingest;
mod request_response;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use auth::{
    AuthorizationService, BearerClaims, DEFAULT_INVITE_ROLES, Role, decode_bearer_claims,
};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{advance_benefit, benefit_status, benefit_status_summary};
pub use ingest::BulkInvitePipeline;
pub use request_response::{
    AdvanceBenefitRequest, AdvanceBenefitResponse, BenefitStatusResponse, BenefitSummaryResponse,
    IngestReport, IngestRowOutcome, RowStatus, StatusCount,
};
