// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use velo_benefit_audit::{AuditEvent, StateSnapshot};
use velo_benefit_domain::{BenefitRecord, derive_benefit_status};

/// The result of a successful benefit state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. The caller is responsible for persisting the new record
/// and the audit event together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new record after the transition.
    pub new_record: BenefitRecord,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// Converts a record to a snapshot for audit purposes.
#[must_use]
pub(crate) fn snapshot(record: &BenefitRecord) -> StateSnapshot {
    let step: &str = record.step.as_ref().map_or("none", |s| s.as_str());
    StateSnapshot::new(format!(
        "step={step},benefit_status={},contract_status={}",
        derive_benefit_status(record),
        record.contract_status
    ))
}
