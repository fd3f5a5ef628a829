// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A command represents intent to advance a benefit record as data only.
///
/// Commands are the only way to request state changes. Each command maps
/// to exactly one step marker update and/or one set-once timestamp;
/// whether a command may be applied is decided by [`crate::apply`], and
/// whether a caller may issue it is decided by the API layer's
/// authorization service based on the command's class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BenefitCommand {
    /// Employee selects (or re-selects) a bike to pursue.
    ChooseBike {
        /// The chosen bike identifier.
        bike_id: String,
    },
    /// Employee books a live test ride at a location.
    BookLiveTest {
        /// Display name of the test location.
        location_name: String,
        /// Coordinates of the test location, if known.
        location_coords: Option<String>,
    },
    /// The live-test WhatsApp notification went out to the employee.
    RecordLiveTestNotification,
    /// Employee checks in at the live test.
    CheckInLiveTest,
    /// Employee commits to the chosen bike.
    CommitToBike,
    /// Employee requests their benefit contract.
    RequestContract,
    /// Employee views the contract for the first time.
    ViewContract,
    /// Employee signs the contract.
    SignContractAsEmployee,
    /// Employer countersigns the contract. Never before the employee.
    SignContractAsEmployer,
    /// The fully signed contract is approved.
    ApproveContract,
    /// HR terminates the contract.
    TerminateContract,
    /// The bike is delivered to the employee.
    RecordDelivery,
    /// HR terminates the benefit. Freezes the record.
    TerminateBenefit,
    /// HR files an insurance claim against the benefit. Freezes the record.
    FileInsuranceClaim,
}

impl BenefitCommand {
    /// Returns the action name of this command for audit attribution.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ChooseBike { .. } => "ChooseBike",
            Self::BookLiveTest { .. } => "BookLiveTest",
            Self::RecordLiveTestNotification => "RecordLiveTestNotification",
            Self::CheckInLiveTest => "CheckInLiveTest",
            Self::CommitToBike => "CommitToBike",
            Self::RequestContract => "RequestContract",
            Self::ViewContract => "ViewContract",
            Self::SignContractAsEmployee => "SignContractAsEmployee",
            Self::SignContractAsEmployer => "SignContractAsEmployer",
            Self::ApproveContract => "ApproveContract",
            Self::TerminateContract => "TerminateContract",
            Self::RecordDelivery => "RecordDelivery",
            Self::TerminateBenefit => "TerminateBenefit",
            Self::FileInsuranceClaim => "FileInsuranceClaim",
        }
    }

    /// Returns true if this command is administrative.
    ///
    /// Administrative commands are issued by HR or the employer side and
    /// require an elevated role; the rest are employee self-service.
    #[must_use]
    pub const fn is_administrative(&self) -> bool {
        matches!(
            self,
            Self::RecordLiveTestNotification
                | Self::SignContractAsEmployer
                | Self::ApproveContract
                | Self::TerminateContract
                | Self::RecordDelivery
                | Self::TerminateBenefit
                | Self::FileInsuranceClaim
        )
    }
}
