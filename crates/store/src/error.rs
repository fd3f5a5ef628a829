// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors surfaced by the external store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store request failed: {0}")]
    Transport(String),
    /// The store answered with a non-success status.
    #[error("store returned status {status}: {body}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },
    /// A write hit the unique email constraint.
    ///
    /// This is the store acting as the final authority on deduplication;
    /// callers treat it as "already exists", never as a hard failure.
    #[error("an invite for '{email}' already exists")]
    Conflict {
        /// The conflicting email address.
        email: String,
    },
    /// The store's response could not be decoded into the expected shape.
    #[error("failed to decode store response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
