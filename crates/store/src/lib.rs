// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! External store boundary for the Velo Benefit system.
//!
//! The relational store, role registry and tenant registry are external
//! collaborators; this crate defines the typed interfaces the workflow
//! core talks to and ships two implementations:
//!
//! - [`RestStore`] — a PostgREST-style HTTP client, the production path
//! - [`MemoryStore`] — an in-process store used for tests and local runs
//!
//! Every call crosses the boundary with explicit typed request/response
//! structures; no untrusted JSON shape is passed through unvalidated.
//!
//! The store's uniqueness constraint on invite email is the final
//! authority for deduplication. Implementations surface a constraint
//! violation as [`StoreError::Conflict`], which callers fold into an
//! "already exists" outcome rather than an error.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod error;
mod memory;
mod records;
mod rest;
mod stores;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::StoreError;
pub use memory::MemoryStore;
pub use records::{NewInvite, RoleAssignment, StoredInvite};
pub use rest::{RestStore, StoreConfig};
pub use stores::{BenefitStore, InviteStore, ProfileStore, RoleStore};
