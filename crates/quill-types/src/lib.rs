//! # quill-types
//!
//! Shared types, errors, and configuration for the **Quill** escrow ledger.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`RequestId`], [`AccountId`], [`MessageHash`]
//! - **Request model**: [`Request`], [`RequestState`]
//! - **Events**: [`LedgerEvent`], [`EventLog`]
//! - **Configuration**: [`DeskConfig`]
//! - **Errors**: [`QuillError`] with `QL_ERR_` prefix codes
//! - **Constants**: digest domain tags and protocol limits

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod request;

// Re-export all primary types at crate root for ergonomic imports:
//   use quill_types::{Request, RequestId, AccountId, QuillError, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use request::*;

// Constants are accessed via `quill_types::constants::FOO`
// (not re-exported to avoid name collisions).
