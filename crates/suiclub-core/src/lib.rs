//! suiclub core: the club message codec, error types, and typed views over
//! the chain's JSON responses.
//!
//! This crate carries no transport or runtime dependencies so the codec can
//! be reused by the demo binary, by tests, and by any other client that
//! needs to read or write club messages.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `SuiClubError`/`Result` so malformed
//! bytes or an unexpected RPC response never crash the caller.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, SuiClubError};
