//! # API Shared
//!
//! Shared utilities and definitions for the patient management APIs.
//!
//! Contains:
//! - Wire messages returned by the API surfaces (`messages` module)
//! - Shared services like `InfoService`
//!
//! Used by `api-rest` and the `pms-run` binary.

pub mod health;
pub mod messages;

pub use health::InfoService;
pub use messages::*;
