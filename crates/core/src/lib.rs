//! DigitDraw Core - Shared types library.
//!
//! This crate provides common types used across all DigitDraw components:
//! - `web` - The public-facing application server
//! - `cli` - Command-line tools for migrations and credit reconciliation
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, credit balances, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
