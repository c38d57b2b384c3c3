//! Core types for DigitDraw.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credits;
pub mod email;
pub mod id;
pub mod status;

pub use credits::Credits;
pub use email::{Email, EmailError};
pub use id::*;
pub use status::DrawStatus;
