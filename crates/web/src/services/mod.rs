//! Application services.
//!
//! - [`auth`] - Registration and password login
//! - [`credits`] - The credit engine: atomic debits and purchase credits
//! - [`stripe`] - Payment gateway adapter

pub mod auth;
pub mod credits;
pub mod stripe;
