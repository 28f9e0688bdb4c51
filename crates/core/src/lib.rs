//! Juniper Core - Shared types library.
//!
//! This crate provides common types used across all Juniper Commerce
//! components:
//! - `api` - REST backend (catalog, accounts, cart)
//! - `integration-tests` - In-process integration tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
