//! Core types for Juniper Commerce.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod role;

pub use address::{Address, AddressType};
pub use email::{Email, EmailError};
pub use id::*;
pub use role::Role;
