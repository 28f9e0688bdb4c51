//! Integration tests for Juniper Commerce.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p juniper-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_invariants` - Line-merge and total-recompute invariants
//! - `session_tokens` - Token issuance, verification, and lifetimes
//!
//! These tests exercise the library surface in-process; none of them needs a
//! live database or network.
