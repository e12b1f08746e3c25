//! Shared utilities for the Facility Manager backend.
//!
//! This crate provides functionality used across the other crates:
//! - Token hashing and opaque token generation
//! - JWT access/refresh tokens
//! - Password hashing with Argon2id and password policy
//! - Page-based pagination math
//! - Reusable field validators

pub mod crypto;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
