//! Shared utilities and common types for the bot admin backend.
//!
//! This crate provides functionality used across the other crates:
//! - Offset pagination parameters and response metadata
//! - Common validation logic for request payloads
//! - Password hashing with Argon2id for admin accounts
//! - SHA-256 helpers (media checksums, secret comparison)

pub mod crypto;
pub mod pagination;
pub mod password;
pub mod validation;
