//! Shared utilities and common types for the StreamRequest backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Phone number normalization (E.164)
//! - Common validation logic

pub mod phone;
pub mod validation;
