//! Domain layer for the StreamRequest backend.
//!
//! This crate contains:
//! - Domain models (User, Invitation, MediaRequest, LibraryItem, ExpiryNotice)
//! - Collaborator traits for the media catalog and SMS delivery
//! - Domain error types

pub mod models;
pub mod services;
