//! Collaborator traits for external services.

pub mod catalog;
pub mod sms;

pub use catalog::{Catalog, CatalogError, MockCatalog};
pub use sms::{MockSmsSender, SmsResult, SmsSender};
