//! Repository implementations.

pub mod expiry_notice;
pub mod invitation;
pub mod library;
pub mod manager;
pub mod media_request;
pub mod user;

pub use expiry_notice::ExpiryNoticeRepository;
pub use invitation::InvitationRepository;
pub use library::LibraryRepository;
pub use manager::ManagerRepository;
pub use media_request::{MediaRequestRepository, PromotionResult, RejectionResult};
pub use user::{CascadeOutcome, UserRepository};
