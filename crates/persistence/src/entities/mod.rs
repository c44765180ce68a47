//! Entity definitions (database row mappings).

pub mod expiry_notice;
pub mod invitation;
pub mod library_item;
pub mod manager;
pub mod media_request;
pub mod notification;
pub mod user;

pub use expiry_notice::ExpiryNoticeEntity;
pub use invitation::InvitationEntity;
pub use library_item::LibraryItemEntity;
pub use manager::ManagerEntity;
pub use media_request::MediaRequestEntity;
pub use notification::NotificationEntity;
pub use user::UserEntity;
