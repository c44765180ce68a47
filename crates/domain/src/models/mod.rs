//! Domain models for StreamRequest.

pub mod expiry_notice;
pub mod invitation;
pub mod library_item;
pub mod media;
pub mod media_request;
pub mod notification;
pub mod user;

pub use expiry_notice::{NoticeItem, NoticeItemStatus, NoticeStatus};
pub use invitation::InvitationStatus;
pub use library_item::LibraryStatus;
pub use media::{CatalogItem, MediaKind};
pub use media_request::{RequestAction, RequestStatus};
pub use user::{PendingInteraction, UserStatus};
