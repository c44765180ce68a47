pub mod approval;
pub mod conversation;
pub mod expiry_scan;
pub mod library_admin;
pub mod pending_reminder;
pub mod registration;
pub mod renewal;
pub mod search;
pub mod tmdb;
pub mod twilio;

pub use approval::ApprovalService;
pub use conversation::ConversationService;
pub use expiry_scan::ExpiryScanService;
pub use library_admin::LibraryAdminService;
pub use pending_reminder::PendingReminderService;
pub use registration::RegistrationService;
pub use renewal::RenewalService;
pub use search::SearchService;
pub use tmdb::TmdbCatalog;
pub use twilio::TwilioSmsSender;
