//! Background job scheduler and job implementations.

mod expiry_scan;
mod pending_reminder;
mod scheduler;

pub use expiry_scan::ExpiryScanJob;
pub use pending_reminder::PendingReminderJob;
pub use scheduler::JobScheduler;
