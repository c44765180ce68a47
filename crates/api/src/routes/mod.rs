pub mod cron;
pub mod health;
pub mod invites;
pub mod library;
pub mod requests;
pub mod users;
pub mod webhook;
