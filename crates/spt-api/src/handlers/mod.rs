pub mod files;
pub mod health;
pub mod messages;
pub mod session;
pub mod uploads;
