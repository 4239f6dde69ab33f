pub mod auth;
pub mod placement;
pub mod schools;
pub mod uploads;
pub mod users;
