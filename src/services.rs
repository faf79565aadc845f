pub mod auth;
pub mod email;
pub mod otp;
pub mod projects;
pub mod users;
