pub mod config;
pub mod error;
pub mod hal;
pub mod roles;
pub mod session;
