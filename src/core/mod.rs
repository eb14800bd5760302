pub mod calendar;
pub mod config;
pub mod converter;
pub mod duplicate;
pub mod log;
pub mod persist;
pub mod refs;
pub mod session;
pub mod staging;
pub mod summary;
pub mod validation;
