#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
mod time;

pub use api::{AppState, router};
pub use config::Config;
pub use error::ServiceError;
