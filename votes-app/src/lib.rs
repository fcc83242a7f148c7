pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod transfer;

mod app_context;

pub use app_context::AppContext;
pub use config::Config;
