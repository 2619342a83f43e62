//! Live page capture over the Chrome DevTools Protocol

pub mod config;
pub mod session;

pub use config::LaunchOptions;
pub use session::BrowserSession;
