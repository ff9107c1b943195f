//! Note-taking application library
//!
//! This library provides a note store over a capacity-limited key/value
//! medium, the controller that keeps the active selection consistent with it,
//! and the views, timers and command-line front end built on top.

mod cli;
mod config;
mod controller;
mod debounce;
mod errors;
mod formatting;
mod helper;
mod medium;
mod note;
mod refresh_scheduler;
mod session;
mod stats;
mod storage;
mod types;
mod view;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use controller::*;
pub use debounce::*;
pub use errors::*;
pub use formatting::*;
pub use helper::*;
pub use medium::*;
pub use note::*;
pub use refresh_scheduler::*;
pub use session::*;
pub use stats::*;
pub use storage::*;
pub use types::*;
pub use view::*;
