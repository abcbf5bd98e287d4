//! Local job application tracker.
//!
//! The [`tracker`] module holds the record store and its query engine. The remaining modules
//! carry the command-line front end and the configuration and logging it needs.

pub mod cli;
pub mod config;
pub mod error;
pub mod menu;
pub mod render;
pub mod telemetry;
pub mod tracker;

use error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
