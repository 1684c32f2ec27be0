//! `okr` command-line dashboard.
//!
//! # Responsibility
//! - Parse commands and drive an `ObjectiveStore` over `HttpOkrApi`.
//! - Render objectives as plain text rows.
//!
//! # Exit codes
//! - `0`: command succeeded.
//! - `1`: remote failure, bad input, unknown objective or reverted mutation.
//! - `2`: configuration or logging setup error.

pub mod cli;
mod error;
pub mod render;

pub use cli::{execute, Cli, Command};
pub use error::CliError;
