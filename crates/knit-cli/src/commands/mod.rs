//! Command implementations for the knit CLI.
//!
//! - [`build`] - Build the bundles in the config file
//! - [`bundle`] - One-off bundle from arguments
//! - [`check`] - Configuration validation
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod build;
pub mod bundle;
pub mod check;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use bundle::execute as bundle_execute;
pub use check::execute as check_execute;
