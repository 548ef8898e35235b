//! # Printer Module
//!
//! This module provides printer-specific configurations.
//!
//! ## Modules
//!
//! - [`dialect`]: Command dialect tables
//! - [`config`]: Printer models and USB vendor lookup

pub mod config;
pub mod dialect;

pub use config::PrinterModel;
pub use dialect::DialectProfile;
