//! Command-line front end for the IMEI inventory.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod summary;
