//! Unattended Adobe Acrobat Pro installer
//!
//! This library provides the registry, download, extraction and installer
//! steps used by the `acrobat-installer` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
