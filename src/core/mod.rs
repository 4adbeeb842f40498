pub mod config;
pub mod download;
pub mod extract;
pub mod installer;
pub mod registry;
