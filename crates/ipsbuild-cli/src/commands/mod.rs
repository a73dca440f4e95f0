pub mod build;
pub mod config;
pub mod parse;
pub mod version;
