//! Configuration and profiles
//!
//! Profile definitions, deploy.json loading, and shared type definitions.

pub mod settings;
pub mod types;
