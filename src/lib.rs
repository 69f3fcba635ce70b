//! sttctl: deployment and launch tooling for the YouTube STT web service
//!
//! One binary family replaces the service's shell deployment artifacts
//! with a single consistent error policy: every fallible step propagates,
//! and the first failure aborts with a non-zero exit.
//!
//! # Architecture
//!
//! ## Installer ([`install`])
//! - [`install::supervisor`]: supervisord control behind a trait, plus
//!   operator guidance
//! - Digest-verified copy of the program definition into conf.d
//!
//! ## Launcher ([`launch`])
//! - [`launch::environment`]: PORT resolution and redacted secret
//!   presence reporting
//! - [`launch::workdirs`]: idempotent runtime directory preparation
//! - [`launch::server`]: WSGI server argv construction and process
//!   replacement
//!
//! ## Image ([`image`])
//! - [`image::definition`]: the single canonical container build
//!   definition (the historical three drifting variants are consolidated)
//! - [`image::verify`]: materialized-filesystem verification
//!
//! ## Observability ([`observability`])
//! - [`observability::audit`]: structured deploy events
//!
//! ## Configuration ([`config`])
//! - [`config::settings`]: deploy.json loading with field-wise overrides
//! - [`config::types`]: shared profiles and the error taxonomy

// Supervisor config installer
pub mod install;

// Startup launcher
pub mod launch;

// Container build definition
pub mod image;

// Observability
pub mod observability;

// Configuration & profiles
pub mod config;

// CLI entrypoint wiring shared by sttctl/stt-install/stt-launch binaries.
pub mod cli;

// Re-export commonly used types for convenience
pub use config::types::*;

// Root alias kept for existing tests/docs.
pub mod types {
    pub use crate::config::types::*;
}
