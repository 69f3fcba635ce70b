//! Container image build definition
//!
//! One canonical, renderable build definition plus verification of a
//! materialized filesystem against it.

pub mod definition;
pub mod verify;

pub use definition::BuildDefinition;
pub use verify::{verify_root, VerifyReport};
