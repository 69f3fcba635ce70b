//! Observability
//!
//! Structured deploy audit events for operational visibility.

pub mod audit;
