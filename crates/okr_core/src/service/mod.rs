//! Server-side use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the REST surface semantics.
//! - Keep the HTTP layer decoupled from storage details.

pub mod okr_service;
pub mod seed;
