//! Domain model for objectives and their key results.
//!
//! # Responsibility
//! - Define canonical data structures shared by the store, the HTTP client
//!   and the server-side service.
//! - Keep the JSON wire shape (camelCase fields) in one place.
//!
//! # Invariants
//! - Every stored Objective and Key Result is identified by an opaque id.
//! - Deletion is a hard delete; there are no tombstones.

pub mod objective;
