//! Networking modules for the auth backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls and normalizes responses, `types` defines the
//! wire schema and the persisted session record.

pub mod api;
pub mod types;
