//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components expose shared session state to the app tree through Leptos
//! context providers.

pub mod auth_provider;
