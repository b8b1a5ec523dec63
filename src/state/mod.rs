//! Client-side session state.
//!
//! DESIGN
//! ======
//! `auth` is the pure state model and reducer, `storage` the persistence seam,
//! and `session` the store that ties both to the gateway.

pub mod auth;
pub mod session;
pub mod storage;
