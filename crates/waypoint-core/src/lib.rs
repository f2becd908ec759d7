//! Core types and trait definitions for the Waypoint trip tracker.
//!
//! This crate has no HTTP or database dependencies.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod error;
pub mod patch;
pub mod store;
pub mod trip;
pub mod user;

pub use error::{Error, Result};
