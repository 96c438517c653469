//! Constructivo Core - Shared types library.
//!
//! This crate provides common types used across all Constructivo components:
//! - `server` - Public site API, admin API, and realtime push (one binary)
//! - `client` - Admin dashboard cache subscriber
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails
//! - [`realtime`] - Wire messages for the admin cache-invalidation channel

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod realtime;
pub mod types;

pub use realtime::*;
pub use types::*;
