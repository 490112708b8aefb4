//! Shopcart Core - Shared types library.
//!
//! This crate provides common types used across all shopcart components:
//! - `client` - Cart, session, storage and REST API client library
//! - `cli` - Command-line front end over the client library
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere, including `wasm32` builds of the client.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
