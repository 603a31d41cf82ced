//! Bazarify Core - Shared types library.
//!
//! This crate provides common types used across all Bazarify components:
//! - `advisor` - The MunshiJi AI business-advisor service
//! - `cli` - Command-line tools for demos and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money, status enums,
//!   and the plain record structs (products, orders, customers) that the
//!   advisor aggregates over

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
