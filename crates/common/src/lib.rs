//! Common utilities and Ethereum plumbing shared across the Crucible codebase.
//!
//! This crate provides shared functionality for the Crucible sandbox helpers,
//! including hex/string conversion, HTTP fetching, the sandbox RPC provider,
//! receipt waiters, and event log decoding.

/// Errors shared by the common utilities.
pub mod error;

/// Utilities for interacting with Ethereum, including the sandbox provider,
/// receipt polling, and event log decoding.
pub mod ether;

/// General utility functions and types for common tasks.
pub mod utils;
