//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external media providers.

pub mod storage;
