//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for the pieces of I/O that sit outside the database.

pub mod storage;
