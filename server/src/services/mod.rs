//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own persistence, export and notification concerns so
//! route handlers stay focused on request validation and status mapping.

pub mod csv;
pub mod file_store;
pub mod memory_store;
pub mod notify;
pub mod persistence;
pub mod pg_store;
