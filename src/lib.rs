// ============================================================================
// athledb — Athleland Conditioning Club back-office data service
// ============================================================================
//
// An in-process mock relational store with a chainable query-builder
// contract shaped like a hosted database client, plus the admin services
// and HTTP surface the studio's back-office runs on.

pub mod auth;
pub mod config;
pub mod core;
pub mod office;
pub mod query;
pub mod schema;
pub mod storage;
pub mod web;

// Re-export main types for convenience
pub use auth::{AdminAuth, AdminSession};
pub use core::{Record, Result, StoreError};
pub use query::{DeleteResult, InsertResult, SelectResult, UpdateResult};
pub use storage::{FileBackend, MemoryBackend, MockStore, StorageBackend};
