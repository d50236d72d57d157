//! Infrastructure layer: document store backends and configuration.

pub mod config;
pub mod document_store;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use document_store::{
    DocumentStore, InMemoryDocumentStore, PostgresDocumentStore, StoreError, StoreResult,
};
