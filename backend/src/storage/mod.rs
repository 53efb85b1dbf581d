//! # Storage Module
//!
//! Durable, owner-scoped persistence for every entity collection.
//!
//! - **traits**: the `EntityStore` abstraction the domain layer depends on
//! - **connection**: SQLite pool setup and schema
//! - **entity_repository**: generic SQLite implementation of `EntityStore`

pub mod connection;
pub mod entity_repository;
pub mod traits;

pub use connection::DbConnection;
pub use entity_repository::EntityRepository;
pub use traits::{EntityStore, RecordChange};
