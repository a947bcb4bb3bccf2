//! Storage layer - document mapping and sinks

pub mod entity;
pub mod mapper;
pub mod memory;
pub mod migrations;
pub mod repositories;

pub use memory::InMemorySink;
pub use repositories::SeaOrmDocumentSink;
