//! Domain layer - catalogs, generators and run orchestration

pub mod batch;
pub mod context;
pub mod generators;
pub mod repository;
pub mod sampler;
pub mod seasonal;
pub mod service;
pub mod source;

pub use batch::{BatchLoader, PairedBatchLoader, BATCH_SIZE};
pub use context::{GenerationContext, ProductRef, StoreRef};
pub use repository::DocumentSink;
pub use sampler::WeightedSampler;
pub use seasonal::{array_to_seasonal_map, MONTHS};
pub use service::{Pipeline, RunSummary, Sinks};
pub use source::{ProductCatalog, ReferenceCatalog, SourceCatalogs};
