//! Infrastructure layer - document shapes and sink implementations

pub mod storage;
