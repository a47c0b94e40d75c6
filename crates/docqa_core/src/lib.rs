pub mod chunking;
pub mod config;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod ingest;
pub mod merge;
pub mod sentinel;
