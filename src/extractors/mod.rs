// src/extractors/mod.rs
pub mod page;
pub mod table;
pub mod text;

// Re-export key extraction types for convenience
pub use page::PageExtractor;
