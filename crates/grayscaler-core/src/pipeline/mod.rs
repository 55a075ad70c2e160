//! Image pair processing pipeline components.
//!
//! - **validate**: Filename and extension gate
//! - **hash**: SHA-256 content fingerprints and cache keys
//! - **transform**: Grayscale conversion to PNG
//! - **store**: Persistence into the output directory
//! - **processor**: Orchestrates the full pipeline per request pair

pub mod hash;
pub mod processor;
pub mod store;
pub mod transform;
pub mod validate;

// Re-exports for convenient access
pub use hash::Hasher;
pub use processor::PairProcessor;
pub use store::{output_filename, OutputStore};
pub use transform::Transformer;
pub use validate::{Validator, ALLOWED_EXTENSIONS};
