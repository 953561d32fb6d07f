//! Feature Module - training schema and transaction encoding

pub mod schema;
pub mod encoder;

// Re-export common types
pub use schema::{SchemaError, TrainingSchema};
pub use encoder::{encode, encode_batch, FeatureVector};
