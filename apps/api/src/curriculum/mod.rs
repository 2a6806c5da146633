// Curriculum generation and response normalization.
// Model calls go through llm_client::TextGenerator; everything after the call
// (extractor, normalizer, summary) is pure and synchronous.

pub mod bloom;
pub mod coerce;
pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod repair;
pub mod summary;
