//! AI layer: risk classification over a pluggable text-generation backend.

mod error;
pub use error::AiError;

pub mod classifier;
pub mod generator;
pub mod prompt;

pub use classifier::{RiskClassifier, parse_verdict};
pub use generator::{GenerateRequest, GenerateResponse, TextGenerator};

#[cfg(feature = "http")]
pub mod chat;
#[cfg(feature = "http")]
pub use chat::ChatClient;
