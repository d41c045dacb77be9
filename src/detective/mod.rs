//! The AI detective: a free-text query answered by a language model.
//!
//! The model is an external collaborator. Its failures are turned into a
//! user-visible outcome here and never reach the generated dataset.

pub mod client;
pub mod consult;

pub use client::{DetectiveConfig, OllamaDetective, TextGenerator};
pub use consult::consult;
