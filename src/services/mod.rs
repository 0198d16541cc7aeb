// src/services/mod.rs
//
// Clients for external services used by the domain modules

pub mod gemini;

// Re-export commonly used types for convenience
pub use gemini::{GeminiConfig, GeminiService, GenerationError, TextGenerator};
