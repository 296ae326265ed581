//! psforge: deterministic prompt compiler and Gemini client for PowerShell
//! script generation.
//!
//! The heart of the crate is [`compiler::compile`], a pure function turning a
//! [`GenerationConfig`] into the instruction string sent to the model. The
//! rest is the collaborator plumbing around it: a Gemini `generateContent`
//! client and the machinery that writes the returned code to a `.ps1` file.

pub mod client;
pub mod compiler;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod script;
pub mod types;

// Re-export main types for convenience
pub use client::ModelClient;
pub use compiler::compile;
pub use config::{ClientConfig, GenerationConfig};
pub use error::{GenError, GenResult};
pub use models::{GenerateRequest, GenerateResponse};
pub use providers::{GeminiProvider, Provider};
pub use script::ScriptFile;
pub use types::{ModelId, RequestId};

/// Initialize the logging system
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
