//! Generated trade-area analysis through an OpenAI-compatible
//! chat-completions API.
//!
//! The model is asked for a strict JSON object holding the rankings and the
//! six narrative sections; the reply is parsed into
//! [`tradearea_core::LocationAnalysis`].

pub mod client;
pub mod error;
mod prompt;
mod types;

pub use client::AnalyzerClient;
pub use error::AnalyzerError;
