//! Narrative text for the technical conclusion of a report
//!
//! The generator works without any network access. A [`CompletionClient`]
//! can be injected to have a chat-completion service write or reword text;
//! its failures are logged and replaced by the deterministic texts.

pub mod chat;
pub mod client;
pub mod generator;
pub mod prompts;

pub use chat::{ChatCompletionsClient, ChatCompletionsConfig};
pub use client::{CompletionClient, CompletionError, CompletionRequest};
pub use generator::{
    number_lines, suggest_image_captions, NarrativeGenerator, NarrativeMode, NarrativeOutcome,
};
pub use prompts::RewriteIntensity;
