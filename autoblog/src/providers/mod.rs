//! Completion providers.

mod completion;
#[cfg(feature = "http")]
mod openai;

pub use completion::{CompletionProvider, UnconfiguredProvider};
#[cfg(feature = "http")]
pub use openai::{OpenAiProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
