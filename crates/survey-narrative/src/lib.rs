//! # survey-narrative
//!
//! Editable free-text narratives keyed by (file, analysis type, item), and
//! their generation through an external text-completion service.

pub mod completion;
pub mod generator;
pub mod prompts;
pub mod store;
pub mod summary;

pub use completion::{ChatClientConfig, ChatCompletionClient, CompletionRequest, TextCompletion};
pub use generator::NarrativeGenerator;
pub use store::{Narrative, NarrativeStore};
pub use summary::summarize_category_scores;
