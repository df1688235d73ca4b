pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockCompletionClient;
pub use openai::OpenAiClient;
pub use traits::{ChatMessage, CompletionClient, CompletionRequest, CompletionResponse};
