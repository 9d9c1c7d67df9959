// Public modules
pub mod chat_completion;
pub mod chat_completion_params;
pub mod content_part;
pub mod encoded_image;
pub mod message_param;
pub mod mode;
pub mod model;
pub mod usage;

// Re-exports
pub use chat_completion::{ChatCompletion, Choice, ChoiceMessage, Reply};
pub use chat_completion_params::ChatCompletionParams;
pub use content_part::ContentPart;
pub use encoded_image::{DATA_URL_PREFIX, EncodedImage};
pub use message_param::{MessageParam, MessageParamContent, MessageRole};
pub use mode::Mode;
pub use model::Model;
pub use usage::Usage;
