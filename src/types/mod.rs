// Public modules
pub mod completion;
pub mod completion_choice;
pub mod completion_params;
pub mod completion_template;
pub mod model;
pub mod usage;

// Re-exports
pub use completion::Completion;
pub use completion_choice::CompletionChoice;
pub use completion_params::CompletionParams;
pub use completion_template::CompletionTemplate;
pub use model::{KnownModel, Model};
pub use usage::Usage;
