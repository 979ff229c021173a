pub mod client;
pub mod registry;

pub use client::{OpenAiGenerator, SharedGenerator, TextGenerator};
pub use registry::{ModelLoader, ModelRegistry, OpenAiLoader, StaticLoader};
