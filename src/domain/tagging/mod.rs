pub mod dto;
pub mod handler;
pub mod prompt;
pub mod service;
pub mod upload;
pub mod validator;
pub mod vocabulary;

pub use service::TaggingService;
pub use validator::{select_tags, TagSelection};
pub use vocabulary::{Tag, ALL_TAGS};
