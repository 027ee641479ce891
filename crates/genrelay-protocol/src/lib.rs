pub mod decode;
pub mod event;
pub mod ollama;
pub mod openai;
pub mod sanitize;

pub use decode::LineDecoder;
pub use event::{GenerationResult, StreamEvent, Usage};
pub use sanitize::strip_html_tags;
