//! OpenAI Image Generation
//!
//! Images API implementation of [`crate::dispatch::ImageGenerator`].

mod images;

pub use images::OpenAiImageClient;
