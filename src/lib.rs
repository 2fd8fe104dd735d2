//! Image and video generation client for OpenRouter's chat-completions API
//!
//! Builds multimodal requests from user images, masks, and prompts, sends a
//! single request per call, and normalizes whatever response shape the model
//! returns into an image reference plus optional text.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
