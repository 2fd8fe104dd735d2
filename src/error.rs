//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! The `Display` output of every variant is the message shown to the user.

use thiserror::Error;

pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests right now. Please wait a minute before trying again.";

pub const SERVER_ERROR_MESSAGE: &str =
    "The image service had a temporary problem. Please try again in a moment.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response whose body carried no recognized error code.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    #[error("{}", SERVER_ERROR_MESSAGE)]
    ServerUnavailable,

    /// The call succeeded but the model answered with text only.
    #[error("The model responded: {0}")]
    ModelResponded(String),

    #[error("The request was blocked by the model's safety filter. Try a different image or prompt. Raw response: {raw}")]
    SafetyBlocked { raw: String },

    #[error("The model did not return an image and may have declined the request. Try rephrasing your prompt. Raw response: {raw}")]
    NoImage { raw: String },

    #[error("No video URL found in the model response")]
    NoVideo,

    #[error("Unexpected response from the image service: {0}")]
    UnexpectedResponse(String),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, Error>;
