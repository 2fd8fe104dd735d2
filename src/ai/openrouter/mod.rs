pub mod client;
pub mod extract;
pub mod image;
pub mod payload;
pub mod types;
pub mod video;

pub use client::OpenRouterHttpClient;
pub use image::OpenRouterImageClient;
pub use video::OpenRouterVideoClient;
