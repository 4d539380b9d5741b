//! `YouTube` Data API access: video id extraction and comment retrieval.

pub mod client;
pub mod error;
pub mod types;
pub mod video_id;

pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use video_id::extract_video_id;
