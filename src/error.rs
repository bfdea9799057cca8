use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Image is empty")]
    EmptyImage,

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Event loop, window or softbuffer surface could not be created.
    #[error("Window system error: {0}")]
    Window(String),

    /// A draw, upload or present call failed mid-loop.
    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
