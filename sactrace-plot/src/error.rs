//! Errors in rendering.
use std::path::PathBuf;
use thiserror::Error;

/// Errors in rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The drawing backend failed.
    #[error("Drawing error: {0}")]
    Drawing(String),

    /// Encoding the animation failed.
    #[error("GIF encoding error: {0}")]
    GifEncoding(String),

    /// A line style could not be parsed.
    #[error("Invalid line style: {0}")]
    InvalidLineStyle(String),

    /// A color could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// There is nothing to draw.
    #[error("No panel to draw for {0:?}")]
    NothingToDraw(PathBuf),

    /// No frame lies in the requested part of the run.
    #[error("No frame to animate between lines {start} and {end}")]
    NoFrames {
        /// First line.
        start: usize,
        /// Line after the last one.
        end: usize,
    },

    /// The figure does not fit the size limits of the output format.
    #[error("Figure of {width}x{height} pixels is too large")]
    FigureTooLarge {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

/// Maps an error of the drawing backend.
pub(crate) fn drawing<E: std::fmt::Debug>(e: E) -> RenderError {
    RenderError::Drawing(format!("{:?}", e))
}
