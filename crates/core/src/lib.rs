//! Core presentation model, image detection, and slide layout
//! for customer deck generation.

pub mod error;
pub mod layout;
pub mod media;
pub mod types;

pub use error::{Error, Result};
pub use layout::{GenerationRequest, Upload};
pub use media::{ImageFormat, Media};
pub use types::{
    Emu, Frame, Picture, Presentation, PresentationFormat, Shape, Slide, SlideSize, TextBox,
};
