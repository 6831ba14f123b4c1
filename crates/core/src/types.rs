//! Domain types for describing a generated presentation.

use crate::media::Media;
use serde::{Deserialize, Serialize};

/// English Metric Units, the coordinate system used by OOXML drawings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Emu(pub i64);

impl Emu {
    /// EMUs in one inch.
    pub const PER_INCH: i64 = 914_400;

    /// Convert a length in inches, rounding to the nearest EMU.
    pub fn from_inches(inches: f64) -> Self {
        Self((inches * Self::PER_INCH as f64).round() as i64)
    }

    /// A percentage of another length, rounding to the nearest EMU.
    pub fn percent_of(total: Emu, percent: f64) -> Self {
        Self((total.0 as f64 * percent / 100.0).round() as i64)
    }

    /// This length in inches.
    pub fn as_inches(self) -> f64 {
        self.0 as f64 / Self::PER_INCH as f64
    }
}

/// Position and size of a shape on a slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub x: Emu,
    pub y: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Frame {
    pub fn new(x: Emu, y: Emu, width: Emu, height: Emu) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a frame from inch measurements.
    pub fn from_inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            Emu::from_inches(x),
            Emu::from_inches(y),
            Emu::from_inches(width),
            Emu::from_inches(height),
        )
    }
}

/// Dimensions of every slide in a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSize {
    pub width: Emu,
    pub height: Emu,
}

impl SlideSize {
    /// The 16:9 layout, 10in x 5.625in.
    pub const WIDESCREEN: SlideSize = SlideSize {
        width: Emu(9_144_000),
        height: Emu(5_143_500),
    };
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}

/// A whole presentation: slide size plus slides in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Document title written into the package properties.
    pub title: String,

    /// Size shared by all slides.
    pub size: SlideSize,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create an empty widescreen presentation with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            size: SlideSize::WIDESCREEN,
            slides: Vec::new(),
        }
    }

    /// Append a new empty slide and return it for population.
    pub fn add_slide(&mut self) -> &mut Slide {
        let number = self.slides.len() + 1;
        self.slides.push(Slide::new(number));
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    /// Push an already built slide, renumbering it to its position.
    pub fn push_slide(&mut self, mut slide: Slide) {
        slide.number = self.slides.len() + 1;
        self.slides.push(slide);
    }

    /// Every picture across all slides, in slide order.
    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.slides.iter().flat_map(|s| s.pictures())
    }

    /// Get all text box contents from all slides, flattened.
    pub fn all_text(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|s| s.text_boxes().map(|t| t.text.as_str()))
            .collect()
    }
}

/// A single slide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Shapes in z-order (first is drawn first).
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a text box to this slide.
    pub fn add_text_box(&mut self, text_box: TextBox) -> &mut Self {
        self.shapes.push(Shape::TextBox(text_box));
        self
    }

    /// Add a picture to this slide.
    pub fn add_picture(&mut self, picture: Picture) -> &mut Self {
        self.shapes.push(Shape::Picture(picture));
        self
    }

    pub fn text_boxes(&self) -> impl Iterator<Item = &TextBox> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::TextBox(t) => Some(t),
            Shape::Picture(_) => None,
        })
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Picture(p) => Some(p),
            Shape::TextBox(_) => None,
        })
    }
}

/// A drawable element on a slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    TextBox(TextBox),
    Picture(Picture),
}

impl Shape {
    pub fn frame(&self) -> Frame {
        match self {
            Shape::TextBox(t) => t.frame,
            Shape::Picture(p) => p.frame,
        }
    }

    /// Short label for the kind of shape.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::TextBox(_) => "text box",
            Shape::Picture(_) => "picture",
        }
    }
}

/// A positioned block of literal text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub frame: Frame,

    /// Text exactly as it should appear. Newlines start new paragraphs.
    pub text: String,

    /// Font size in points. None inherits the layout default.
    pub font_size: Option<f64>,
}

impl TextBox {
    pub fn new(frame: Frame, text: impl Into<String>) -> Self {
        Self {
            frame,
            text: text.into(),
            font_size: None,
        }
    }

    pub fn with_font_size(mut self, points: f64) -> Self {
        self.font_size = Some(points);
        self
    }
}

/// A positioned embedded image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub frame: Frame,

    /// Alternative text stored with the picture.
    pub description: String,

    pub media: Media,
}

impl Picture {
    pub fn new(frame: Frame, media: Media) -> Self {
        Self {
            frame,
            description: String::new(),
            media,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The container format of an uploaded presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary).
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::Ppt);
        }

        None
    }
}
