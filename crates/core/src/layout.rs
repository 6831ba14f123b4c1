//! Turning a customer request into a one-slide presentation.

use crate::error::Result;
use crate::media::Media;
use crate::types::{Emu, Frame, Picture, Presentation, PresentationFormat, TextBox};

/// Left edge of the name box, in inches.
pub const NAME_X_IN: f64 = 1.0;
/// Top edge of the name box, in inches.
pub const NAME_Y_IN: f64 = 1.0;
/// Width of the name box as a percentage of the slide width.
pub const NAME_WIDTH_PERCENT: f64 = 50.0;
/// Height of the name box, in inches.
pub const NAME_HEIGHT_IN: f64 = 1.0;
/// Font size of the customer name, in points.
pub const NAME_FONT_SIZE_PT: f64 = 24.0;

/// Image placement, in inches: x, y, width, height.
pub const IMAGE_FRAME_IN: (f64, f64, f64, f64) = (1.0, 2.0, 4.0, 3.0);

/// Title written into the generated document's properties.
pub const DOCUMENT_TITLE: &str = "Customer Presentation";

/// An uploaded file as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Client-side file name, when one was sent.
    pub filename: Option<String>,

    /// Declared content type, when one was sent.
    pub content_type: Option<String>,

    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            filename: None,
            content_type: None,
            data,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Everything needed to generate one customer deck.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The uploaded template. It is buffered and inspected, never copied
    /// into the output.
    pub template: Upload,

    /// Inserted verbatim as the slide's text.
    pub customer_name: String,

    pub image: Option<Upload>,
}

impl GenerationRequest {
    pub fn new(template: Upload, customer_name: impl Into<String>) -> Self {
        Self {
            template,
            customer_name: customer_name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Upload) -> Self {
        self.image = Some(image);
        self
    }

    /// Best guess at what kind of file the template is, for diagnostics.
    pub fn template_format(&self) -> Option<PresentationFormat> {
        PresentationFormat::from_magic(&self.template.data).or_else(|| {
            self.template
                .filename
                .as_deref()
                .and_then(|name| name.rsplit_once('.'))
                .and_then(|(_, ext)| PresentationFormat::from_extension(ext))
        })
    }

    /// Lay out the single output slide.
    ///
    /// The slide holds one text box with the customer name and, when an
    /// image was uploaded, one picture below it.
    pub fn build_presentation(self) -> Result<Presentation> {
        let mut presentation = Presentation::new(DOCUMENT_TITLE);
        let slide_width = presentation.size.width;

        let name_frame = Frame::new(
            Emu::from_inches(NAME_X_IN),
            Emu::from_inches(NAME_Y_IN),
            Emu::percent_of(slide_width, NAME_WIDTH_PERCENT),
            Emu::from_inches(NAME_HEIGHT_IN),
        );
        let name_box =
            TextBox::new(name_frame, self.customer_name).with_font_size(NAME_FONT_SIZE_PT);

        let picture = match self.image {
            Some(upload) => {
                let description = upload.filename.clone().unwrap_or_default();
                let media = Media::detect(upload.content_type.as_deref(), upload.data)?;
                let (x, y, w, h) = IMAGE_FRAME_IN;
                Some(Picture::new(Frame::from_inches(x, y, w, h), media).with_description(description))
            }
            None => None,
        };

        let slide = presentation.add_slide();
        slide.add_text_box(name_box);
        if let Some(picture) = picture {
            slide.add_picture(picture);
        }

        log::debug!(
            "Laid out slide with {} shape(s)",
            presentation.slides[0].shapes.len()
        );

        Ok(presentation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::media::ImageFormat;
    use crate::types::Shape;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn template() -> Upload {
        Upload::new(b"PK\x03\x04template".to_vec()).with_filename("template.pptx")
    }

    #[test]
    fn test_name_only_layout() {
        let pres = GenerationRequest::new(template(), "Acme Corp")
            .build_presentation()
            .unwrap();

        assert_eq!(pres.slides.len(), 1);
        let slide = &pres.slides[0];
        assert_eq!(slide.shapes.len(), 1);

        let text_box = slide.text_boxes().next().unwrap();
        assert_eq!(text_box.text, "Acme Corp");
        assert_eq!(text_box.font_size, Some(24.0));
        assert_eq!(
            text_box.frame,
            Frame::new(Emu(914_400), Emu(914_400), Emu(4_572_000), Emu(914_400))
        );
    }

    #[test]
    fn test_name_is_inserted_verbatim() {
        let pres = GenerationRequest::new(template(), "  {CUSTOMER} & <Sons>  ")
            .build_presentation()
            .unwrap();
        assert_eq!(pres.all_text(), vec!["  {CUSTOMER} & <Sons>  "]);
    }

    #[test]
    fn test_image_layout() {
        let image = Upload::new(PNG_BYTES.to_vec())
            .with_filename("logo.png")
            .with_content_type("image/png");
        let pres = GenerationRequest::new(template(), "Acme")
            .with_image(image)
            .build_presentation()
            .unwrap();

        let slide = &pres.slides[0];
        assert_eq!(slide.shapes.len(), 2);
        assert!(matches!(slide.shapes[0], Shape::TextBox(_)));

        let picture = slide.pictures().next().unwrap();
        assert_eq!(picture.media.format, ImageFormat::Png);
        assert_eq!(picture.description, "logo.png");
        assert_eq!(picture.frame, Frame::from_inches(1.0, 2.0, 4.0, 3.0));
    }

    #[test]
    fn test_unrecognised_image_fails() {
        let image = Upload::new(b"hello".to_vec()).with_content_type("text/plain");
        let result = GenerationRequest::new(template(), "Acme")
            .with_image(image)
            .build_presentation();
        assert!(matches!(result, Err(Error::UnsupportedImage(_))));
    }

    #[test]
    fn test_template_format_detection() {
        let request = GenerationRequest::new(template(), "Acme");
        assert_eq!(request.template_format(), Some(PresentationFormat::Pptx));

        let by_name = GenerationRequest::new(Upload::new(vec![1, 2]).with_filename("old.PPT"), "Acme");
        assert_eq!(by_name.template_format(), Some(PresentationFormat::Ppt));

        let unknown = GenerationRequest::new(Upload::new(vec![1, 2]), "Acme");
        assert_eq!(unknown.template_format(), None);
    }
}
