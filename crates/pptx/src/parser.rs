//! PPTX file parser implementation.

use crate::parts::{self, local_name};
use deckgen_core::{
    Emu, Error, Frame, ImageFormat, Media, Picture, Presentation, Result, Slide, SlideSize, TextBox,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Presentation> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new(filename);

        let xml = self.read_file_from_archive(&mut archive, parts::PRESENTATION_PART)?;
        let (size, slide_rel_ids) = parse_presentation_part(&xml)?;
        presentation.size = size;

        let rels = self.read_relationships(&mut archive, parts::PRESENTATION_PART)?;

        for rel_id in slide_rel_ids {
            let target = rels.get(&rel_id).ok_or_else(|| {
                Error::CorruptedFile(format!("slide relationship '{}' has no target", rel_id))
            })?;
            let slide_path = parts::resolve_target(parts::part_dir(parts::PRESENTATION_PART), target);
            let slide = self.parse_slide(&mut archive, &slide_path)?;
            presentation.push_slide(slide);
        }

        log::debug!("Parsed {} slide(s) from {}", presentation.slides.len(), filename);

        Ok(presentation)
    }

    /// Parse a single slide, loading the media its pictures embed.
    fn parse_slide<R: Read + Seek>(&self, archive: &mut ZipArchive<R>, slide_path: &str) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let shapes = extract_shapes_from_xml(&content)?;

        let rels = if shapes.iter().any(|s| s.embed.is_some()) {
            self.read_relationships(archive, slide_path)?
        } else {
            HashMap::new()
        };

        let mut slide = Slide::default();
        for shape in shapes {
            match shape.kind {
                ShapeKind::Text => {
                    let mut text_box = TextBox::new(shape.frame, shape.text);
                    text_box.font_size = shape.font_size;
                    slide.add_text_box(text_box);
                }
                ShapeKind::Picture => {
                    let embed = shape.embed.unwrap_or_default();
                    let Some(target) = rels.get(&embed) else {
                        log::warn!("Picture in {} references unknown relationship '{}'", slide_path, embed);
                        continue;
                    };
                    let media_path = parts::resolve_target(parts::part_dir(slide_path), target);
                    let media = self.read_media(archive, &media_path)?;
                    slide.add_picture(Picture::new(shape.frame, media).with_description(shape.description));
                }
                ShapeKind::Other => {}
            }
        }

        Ok(slide)
    }

    /// Read a media part, deriving its format from contents or extension.
    fn read_media<R: Read + Seek>(&self, archive: &mut ZipArchive<R>, path: &str) -> Result<Media> {
        let data = self.read_bytes_from_archive(archive, path)?;
        let format = ImageFormat::from_magic(&data)
            .or_else(|| {
                path.rsplit_once('.')
                    .and_then(|(_, ext)| ImageFormat::from_extension(ext))
            })
            .ok_or_else(|| Error::UnsupportedImage(format!("unrecognized media part '{}'", path)))?;
        Ok(Media::new(format, data))
    }

    /// Map relationship ids to targets for the given source part.
    fn read_relationships<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        part: &str,
    ) -> Result<HashMap<String, String>> {
        let content = self.read_file_from_archive(archive, &parts::rels_part_for(part))?;
        parse_relationships(&content)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }

    fn read_bytes_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<Vec<u8>> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(data)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Slide size and slide relationship ids, in presentation order.
fn parse_presentation_part(xml: &str) -> Result<(SlideSize, Vec<String>)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut size = SlideSize::default();
    let mut slide_ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sldSz" => {
                    size.width = attr_emu(e, b"cx").unwrap_or(size.width);
                    size.height = attr_emu(e, b"cy").unwrap_or(size.height);
                }
                b"sldId" => {
                    if let Some(id) = attr_string(e, b"id", true) {
                        slide_ids.push(id);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::PptxParseError(format!("Error parsing presentation: {}", e)));
            }
            _ => {}
        }
    }

    Ok((size, slide_ids))
}

/// Relationship id to target map from a `.rels` part.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut rels = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"Relationship" => {
                let id = attr_string(e, b"Id", false);
                let target = attr_string(e, b"Target", false);
                if let (Some(id), Some(target)) = (id, target) {
                    rels.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::PptxParseError(format!("Error parsing relationships: {}", e)));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Extract text boxes and pictures with their frames from slide XML.
fn extract_shapes_from_xml(xml_content: &str) -> Result<Vec<ShapeInfo>> {
    let mut shapes = Vec::new();
    // Whitespace inside runs is significant.
    let mut reader = Reader::from_str(xml_content);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut paragraphs = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::PptxParseError(format!("Error parsing slide: {}", e)))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                let name = e.name();
                let local = local_name(name.as_ref());

                if matches!(local, b"sp" | b"pic") && is_start {
                    current_shape = Some(ShapeInfo::new(if local == b"sp" {
                        ShapeKind::Other
                    } else {
                        ShapeKind::Picture
                    }));
                    paragraphs = 0;
                    continue;
                }

                let Some(shape) = current_shape.as_mut() else {
                    continue;
                };

                match local {
                    b"cNvPr" => {
                        shape.description = attr_string(e, b"descr", false).unwrap_or_default();
                    }
                    b"off" => {
                        shape.frame.x = attr_emu(e, b"x").unwrap_or_default();
                        shape.frame.y = attr_emu(e, b"y").unwrap_or_default();
                    }
                    b"ext" => {
                        if let (Some(cx), Some(cy)) = (attr_emu(e, b"cx"), attr_emu(e, b"cy")) {
                            shape.frame.width = cx;
                            shape.frame.height = cy;
                        }
                    }
                    b"txBody" if shape.kind == ShapeKind::Other => {
                        shape.kind = ShapeKind::Text;
                    }
                    b"p" if shape.kind == ShapeKind::Text => {
                        if paragraphs > 0 {
                            shape.text.push('\n');
                        }
                        paragraphs += 1;
                    }
                    b"rPr" | b"endParaRPr" if shape.font_size.is_none() => {
                        shape.font_size = attr_string(e, b"sz", false)
                            .and_then(|v| v.parse::<f64>().ok())
                            .map(|hundredths| hundredths / 100.0);
                    }
                    b"t" if is_start => in_text = true,
                    b"blip" => shape.embed = attr_string(e, b"embed", true),
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if in_text {
                    if let Some(shape) = current_shape.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::PptxParseError(format!("Bad text in slide: {}", e)))?;
                        shape.text.push_str(&text);
                    }
                }
            }
            Event::End(ref e) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    if let Some(shape) = current_shape.take() {
                        shapes.push(shape);
                    }
                    in_text = false;
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}

/// Attribute value by local name, unescaped. When `namespaced` is set the
/// attribute must carry a prefix (e.g. `r:embed` rather than `embed`).
fn attr_string(e: &BytesStart<'_>, name: &[u8], namespaced: bool) -> Option<String> {
    e.attributes().flatten().find_map(|attr| {
        let key = attr.key.as_ref();
        let has_prefix = key.contains(&b':');
        if local_name(key) == name && has_prefix == namespaced {
            attr.unescape_value().ok().map(|v| v.into_owned())
        } else {
            None
        }
    })
}

fn attr_emu(e: &BytesStart<'_>, name: &[u8]) -> Option<Emu> {
    attr_string(e, name, false)
        .and_then(|v| v.parse::<i64>().ok())
        .map(Emu)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeKind {
    /// A shape with a text body.
    Text,
    Picture,
    /// A shape without text (connector, decoration); skipped.
    Other,
}

/// Information about a shape extracted from XML.
#[derive(Debug)]
struct ShapeInfo {
    kind: ShapeKind,
    frame: Frame,
    text: String,
    font_size: Option<f64>,
    description: String,
    embed: Option<String>,
}

impl ShapeInfo {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            frame: Frame::default(),
            text: String::new(),
            font_size: None,
            description: String::new(),
            embed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::PptxWriter;
    use deckgen_core::Shape;
    use std::io::Cursor;

    const SLIDE_XML: &str = r#"<?xml version="1.0"?>
<p:sld xmlns:a="a" xmlns:r="r" xmlns:p="p"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="100" y="200"/><a:ext cx="300" cy="400"/></a:xfrm></p:spPr>
<p:txBody><a:bodyPr/><a:p><a:r><a:rPr sz="1800"/><a:t>Hello &amp; </a:t></a:r><a:r><a:t>world</a:t></a:r></a:p><a:p/><a:p><a:r><a:t>again</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:spPr><a:xfrm><a:off x="1" y="1"/><a:ext cx="1" cy="1"/></a:xfrm></p:spPr></p:sp>
<p:pic><p:nvPicPr><p:cNvPr id="3" name="Pic" descr="logo"/></p:nvPicPr><p:blipFill><a:blip r:embed="rId5"/></p:blipFill>
<p:spPr><a:xfrm><a:off x="10" y="20"/><a:ext cx="30" cy="40"/></a:xfrm></p:spPr></p:pic>
</p:spTree></p:cSld></p:sld>"#;

    #[test]
    fn test_extract_shapes() {
        let shapes = extract_shapes_from_xml(SLIDE_XML).unwrap();
        assert_eq!(shapes.len(), 3);

        let text = &shapes[0];
        assert_eq!(text.kind, ShapeKind::Text);
        assert_eq!(text.text, "Hello & world\n\nagain");
        assert_eq!(text.font_size, Some(18.0));
        assert_eq!(text.frame, Frame::new(Emu(100), Emu(200), Emu(300), Emu(400)));

        assert_eq!(shapes[1].kind, ShapeKind::Other);

        let pic = &shapes[2];
        assert_eq!(pic.kind, ShapeKind::Picture);
        assert_eq!(pic.embed.as_deref(), Some("rId5"));
        assert_eq!(pic.description, "logo");
        assert_eq!(pic.frame.width, Emu(30));
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<Relationships xmlns="x"><Relationship Id="rId1" Type="t" Target="slides/slide1.xml"/><Relationship Id="rId2" Type="t" Target="../media/image1.png"/></Relationships>"#;
        let rels = parse_relationships(xml).unwrap();
        assert_eq!(rels.get("rId1").map(String::as_str), Some("slides/slide1.xml"));
        assert_eq!(rels.get("rId2").map(String::as_str), Some("../media/image1.png"));
    }

    #[test]
    fn test_parse_presentation_part_keeps_list_order() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst><p:sldId id="257" r:id="rId7"/><p:sldId id="256" r:id="rId3"/></p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#;
        let (size, ids) = parse_presentation_part(xml).unwrap();
        assert_eq!(ids, vec!["rId7".to_string(), "rId3".to_string()]);
        assert_eq!(size.width, Emu(12_192_000));
        assert_eq!(size.height, Emu(6_858_000));
    }

    #[test]
    fn test_reads_back_written_package() {
        let mut pres = Presentation::new("Round");
        pres.add_slide()
            .add_text_box(TextBox::new(Frame::from_inches(1.0, 1.0, 5.0, 1.0), " Acme <Ltd> ").with_font_size(24.0))
            .add_picture(
                Picture::new(
                    Frame::from_inches(1.0, 2.0, 4.0, 3.0),
                    Media::new(ImageFormat::Gif, b"GIF89a\x01\x00\x01\x00".to_vec()),
                )
                .with_description("badge.gif"),
            );
        let bytes = PptxWriter::new().to_bytes(&pres).unwrap();

        let parsed = PptxParser::new().parse(Cursor::new(bytes), "round.pptx").unwrap();
        assert_eq!(parsed.title, "round.pptx");
        assert_eq!(parsed.slides.len(), 1);

        let slide = &parsed.slides[0];
        assert_eq!(slide.number, 1);
        assert!(matches!(slide.shapes[0], Shape::TextBox(_)));
        assert_eq!(parsed.all_text(), vec![" Acme <Ltd> "]);

        let picture = slide.pictures().next().unwrap();
        assert_eq!(picture.media.format, ImageFormat::Gif);
        assert_eq!(picture.description, "badge.gif");
        assert_eq!(picture.frame, Frame::from_inches(1.0, 2.0, 4.0, 3.0));
    }

    #[test]
    fn test_malformed_slide_xml_is_parse_error() {
        let xml = r#"<p:sld xmlns:p="p"><p:cSld><p:spTree></p:cSld></p:sld>"#;
        assert!(matches!(extract_shapes_from_xml(xml), Err(Error::PptxParseError(_))));
    }

    #[test]
    fn test_malformed_presentation_is_parse_error() {
        let xml = r#"<p:presentation xmlns:p="p"><p:sldIdLst></p:presentation>"#;
        assert!(matches!(parse_presentation_part(xml), Err(Error::PptxParseError(_))));
    }

    #[test]
    fn test_rejects_non_zip() {
        let result = PptxParser::new().parse(Cursor::new(b"not a zip".to_vec()), "x.pptx");
        assert!(matches!(result, Err(Error::ZipError(_))));
    }
}
