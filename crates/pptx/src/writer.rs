//! PPTX package writer.

use crate::parts::{self, content_type, rel_type};
use deckgen_core::{
    Error, Frame, ImageFormat, Picture, Presentation, Result, Shape, Slide, TextBox,
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// First id PowerPoint accepts in `p:sldIdLst`.
const FIRST_SLIDE_ID: usize = 256;

/// Writer for PPTX (Office Open XML) packages.
///
/// XML parts are deflated; media is stored as-is since image formats are
/// already compressed.
pub struct PptxWriter {
    compression: CompressionMethod,
}

impl PptxWriter {
    /// Create a writer that deflates XML parts.
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Serialize a presentation into an in-memory PPTX buffer.
    pub fn to_bytes(&self, presentation: &Presentation) -> Result<Vec<u8>> {
        let cursor = self.write(presentation, Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Serialize a presentation into any seekable sink, returning the sink.
    pub fn write<W: Write + Seek>(&self, presentation: &Presentation, sink: W) -> Result<W> {
        let mut zip = ZipWriter::new(sink);
        let media = MediaPlan::new(presentation);

        self.add_part(&mut zip, parts::CONTENT_TYPES, &content_types_xml(presentation, &media)?)?;
        self.add_part(&mut zip, parts::PACKAGE_RELS, &package_rels_xml()?)?;
        self.add_part(&mut zip, parts::CORE_PROPS, &core_props_xml(&presentation.title)?)?;
        self.add_part(&mut zip, parts::APP_PROPS, &app_props_xml(presentation.slides.len())?)?;
        self.add_part(&mut zip, parts::PRESENTATION_PART, &presentation_xml(presentation)?)?;
        self.add_part(&mut zip, parts::PRESENTATION_RELS, &presentation_rels_xml(presentation.slides.len())?)?;

        self.add_part(&mut zip, parts::SLIDE_MASTER, parts::SLIDE_MASTER_XML.as_bytes())?;
        self.add_part(&mut zip, parts::SLIDE_MASTER_RELS, &slide_master_rels_xml()?)?;
        self.add_part(&mut zip, parts::SLIDE_LAYOUT, parts::SLIDE_LAYOUT_XML.as_bytes())?;
        self.add_part(&mut zip, parts::SLIDE_LAYOUT_RELS, &slide_layout_rels_xml()?)?;
        self.add_part(&mut zip, parts::THEME, parts::THEME_XML.as_bytes())?;
        self.add_part(&mut zip, parts::PRES_PROPS, parts::PRES_PROPS_XML.as_bytes())?;
        self.add_part(&mut zip, parts::VIEW_PROPS, parts::VIEW_PROPS_XML.as_bytes())?;
        self.add_part(&mut zip, parts::TABLE_STYLES, parts::TABLE_STYLES_XML.as_bytes())?;

        for (idx, slide) in presentation.slides.iter().enumerate() {
            let number = idx + 1;
            let images = media.for_slide(idx);
            self.add_part(&mut zip, &parts::slide_part(number), &slide_xml(slide, images)?)?;
            self.add_part(&mut zip, &parts::slide_rels_part(number), &slide_rels_xml(images)?)?;
        }

        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
        for entry in media.entries() {
            zip.start_file(entry.part.as_str(), stored).map_err(zip_err)?;
            zip.write_all(&entry.picture.media.data)?;
        }

        log::debug!(
            "Wrote PPTX with {} slide(s) and {} media part(s)",
            presentation.slides.len(),
            media.len()
        );

        zip.finish().map_err(zip_err)
    }

    fn add_part<W: Write + Seek>(&self, zip: &mut ZipWriter<W>, name: &str, content: &[u8]) -> Result<()> {
        let options = FileOptions::default().compression_method(self.compression);
        zip.start_file(name, options).map_err(zip_err)?;
        zip.write_all(content)?;
        Ok(())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A picture together with the package names assigned to its media.
struct MediaEntry<'a> {
    picture: &'a Picture,
    part: String,
    rel_id: String,
}

/// Assigns every picture a media part name and a slide-local relationship id.
struct MediaPlan<'a> {
    per_slide: Vec<Vec<MediaEntry<'a>>>,
}

impl<'a> MediaPlan<'a> {
    fn new(presentation: &'a Presentation) -> Self {
        let mut counter = 0;
        let per_slide: Vec<Vec<MediaEntry<'a>>> = presentation
            .slides
            .iter()
            .map(|slide| {
                slide
                    .pictures()
                    .enumerate()
                    .map(|(idx, picture)| {
                        counter += 1;
                        MediaEntry {
                            picture,
                            part: parts::media_part(counter, picture.media.format.extension()),
                            // rId1 is the slide layout
                            rel_id: format!("rId{}", idx + 2),
                        }
                    })
                    .collect()
            })
            .collect();

        Self { per_slide }
    }

    fn for_slide(&self, idx: usize) -> &[MediaEntry<'a>] {
        &self.per_slide[idx]
    }

    fn entries(&self) -> impl Iterator<Item = &MediaEntry<'a>> {
        self.per_slide.iter().flatten()
    }

    fn len(&self) -> usize {
        self.per_slide.iter().map(Vec::len).sum()
    }

    /// Distinct formats in first-use order.
    fn formats(&self) -> Vec<ImageFormat> {
        let mut formats = Vec::new();
        for entry in self.entries() {
            if !formats.contains(&entry.picture.media.format) {
                formats.push(entry.picture.media.format);
            }
        }
        formats
    }
}

/// Thin event-level wrapper over `quick_xml::Writer`.
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;
        writer.get_mut().push(b'\n');
        Ok(Self { writer })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(tag)).map_err(xml_err)?;
        Ok(self)
    }

    fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)?;
        Ok(self)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(tag)).map_err(xml_err)?;
        Ok(self)
    }

    fn text(&mut self, text: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)?;
        Ok(self)
    }

    /// `<name>text</name>`
    fn leaf(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.start(name, &[])?.text(text)?.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Relationship entry: (id, type, target).
type Rel<'a> = (&'a str, &'a str, &'a str);

fn rels_xml(rels: &[Rel<'_>]) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start("Relationships", &[("xmlns", parts::NS_RELATIONSHIPS)])?;
    for &(id, kind, target) in rels {
        xml.empty("Relationship", &[("Id", id), ("Type", kind), ("Target", target)])?;
    }
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn content_types_xml(presentation: &Presentation, media: &MediaPlan<'_>) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start("Types", &[("xmlns", parts::NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", content_type::RELATIONSHIPS)],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", content_type::XML)])?;
    for format in media.formats() {
        xml.empty(
            "Default",
            &[("Extension", format.extension()), ("ContentType", format.mime_type())],
        )?;
    }

    let fixed = [
        (parts::PRESENTATION_PART, content_type::PRESENTATION),
        (parts::SLIDE_MASTER, content_type::SLIDE_MASTER),
        (parts::SLIDE_LAYOUT, content_type::SLIDE_LAYOUT),
        (parts::THEME, content_type::THEME),
        (parts::PRES_PROPS, content_type::PRES_PROPS),
        (parts::VIEW_PROPS, content_type::VIEW_PROPS),
        (parts::TABLE_STYLES, content_type::TABLE_STYLES),
        (parts::CORE_PROPS, content_type::CORE_PROPS),
        (parts::APP_PROPS, content_type::APP_PROPS),
    ];
    for (part, ct) in fixed {
        let name = format!("/{}", part);
        xml.empty("Override", &[("PartName", name.as_str()), ("ContentType", ct)])?;
    }
    for number in 1..=presentation.slides.len() {
        let name = format!("/{}", parts::slide_part(number));
        xml.empty(
            "Override",
            &[("PartName", name.as_str()), ("ContentType", content_type::SLIDE)],
        )?;
    }

    xml.end("Types")?;
    Ok(xml.finish())
}

fn package_rels_xml() -> Result<Vec<u8>> {
    rels_xml(&[
        ("rId1", rel_type::OFFICE_DOCUMENT, parts::PRESENTATION_PART),
        ("rId2", rel_type::CORE_PROPS, parts::CORE_PROPS),
        ("rId3", rel_type::APP_PROPS, parts::APP_PROPS),
    ])
}

fn core_props_xml(title: &str) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.leaf("dc:title", &xml_safe(title))?;
    xml.leaf("dc:creator", "deckgen")?;
    xml.leaf("cp:revision", "1")?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

fn app_props_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    xml.leaf("Application", "deckgen")?;
    xml.leaf("Slides", &slide_count.to_string())?;
    xml.end("Properties")?;
    Ok(xml.finish())
}

fn presentation_xml(presentation: &Presentation) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "p:presentation",
        &[
            ("xmlns:a", parts::NS_A),
            ("xmlns:r", parts::NS_R),
            ("xmlns:p", parts::NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    xml.start("p:sldMasterIdLst", &[])?
        .empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?
        .end("p:sldMasterIdLst")?;

    if !presentation.slides.is_empty() {
        xml.start("p:sldIdLst", &[])?;
        for idx in 0..presentation.slides.len() {
            let id = (FIRST_SLIDE_ID + idx).to_string();
            let rel_id = slide_rel_id(idx);
            xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel_id.as_str())])?;
        }
        xml.end("p:sldIdLst")?;
    }

    let cx = presentation.size.width.0.to_string();
    let cy = presentation.size.height.0.to_string();
    xml.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;
    xml.end("p:presentation")?;
    Ok(xml.finish())
}

/// Relationship id of the slide at `idx` in the presentation part; rId1 is the master.
fn slide_rel_id(idx: usize) -> String {
    format!("rId{}", idx + 2)
}

fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let slide_ids: Vec<String> = (0..slide_count).map(slide_rel_id).collect();
    let slide_targets: Vec<String> = (1..=slide_count)
        .map(|n| format!("slides/slide{}.xml", n))
        .collect();
    let tail_ids: Vec<String> = (0..4).map(|n| format!("rId{}", slide_count + 2 + n)).collect();

    let mut rels: Vec<Rel<'_>> = vec![("rId1", rel_type::SLIDE_MASTER, "slideMasters/slideMaster1.xml")];
    for (id, target) in slide_ids.iter().zip(&slide_targets) {
        rels.push((id.as_str(), rel_type::SLIDE, target.as_str()));
    }
    rels.push((tail_ids[0].as_str(), rel_type::PRES_PROPS, "presProps.xml"));
    rels.push((tail_ids[1].as_str(), rel_type::VIEW_PROPS, "viewProps.xml"));
    rels.push((tail_ids[2].as_str(), rel_type::THEME, "theme/theme1.xml"));
    rels.push((tail_ids[3].as_str(), rel_type::TABLE_STYLES, "tableStyles.xml"));
    rels_xml(&rels)
}

fn slide_master_rels_xml() -> Result<Vec<u8>> {
    rels_xml(&[
        ("rId1", rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        ("rId2", rel_type::THEME, "../theme/theme1.xml"),
    ])
}

fn slide_layout_rels_xml() -> Result<Vec<u8>> {
    rels_xml(&[("rId1", rel_type::SLIDE_MASTER, "../slideMasters/slideMaster1.xml")])
}

fn slide_rels_xml(images: &[MediaEntry<'_>]) -> Result<Vec<u8>> {
    let targets: Vec<String> = images
        .iter()
        .map(|e| format!("../media/{}", e.part.rsplit('/').next().unwrap_or_default()))
        .collect();

    let mut rels: Vec<Rel<'_>> = vec![("rId1", rel_type::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")];
    for (entry, target) in images.iter().zip(&targets) {
        rels.push((entry.rel_id.as_str(), rel_type::IMAGE, target.as_str()));
    }
    rels_xml(&rels)
}

fn slide_xml(slide: &Slide, images: &[MediaEntry<'_>]) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "p:sld",
        &[("xmlns:a", parts::NS_A), ("xmlns:r", parts::NS_R), ("xmlns:p", parts::NS_P)],
    )?;
    xml.start("p:cSld", &[])?.start("p:spTree", &[])?;

    xml.start("p:nvGrpSpPr", &[])?
        .empty("p:cNvPr", &[("id", "1"), ("name", "")])?
        .empty("p:cNvGrpSpPr", &[])?
        .empty("p:nvPr", &[])?
        .end("p:nvGrpSpPr")?;
    xml.start("p:grpSpPr", &[])?
        .start("a:xfrm", &[])?
        .empty("a:off", &[("x", "0"), ("y", "0")])?
        .empty("a:ext", &[("cx", "0"), ("cy", "0")])?
        .empty("a:chOff", &[("x", "0"), ("y", "0")])?
        .empty("a:chExt", &[("cx", "0"), ("cy", "0")])?
        .end("a:xfrm")?
        .end("p:grpSpPr")?;

    // Shape ids are unique per slide; 1 is the tree itself.
    let mut pictures = images.iter();
    for (idx, shape) in slide.shapes.iter().enumerate() {
        let shape_id = (idx + 2).to_string();
        match shape {
            Shape::TextBox(text_box) => {
                write_text_box(&mut xml, &shape_id, idx + 1, text_box)?;
            }
            Shape::Picture(picture) => {
                let entry = pictures.next().ok_or_else(|| {
                    Error::InvalidInput("picture without an assigned media part".to_string())
                })?;
                write_picture(&mut xml, &shape_id, idx + 1, picture, &entry.rel_id)?;
            }
        }
    }

    xml.end("p:spTree")?.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?
        .empty("a:masterClrMapping", &[])?
        .end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok(xml.finish())
}

fn write_xfrm(xml: &mut XmlPart, frame: &Frame) -> Result<()> {
    let x = frame.x.0.to_string();
    let y = frame.y.0.to_string();
    let cx = frame.width.0.to_string();
    let cy = frame.height.0.to_string();
    xml.start("a:xfrm", &[])?
        .empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?
        .empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?
        .end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?
        .empty("a:avLst", &[])?
        .end("a:prstGeom")?;
    Ok(())
}

fn write_text_box(xml: &mut XmlPart, shape_id: &str, ordinal: usize, text_box: &TextBox) -> Result<()> {
    let name = format!("Text {}", ordinal);
    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?
        .empty("p:cNvPr", &[("id", shape_id), ("name", name.as_str())])?
        .empty("p:cNvSpPr", &[("txBox", "1")])?
        .empty("p:nvPr", &[])?
        .end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?;
    write_xfrm(xml, &text_box.frame)?;
    xml.empty("a:noFill", &[])?.end("p:spPr")?;

    xml.start("p:txBody", &[])?
        .empty("a:bodyPr", &[("wrap", "square"), ("rtlCol", "0")])?
        .empty("a:lstStyle", &[])?;

    let size = text_box.font_size.map(|pt| ((pt * 100.0).round() as i64).to_string());
    let mut run_attrs: Vec<(&str, &str)> = vec![("lang", "en-US")];
    if let Some(size) = &size {
        run_attrs.push(("sz", size.as_str()));
    }
    run_attrs.push(("dirty", "0"));

    // A bare CR inside <a:t> would read back as a second line break.
    let text = xml_safe(&text_box.text.replace("\r\n", "\n").replace('\r', "\n"));
    for line in text.split('\n') {
        xml.start("a:p", &[])?;
        if !line.is_empty() {
            xml.start("a:r", &[])?
                .empty("a:rPr", &run_attrs)?
                .leaf("a:t", line)?
                .end("a:r")?;
        }
        xml.empty("a:endParaRPr", &run_attrs)?;
        xml.end("a:p")?;
    }

    xml.end("p:txBody")?.end("p:sp")?;
    Ok(())
}

fn write_picture(
    xml: &mut XmlPart,
    shape_id: &str,
    ordinal: usize,
    picture: &Picture,
    rel_id: &str,
) -> Result<()> {
    let name = format!("Picture {}", ordinal);
    let description = xml_safe(&picture.description);
    xml.start("p:pic", &[])?;
    xml.start("p:nvPicPr", &[])?
        .empty(
            "p:cNvPr",
            &[("id", shape_id), ("name", name.as_str()), ("descr", description.as_str())],
        )?
        .start("p:cNvPicPr", &[])?
        .empty("a:picLocks", &[("noChangeAspect", "1")])?
        .end("p:cNvPicPr")?
        .empty("p:nvPr", &[])?
        .end("p:nvPicPr")?;

    xml.start("p:blipFill", &[])?
        .empty("a:blip", &[("r:embed", rel_id)])?
        .start("a:stretch", &[])?
        .empty("a:fillRect", &[])?
        .end("a:stretch")?
        .end("p:blipFill")?;

    xml.start("p:spPr", &[])?;
    write_xfrm(xml, &picture.frame)?;
    xml.end("p:spPr")?;
    xml.end("p:pic")?;
    Ok(())
}

/// Drop characters XML 1.0 cannot represent at all.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| c >= ' ' || matches!(c, '\t' | '\n' | '\r'))
        .filter(|&c| c != '\u{fffe}' && c != '\u{ffff}')
        .collect()
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

fn zip_err(e: zip::result::ZipError) -> Error {
    Error::ZipError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_core::{Media, TextBox};
    use std::io::Read;
    use zip::ZipArchive;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

    fn sample(with_picture: bool) -> Presentation {
        let mut pres = Presentation::new("Test deck");
        let slide = pres.add_slide();
        slide.add_text_box(
            TextBox::new(Frame::from_inches(1.0, 1.0, 5.0, 1.0), "Acme & Sons").with_font_size(24.0),
        );
        if with_picture {
            slide.add_picture(Picture::new(
                Frame::from_inches(1.0, 2.0, 4.0, 3.0),
                Media::new(ImageFormat::Png, PNG_BYTES.to_vec()),
            ));
        }
        pres
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = PptxWriter::new().to_bytes(&sample(false)).unwrap();
        let archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for part in [
            parts::CONTENT_TYPES,
            parts::PACKAGE_RELS,
            parts::PRESENTATION_PART,
            parts::PRESENTATION_RELS,
            parts::SLIDE_MASTER,
            parts::SLIDE_LAYOUT,
            parts::THEME,
            "ppt/slides/slide1.xml",
            "ppt/slides/_rels/slide1.xml.rels",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
        assert!(!names.iter().any(|n| n.starts_with("ppt/media/")));
    }

    #[test]
    fn test_slide_text_is_escaped_and_sized() {
        let bytes = PptxWriter::new().to_bytes(&sample(false)).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");

        assert!(slide.contains("<a:t>Acme &amp; Sons</a:t>"));
        assert!(slide.contains(r#"sz="2400""#));
        assert!(slide.contains(r#"<a:off x="914400" y="914400"/>"#));
        assert!(slide.contains(r#"txBox="1""#));
    }

    #[test]
    fn test_picture_is_embedded() {
        let bytes = PptxWriter::new().to_bytes(&sample(true)).unwrap();

        let types = read_part(&bytes, parts::CONTENT_TYPES);
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));

        let rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains(r#"Target="../media/image1.png""#));

        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"<a:blip r:embed="rId2"/>"#));

        let mut archive = ZipArchive::new(Cursor::new(&bytes)).unwrap();
        let mut media = Vec::new();
        archive
            .by_name("ppt/media/image1.png")
            .unwrap()
            .read_to_end(&mut media)
            .unwrap();
        assert_eq!(media, PNG_BYTES);
    }

    #[test]
    fn test_presentation_lists_slides_and_size() {
        let mut pres = sample(false);
        pres.add_slide();
        let bytes = PptxWriter::new().to_bytes(&pres).unwrap();

        let xml = read_part(&bytes, parts::PRESENTATION_PART);
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));

        let rels = read_part(&bytes, parts::PRESENTATION_RELS);
        assert!(rels.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml""#));
        assert!(rels.contains(r#"Target="theme/theme1.xml""#));
    }

    #[test]
    fn test_multiline_text_becomes_paragraphs() {
        let mut pres = Presentation::new("Lines");
        pres.add_slide()
            .add_text_box(TextBox::new(Frame::default(), "first\nsecond"));
        let bytes = PptxWriter::new().to_bytes(&pres).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert_eq!(slide.matches("<a:p>").count(), 2);
        assert!(!slide.contains("sz="));
    }

    #[test]
    fn test_carriage_returns_end_paragraphs() {
        let mut pres = Presentation::new("Lines");
        pres.add_slide()
            .add_text_box(TextBox::new(Frame::default(), "Acme\r\nCorp\rLtd"));
        let bytes = PptxWriter::new().to_bytes(&pres).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert_eq!(slide.matches("<a:p>").count(), 3);
        assert!(slide.contains("<a:t>Acme</a:t>"));
        assert!(slide.contains("<a:t>Corp</a:t>"));
        assert!(!slide.contains('\r'));
    }

    #[test]
    fn test_xml_safe_strips_control_characters() {
        assert_eq!(xml_safe("a\u{1}b\tc\n"), "ab\tc\n");
        assert_eq!(xml_safe("Zoë"), "Zoë");
    }
}
