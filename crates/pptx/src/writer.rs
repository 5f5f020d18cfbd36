//! PPTX file writer implementation.

use deck_core::{Deck, Error, Result, SlideRecord};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::template::*;

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Converts inches to EMUs.
fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_attr(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// Placement and text styling of one text box.
#[derive(Debug, Clone, Copy)]
struct TextBox {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
    /// Font size in hundredths of a point.
    size: u32,
    bold: bool,
    color: &'static str,
    align: Align,
    /// Line spacing in thousandths of a percent.
    line_spacing: Option<u32>,
}

fn title_box() -> TextBox {
    TextBox {
        x: inches(0.5),
        y: inches(0.1),
        cx: inches(9.0),
        cy: inches(1.0),
        size: 2800,
        bold: true,
        color: "2E2E2E",
        align: Align::Center,
        line_spacing: None,
    }
}

fn body_box() -> TextBox {
    TextBox {
        x: inches(0.7),
        y: inches(1.5),
        cx: inches(8.6),
        cy: inches(4.5),
        size: 1600,
        bold: false,
        color: "3C3C3C",
        align: Align::Left,
        line_spacing: Some(120_000),
    }
}

fn number_box() -> TextBox {
    TextBox {
        x: inches(8.0),
        y: inches(6.8),
        cx: inches(1.5),
        cy: inches(0.4),
        size: 1000,
        bold: false,
        color: "888888",
        align: Align::Right,
        line_spacing: None,
    }
}

/// Writer for PPTX (Office Open XML) files.
///
/// Each slide gets a centred title, a body with one paragraph per body line,
/// and an optional `Slide N` footer on an off-white background.
#[derive(Debug, Clone)]
pub struct PptxWriter {
    /// Slide width in EMUs.
    slide_width: i64,
    /// Slide height in EMUs.
    slide_height: i64,
    /// Background colour as RGB hex.
    background: String,
    /// Whether to add a `Slide N` footer.
    slide_numbers: bool,
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self {
            slide_width: inches(10.0),
            slide_height: inches(7.5),
            background: "F7F6F3".to_string(),
            slide_numbers: true,
        }
    }
}

impl PptxWriter {
    /// Create a new writer with a 10" x 7.5" slide size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background colour (six hex digits, with or without `#`).
    pub fn with_background(mut self, hex: &str) -> Self {
        self.background = hex.trim_start_matches('#').to_ascii_uppercase();
        self
    }

    /// Set whether each slide gets a `Slide N` footer.
    pub fn with_slide_numbers(mut self, enabled: bool) -> Self {
        self.slide_numbers = enabled;
        self
    }

    /// Write a deck as a PPTX package into `writer`.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let count = deck.slides.len();

        let mut put = |path: &str, content: &str| -> Result<()> {
            zip.start_file(path, options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", path, e)))?;
            zip.write_all(content.as_bytes())
                .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", path, e)))
        };

        put("[Content_Types].xml", &self.content_types_xml(count)?)?;
        put("_rels/.rels", &root_rels_xml())?;
        put("ppt/presentation.xml", &self.presentation_xml(count)?)?;
        put("ppt/_rels/presentation.xml.rels", &presentation_rels_xml(count)?)?;
        put("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML)?;
        put("ppt/slideMasters/_rels/slideMaster1.xml.rels", SLIDE_MASTER_RELS_XML)?;
        put("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML)?;
        put("ppt/slideLayouts/_rels/slideLayout1.xml.rels", SLIDE_LAYOUT_RELS_XML)?;
        put("ppt/theme/theme1.xml", THEME_XML)?;

        for (idx, slide) in deck.slides.iter().enumerate() {
            let number = idx + 1;
            put(
                &format!("ppt/slides/slide{}.xml", number),
                &self.slide_xml(slide, number)?,
            )?;
            put(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                SLIDE_RELS_XML,
            )?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::debug!("Wrote PPTX for deck {} with {} slides", deck.id(), count);
        Ok(())
    }

    /// Write a deck as a PPTX package into memory.
    pub fn to_bytes(&self, deck: &Deck) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(deck, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    fn content_types_xml(&self, count: usize) -> Result<String> {
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

        let overrides = [
            ("/ppt/presentation.xml", CT_PRESENTATION),
            ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
            ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
            ("/ppt/theme/theme1.xml", CT_THEME),
        ];
        for (part, content_type) in overrides {
            write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            )
            .map_err(xml_error)?;
        }
        for number in 1..=count {
            write!(
                xml,
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}"/>"#,
                number, CT_SLIDE
            )
            .map_err(xml_error)?;
        }

        xml.push_str("</Types>");
        Ok(xml)
    }

    fn presentation_xml(&self, count: usize) -> Result<String> {
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECLARATION);
        write!(
            xml,
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            NS_A, NS_R, NS_P
        )
        .map_err(xml_error)?;

        xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

        if count > 0 {
            xml.push_str("<p:sldIdLst>");
            for idx in 0..count {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    256 + idx,
                    slide_rel_id(idx)
                )
                .map_err(xml_error)?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
            self.slide_width, self.slide_height
        )
        .map_err(xml_error)?;

        xml.push_str("</p:presentation>");
        Ok(xml)
    }

    fn slide_xml(&self, slide: &SlideRecord, number: usize) -> Result<String> {
        let mut xml = String::with_capacity(2048);
        xml.push_str(XML_DECLARATION);
        write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld>"#,
            NS_A, NS_R, NS_P
        )
        .map_err(xml_error)?;

        write!(
            xml,
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            escape(&self.background)
        )
        .map_err(xml_error)?;

        xml.push_str("<p:spTree>");
        xml.push_str(SP_TREE_HEADER);

        write_text_box(&mut xml, 2, "Title", &title_box(), &[slide.title.as_str()])?;
        write_text_box(&mut xml, 3, "Content", &body_box(), &slide.body_lines())?;
        if self.slide_numbers {
            let label = format!("Slide {}", number);
            write_text_box(&mut xml, 4, "Slide Number", &number_box(), &[label.as_str()])?;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
        Ok(xml)
    }
}

/// Relationship id of the slide at `idx` in presentation.xml.rels.
///
/// rId1 is the master and rId2 the theme.
fn slide_rel_id(idx: usize) -> String {
    format!("rId{}", idx + 3)
}

fn root_rels_xml() -> String {
    format!(
        concat!(
            "{}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="{}" Target="ppt/presentation.xml"/>"#,
            "</Relationships>"
        ),
        XML_DECLARATION, REL_OFFICE_DOCUMENT
    )
}

fn presentation_rels_xml(count: usize) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    write!(
        xml,
        r#"<Relationship Id="rId1" Type="{}" Target="slideMasters/slideMaster1.xml"/>"#,
        REL_SLIDE_MASTER
    )
    .map_err(xml_error)?;
    write!(
        xml,
        r#"<Relationship Id="rId2" Type="{}" Target="theme/theme1.xml"/>"#,
        REL_THEME
    )
    .map_err(xml_error)?;

    for idx in 0..count {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="slides/slide{}.xml"/>"#,
            slide_rel_id(idx),
            REL_SLIDE,
            idx + 1
        )
        .map_err(xml_error)?;
    }

    xml.push_str("</Relationships>");
    Ok(xml)
}

/// Append a text box shape with one paragraph per line.
fn write_text_box(
    xml: &mut String,
    id: u32,
    name: &str,
    style: &TextBox,
    lines: &[&str],
) -> Result<()> {
    write!(
        xml,
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#,
            r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#
        ),
        id,
        escape(name),
        style.x,
        style.y,
        style.cx,
        style.cy
    )
    .map_err(xml_error)?;

    if lines.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
    }

    for line in lines {
        xml.push_str("<a:p>");
        write!(xml, r#"<a:pPr algn="{}">"#, style.align.as_attr()).map_err(xml_error)?;
        if let Some(spacing) = style.line_spacing {
            write!(xml, r#"<a:lnSpc><a:spcPct val="{}"/></a:lnSpc>"#, spacing)
                .map_err(xml_error)?;
        }
        xml.push_str("</a:pPr>");

        write!(
            xml,
            r#"<a:r><a:rPr lang="en-US" sz="{}" b="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r>"#,
            style.size,
            if style.bold { 1 } else { 0 },
            style.color,
            escape(*line)
        )
        .map_err(xml_error)?;
        xml.push_str("</a:p>");
    }

    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn xml_error(e: std::fmt::Error) -> Error {
    Error::XmlError(e.to_string())
}
