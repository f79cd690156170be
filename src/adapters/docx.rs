//! Minimal WordprocessingML writer.
//!
//! Produces a `.docx` package with a single body of plain paragraphs. Each
//! paragraph holds one run with an explicit font size; page breaks are their
//! own paragraph containing a `w:br w:type="page"` run, which is how Word
//! itself inserts them.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::utils::error::Result;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// US Letter, 1" top/bottom and 1.25" left/right margins, in twentieths of a point.
const PAGE_SIZE: [(&str, &str); 2] = [("w:w", "12240"), ("w:h", "15840")];
const PAGE_MARGINS: [(&str, &str); 7] = [
    ("w:top", "1440"),
    ("w:right", "1800"),
    ("w:bottom", "1440"),
    ("w:left", "1800"),
    ("w:header", "720"),
    ("w:footer", "720"),
    ("w:gutter", "0"),
];

pub struct DocumentWriter {
    body: Writer<Vec<u8>>,
    paragraphs: usize,
    page_breaks: usize,
}

impl DocumentWriter {
    pub fn new() -> Result<Self> {
        let mut body = Writer::new(Vec::new());
        body.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut document = BytesStart::new("w:document");
        document.push_attribute(("xmlns:w", WORDML_NS));
        document.push_attribute(("xmlns:r", REL_NS));
        body.write_event(Event::Start(document))?;
        body.write_event(Event::Start(BytesStart::new("w:body")))?;

        Ok(Self {
            body,
            paragraphs: 0,
            page_breaks: 0,
        })
    }

    /// Appends a paragraph of `text` at `size_pt` points. Newlines become
    /// line breaks and tabs become tab stops within the same paragraph.
    /// Characters XML cannot represent are dropped.
    pub fn paragraph(&mut self, text: &str, size_pt: u32) -> Result<()> {
        let text = xml_text(text);
        let half_points = (size_pt * 2).to_string();

        self.start("w:p")?;
        self.start("w:r")?;
        self.start("w:rPr")?;
        self.empty_with("w:sz", &[("w:val", &half_points)])?;
        self.empty_with("w:szCs", &[("w:val", &half_points)])?;
        self.end("w:rPr")?;

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.empty_with("w:br", &[])?;
            }
            for (j, segment) in line.trim_end_matches('\r').split('\t').enumerate() {
                if j > 0 {
                    self.empty_with("w:tab", &[])?;
                }
                if !segment.is_empty() {
                    self.text(segment)?;
                }
            }
        }

        self.end("w:r")?;
        self.end("w:p")?;
        self.paragraphs += 1;
        Ok(())
    }

    pub fn page_break(&mut self) -> Result<()> {
        self.start("w:p")?;
        self.start("w:r")?;
        self.empty_with("w:br", &[("w:type", "page")])?;
        self.end("w:r")?;
        self.end("w:p")?;
        self.page_breaks += 1;
        Ok(())
    }

    pub fn paragraphs(&self) -> usize {
        self.paragraphs
    }

    pub fn page_breaks(&self) -> usize {
        self.page_breaks
    }

    /// Closes the body and packages the document. `title` is recorded in the
    /// core properties.
    pub fn finish(mut self, title: &str, created: DateTime<Utc>) -> Result<Vec<u8>> {
        self.start("w:sectPr")?;
        self.empty_with("w:pgSz", &PAGE_SIZE)?;
        self.empty_with("w:pgMar", &PAGE_MARGINS)?;
        self.end("w:sectPr")?;
        self.end("w:body")?;
        self.end("w:document")?;

        let document_xml = self.body.into_inner();
        let core_xml = core_properties(title, created)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(PACKAGE_RELS.as_bytes())?;
        zip.start_file("word/document.xml", options)?;
        zip.write_all(&document_xml)?;
        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(&core_xml)?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.body.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.body.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.body.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let mut element = BytesStart::new("w:t");
        element.push_attribute(("xml:space", "preserve"));
        self.body.write_event(Event::Start(element))?;
        self.body.write_event(Event::Text(BytesText::new(text)))?;
        self.end("w:t")
    }
}

/// `text` without the control characters XML 1.0 forbids. Tab, LF and CR stay.
fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn core_properties(title: &str, created: DateTime<Utc>) -> Result<Vec<u8>> {
    let timestamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("cp:coreProperties");
    root.push_attribute((
        "xmlns:cp",
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
    ));
    root.push_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"));
    root.push_attribute(("xmlns:dcterms", "http://purl.org/dc/terms/"));
    root.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("dc:title")))?;
    writer.write_event(Event::Text(BytesText::new(&xml_text(title))))?;
    writer.write_event(Event::End(BytesEnd::new("dc:title")))?;

    writer.write_event(Event::Start(BytesStart::new("dc:creator")))?;
    writer.write_event(Event::Text(BytesText::new(env!("CARGO_PKG_NAME"))))?;
    writer.write_event(Event::End(BytesEnd::new("dc:creator")))?;

    let mut created_el = BytesStart::new("dcterms:created");
    created_el.push_attribute(("xsi:type", "dcterms:W3CDTF"));
    writer.write_event(Event::Start(created_el))?;
    writer.write_event(Event::Text(BytesText::new(&timestamp)))?;
    writer.write_event(Event::End(BytesEnd::new("dcterms:created")))?;

    writer.write_event(Event::End(BytesEnd::new("cp:coreProperties")))?;
    Ok(writer.into_inner())
}
