#![allow(dead_code)]

use quick_xml::events::Event;
use quick_xml::Reader;
use rust_xlsxwriter::Workbook;
use std::io::{Cursor, Read};

pub const HEADERS: [&str; 3] = ["工厂名", "产品信息", "产品数量"];

/// Builds an xlsx workbook with the standard header row followed by
/// `(factory, product info, quantity)` rows. Quantities that parse as numbers
/// are written as numeric cells and empty strings leave the cell blank.
pub fn spreadsheet(rows: &[(&str, &str, &str)]) -> Vec<u8> {
    spreadsheet_with_headers(&HEADERS, rows)
}

pub fn spreadsheet_with_headers(headers: &[&str], rows: &[(&str, &str, &str)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, header) in headers.iter().enumerate() {
        sheet.write_string(0, c as u16, *header).unwrap();
    }
    for (r, (factory, info, qty)) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, value) in [factory, info].into_iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r, c as u16, *value).unwrap();
            }
        }
        match qty.parse::<f64>() {
            Ok(n) => {
                sheet.write_number(r, 2, n).unwrap();
            }
            Err(_) if !qty.is_empty() => {
                sheet.write_string(r, 2, *qty).unwrap();
            }
            Err(_) => {}
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// All entries of a zip archive as `(name, bytes)`, in archive order.
pub fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    /// Run size in points, when one was set.
    pub size: Option<u32>,
    pub page_break: bool,
}

/// Body paragraphs of a `.docx`, in document order.
pub fn docx_paragraphs(docx: &[u8]) -> Vec<Paragraph> {
    let entries = zip_entries(docx);
    let (_, xml) = entries
        .iter()
        .find(|(name, _)| name == "word/document.xml")
        .expect("document part present");
    let xml = String::from_utf8(xml.clone()).unwrap();

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<Paragraph> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"w:p" => {
                current = Some(Paragraph {
                    text: String::new(),
                    size: None,
                    page_break: false,
                });
            }
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::Text(t) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.text.push_str(&t.unescape().unwrap());
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"w:sz" => {
                let value = e.try_get_attribute("w:val").unwrap().unwrap().value;
                let half_points: u32 = std::str::from_utf8(&value).unwrap().parse().unwrap();
                if let Some(p) = current.as_mut() {
                    p.size = Some(half_points / 2);
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"w:br" => {
                let is_page = e.try_get_attribute("w:type").unwrap().is_some();
                if let Some(p) = current.as_mut() {
                    if is_page {
                        p.page_break = true;
                    } else {
                        p.text.push('\n');
                    }
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                if let Some(p) = current.take() {
                    paragraphs.push(p);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs
}

pub fn text_paragraphs(docx: &[u8]) -> Vec<Paragraph> {
    docx_paragraphs(docx)
        .into_iter()
        .filter(|p| !p.page_break)
        .collect()
}

pub fn page_breaks(docx: &[u8]) -> usize {
    docx_paragraphs(docx).iter().filter(|p| p.page_break).count()
}

/// Hand-rolled multipart/form-data body for router tests.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "----factory-labels-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Returns the content type header value and the encoded body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
