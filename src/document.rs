//! Paragraph-level view of an uploaded clinic document.
//!
//! `.docx` files are read straight from the OOXML container: each body-level
//! `w:p` in `word/document.xml` becomes one paragraph whose text is the
//! concatenation of its runs. Paragraphs inside tables are not body
//! paragraphs and are skipped, as is anything under paragraph or run
//! properties, drawings and text boxes. Plain-text files give one paragraph
//! per line.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use tracing::debug;
use zip::result::ZipError;

use crate::error::DocumentError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Elements inside a paragraph whose text is not part of the paragraph.
const SKIPPED: &[&[u8]] = &[
    b"w:pPr",
    b"w:rPr",
    b"mc:AlternateContent",
    b"w:drawing",
    b"w:pict",
    b"w:txbxContent",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    paragraphs: Vec<String>,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let doc = match ext.as_deref() {
            Some("docx") => Self::from_docx(BufReader::new(File::open(path)?))?,
            Some("txt") | Some("md") => Self::from_text(&std::fs::read_to_string(path)?),
            _ => return Err(DocumentError::UnsupportedFormat(path.to_path_buf())),
        };
        debug!(path = %path.display(), paragraphs = doc.paragraphs.len(), "document loaded");
        Ok(doc)
    }

    pub fn from_docx<R: Read + Seek>(reader: R) -> Result<Self, DocumentError> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut xml = String::new();
        match archive.by_name(DOCUMENT_PART) {
            Ok(mut part) => {
                part.read_to_string(&mut xml)?;
            }
            Err(ZipError::FileNotFound) => return Err(DocumentError::MissingPart(DOCUMENT_PART)),
            Err(e) => return Err(e.into()),
        }
        Ok(Document {
            paragraphs: parse_body_paragraphs(&xml)?,
        })
    }

    pub fn from_text(text: &str) -> Self {
        Document {
            paragraphs: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }
}

/// Walk `word/document.xml` and collect the text of every direct child `w:p`
/// of `w:body`. `w:tab`/`w:ptab` become a tab, `w:br`/`w:cr` a newline and
/// `w:noBreakHyphen` a plain `-`.
fn parse_body_paragraphs(xml: &str) -> Result<Vec<String>, DocumentError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut current: Option<String> = None;
    let mut skip_depth: Option<usize> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                match e.name().as_ref() {
                    b"w:body" => body_depth = Some(depth),
                    b"w:p" if body_depth.is_some_and(|b| depth == b + 1) => {
                        current = Some(String::new())
                    }
                    _ if current.is_none() || skip_depth.is_some() => {}
                    n if SKIPPED.contains(&n) => skip_depth = Some(depth),
                    b"w:t" => in_text = true,
                    _ => {}
                }
            }
            Event::Empty(e) => match e.name().as_ref() {
                // self-closing, so depth is still the body level
                b"w:p" if body_depth == Some(depth) => paragraphs.push(String::new()),
                _ if skip_depth.is_some() => {}
                b"w:tab" | b"w:ptab" => push_char(&mut current, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut current, '\n'),
                b"w:noBreakHyphen" => push_char(&mut current, '-'),
                _ => {}
            },
            Event::Text(e) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.push_str(&e.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::End(e) => {
                if skip_depth == Some(depth) {
                    skip_depth = None;
                }
                match e.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:p" if body_depth.is_some_and(|b| depth == b + 1) => {
                        if let Some(p) = current.take() {
                            paragraphs.push(p);
                        }
                    }
                    b"w:body" => body_depth = None,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn push_char(current: &mut Option<String>, c: char) {
    if let Some(p) = current.as_mut() {
        p.push(c);
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    fn docx_with(part: &str, body: &str) -> Cursor<Vec<u8>> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        );
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(part, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn runs_join_into_paragraphs() {
        let body = concat!(
            r#"<w:p><w:r><w:t>Jane Doe </w:t></w:r><w:r><w:t>1234567</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p><w:pPr><w:jc w:val="left"/></w:pPr><w:r><w:t xml:space="preserve">Skin: </w:t><w:tab/><w:t>G1 &amp; dry</w:t></w:r></w:p>"#,
        );
        let doc = Document::from_docx(docx_with(DOCUMENT_PART, body)).unwrap();
        assert_eq!(doc.paragraphs(), &["Jane Doe 1234567", "", "Skin: \tG1 & dry"]);
    }

    #[test]
    fn table_paragraphs_are_skipped() {
        let body = concat!(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p>"#,
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            r#"<w:p><w:r><w:t>After</w:t><w:br/><w:t>line</w:t></w:r></w:p>"#,
        );
        let doc = Document::from_docx(docx_with(DOCUMENT_PART, body)).unwrap();
        assert_eq!(doc.paragraphs(), &["Before", "After\nline"]);
    }

    #[test]
    fn text_boxes_and_properties_stay_out_of_paragraph_text() {
        let text_box = r#"<w:p><w:r><w:t>NOTE</w:t></w:r></w:p>"#;
        let body = format!(
            concat!(
                r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
                r#"<w:r><w:t>Jane Doe 1234567</w:t></w:r><w:r><mc:AlternateContent>"#,
                r#"<mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent>{0}</w:txbxContent></wps:txbx></w:drawing></mc:Choice>"#,
                r#"<mc:Fallback><w:pict><v:textbox><w:txbxContent>{0}</w:txbxContent></v:textbox></w:pict></mc:Fallback>"#,
                r#"</mc:AlternateContent></w:r></w:p>"#,
                r#"<w:p><w:r><w:t>Plan: review</w:t></w:r></w:p>"#,
            ),
            text_box
        );
        let doc = Document::from_docx(docx_with(DOCUMENT_PART, &body)).unwrap();
        assert_eq!(doc.paragraphs(), &["Jane Doe 1234567", "Plan: review"]);
    }

    #[test]
    fn non_breaking_hyphen_and_positional_tab() {
        let body = concat!(
            r#"<w:p><w:r><w:t>Mary O'Neil</w:t><w:noBreakHyphen/><w:t>Smith 123456</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">Final radiotherapy 15/03/2020 </w:t><w:noBreakHyphen/>"#,
            r#"<w:t xml:space="preserve"> 40Gy/15</w:t><w:ptab w:relativeTo="margin" w:alignment="right" w:leader="none"/><w:t>JS</w:t></w:r></w:p>"#,
        );
        let doc = Document::from_docx(docx_with(DOCUMENT_PART, body)).unwrap();
        assert_eq!(
            doc.paragraphs(),
            &["Mary O'Neil-Smith 123456", "Final radiotherapy 15/03/2020 - 40Gy/15\tJS"]
        );
    }

    #[test]
    fn missing_document_part() {
        let err = Document::from_docx(docx_with("word/other.xml", "")).unwrap_err();
        assert!(matches!(err, DocumentError::MissingPart(_)));
    }

    #[test]
    fn not_a_zip() {
        let err = Document::from_docx(Cursor::new(b"plain text".to_vec())).unwrap_err();
        assert!(matches!(err, DocumentError::Zip(_)));
    }

    #[test]
    fn text_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("clinic.TXT");
        std::fs::write(&txt, "Header\nJane Doe 1234567\n").unwrap();
        let doc = Document::open(&txt).unwrap();
        assert_eq!(doc.paragraphs(), &["Header", "Jane Doe 1234567"]);

        let pdf = dir.path().join("clinic.pdf");
        std::fs::write(&pdf, "%PDF").unwrap();
        assert!(matches!(
            Document::open(&pdf),
            Err(DocumentError::UnsupportedFormat(_))
        ));
    }
}
