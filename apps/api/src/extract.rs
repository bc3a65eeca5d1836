//! Text extraction — turns uploaded document bytes into plain text.
//!
//! Dispatch is strictly on the filename suffix, case-insensitive. PDF parsing
//! is delegated to `pdf-extract`; DOCX is unzipped and `word/document.xml` is
//! walked with `quick-xml`. Best effort only: a scanned, image-only PDF yields
//! empty or near-empty text here and is rejected downstream, not in this module.

use std::io::Read;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse PDF: {0}")]
    Pdf(String),

    #[error("Failed to parse DOCX: {0}")]
    Docx(String),
}

/// Extracts plain text from a document, dispatching on the filename suffix.
/// The result is trimmed of leading/trailing whitespace.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".pdf") {
        extract_pdf(bytes)
    } else if lower.ends_with(".docx") {
        extract_docx(bytes)
    } else {
        Err(ExtractError::UnsupportedFormat(filename.to_string()))
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    Ok(text.trim().to_string())
}

/// A .docx file is a zip archive; the document body lives in `word/document.xml`.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut file = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    let text = document_xml_to_text(&xml)?;
    Ok(text.trim().to_string())
}

/// Walks WordprocessingML, collecting the contents of `w:t` runs and inserting
/// line breaks at paragraph ends and explicit breaks.
fn document_xml_to_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"br" => out.push('\n'),
            Ok(Event::Text(e)) if in_text_run => {
                let text = e.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Builds a minimal in-memory .docx containing one paragraph per input line.
    pub(crate) fn make_docx(lines: &[&str]) -> Vec<u8> {
        let mut body = String::new();
        for line in lines {
            body.push_str(&format!("<w:p><w:r><w:t>{line}</w:t></w:r></w:p>"));
        }
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
        );

        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options: zip::write::SimpleFileOptions = Default::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_unsupported_extension_names_the_file() {
        let err = extract_text(b"hello", "resume.txt").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("resume.txt"));
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        let docx = make_docx(&["Senior Rust engineer"]);
        let text = extract_text(&docx, "CV.DOCX").unwrap();
        assert_eq!(text, "Senior Rust engineer");
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let docx = make_docx(&["First paragraph", "Second paragraph"]);
        let text = extract_text(&docx, "cv.docx").unwrap();
        assert_eq!(text, "First paragraph\nSecond paragraph");
    }

    #[test]
    fn test_docx_entities_are_unescaped() {
        let docx = make_docx(&["C&amp;C++ developer"]);
        let text = extract_text(&docx, "cv.docx").unwrap();
        assert_eq!(text, "C&C++ developer");
    }

    #[test]
    fn test_garbage_docx_bytes_fail_as_docx_error() {
        let err = extract_text(b"not a zip archive", "cv.docx").unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }

    #[test]
    fn test_garbage_pdf_bytes_fail_as_pdf_error() {
        let err = extract_text(b"not a pdf", "cv.pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn test_document_xml_ignores_non_text_nodes() {
        let xml = r#"<w:document xmlns:w="x"><w:body>
            <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Hello</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = document_xml_to_text(xml).unwrap();
        assert_eq!(text.trim(), "Hello");
    }
}
