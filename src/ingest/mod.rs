use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::LazyLock;
use regex::Regex;
use crate::errors::RiskError;

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p[ >].*?</w:p>").expect("valid regex")
});
static TEXT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Kind by file extension, case-insensitive.
    pub fn from_filename(name: &str) -> Result<Self, RiskError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("docx") => Ok(Self::Docx),
            Some("txt") => Ok(Self::PlainText),
            _ => Err(RiskError::UnsupportedFormat(format!(
                "'{}' is not a .pdf, .docx or .txt file", name
            ))),
        }
    }
}

/// Extract the text body of an uploaded document.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, RiskError> {
    let text = match kind {
        DocumentKind::Pdf => extract_pdf(bytes)?,
        DocumentKind::Docx => extract_docx(bytes)?,
        DocumentKind::PlainText => String::from_utf8(bytes.to_vec())
            .map_err(|_| RiskError::UnsupportedFormat("text file is not valid UTF-8".into()))?,
    };
    Ok(text.trim().to_string())
}

fn extract_pdf(bytes: &[u8]) -> Result<String, RiskError> {
    // pdf-extract can panic on malformed cross-reference tables
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(RiskError::UnsupportedFormat(format!("unreadable PDF: {}", e))),
        Err(_) => Err(RiskError::UnsupportedFormat("unreadable PDF".into())),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, RiskError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| RiskError::UnsupportedFormat(format!("unreadable DOCX container: {}", e)))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")
        .map_err(|e| RiskError::UnsupportedFormat(format!("DOCX has no document body: {}", e)))?
        .read_to_string(&mut xml)?;
    Ok(docx_xml_to_text(&xml))
}

/// Join `<w:t>` runs per paragraph, one paragraph per line.
pub fn docx_xml_to_text(xml: &str) -> String {
    PARAGRAPH_RE.find_iter(xml)
        .map(|p| {
            TEXT_RUN_RE.captures_iter(p.as_str())
                .filter_map(|c| c.get(1))
                .map(|m| decode_entities(m.as_str()))
                .collect::<String>()
        })
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let opts = zip::write::SimpleFileOptions::default();
            zip.start_file("word/document.xml", opts).unwrap();
            zip.write_all(document_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(DocumentKind::from_filename("arch.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("notes.docx").unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_filename("readme.txt").unwrap(), DocumentKind::PlainText);
        assert!(matches!(DocumentKind::from_filename("image.png"), Err(RiskError::UnsupportedFormat(_))));
        assert!(DocumentKind::from_filename("no_extension").is_err());
    }

    #[test]
    fn test_plaintext_utf8() {
        let text = extract_text("  Apache 2.4 on Ubuntu\n".as_bytes(), DocumentKind::PlainText).unwrap();
        assert_eq!(text, "Apache 2.4 on Ubuntu");
    }

    #[test]
    fn test_plaintext_invalid_utf8_rejected() {
        let err = extract_text(&[0x66, 0xff, 0xfe], DocumentKind::PlainText).unwrap_err();
        assert!(matches!(err, RiskError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_docx_xml_paragraphs() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Payment</w:t></w:r><w:r><w:t xml:space="preserve"> gateway</w:t></w:r></w:p>
            <w:p><w:r><w:t>PostgreSQL &amp; Redis</w:t></w:r></w:p>
            <w:p></w:p>
        </w:body></w:document>"#;
        assert_eq!(docx_xml_to_text(xml), "Payment gateway\nPostgreSQL & Redis");
    }

    #[test]
    fn test_docx_container() {
        let bytes = docx_bytes("<w:document><w:body><w:p><w:r><w:t>Web Server</w:t></w:r></w:p></w:body></w:document>");
        assert_eq!(extract_text(&bytes, DocumentKind::Docx).unwrap(), "Web Server");
    }

    #[test]
    fn test_docx_garbage_rejected() {
        let err = extract_text(b"not a zip", DocumentKind::Docx).unwrap_err();
        assert!(matches!(err, RiskError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_pdf_garbage_rejected() {
        assert!(extract_text(b"%PDF-broken", DocumentKind::Pdf).is_err());
    }
}
