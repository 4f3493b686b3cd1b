//! Text extraction for document files and uploads.
//!
//! PDFs are read page by page; page texts are joined with a single newline in
//! page order. Plain text is decoded as lossy UTF-8.

use std::path::Path;

use tracing::debug;

use crate::errors::{ArbiterError, ArbiterResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Text,
}

impl FileKind {
    /// Classify by extension, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(FileKind::Pdf)
        } else if lower.ends_with(".txt") || lower.ends_with(".md") {
            Some(FileKind::Text)
        } else {
            None
        }
    }
}

/// Join page texts with `"\n"`. Only the single line break lopdf appends to a
/// page is dropped; blank lines inside or at the end of a page survive.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .map(|p| {
            let p = p.as_ref();
            p.strip_suffix("\r\n")
                .or_else(|| p.strip_suffix('\n'))
                .unwrap_or(p)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pdf_pages(doc: &lopdf::Document, origin: &str) -> ArbiterResult<Vec<String>> {
    let pages = doc.get_pages();
    let mut out = Vec::with_capacity(pages.len());
    for page_no in pages.keys() {
        let text = doc
            .extract_text(&[*page_no])
            .map_err(|e| ArbiterError::Extraction {
                path: origin.to_string(),
                message: format!("page {}: {}", page_no, e),
            })?;
        out.push(text);
    }
    debug!(origin = %origin, pages = out.len(), "extracted pdf text");
    Ok(out)
}

/// Extract the text of a backing file on disk.
pub fn extract_file(path: &Path) -> ArbiterResult<String> {
    let origin = path.display().to_string();
    match FileKind::from_name(&origin) {
        Some(FileKind::Pdf) => {
            let doc = lopdf::Document::load(path).map_err(|e| ArbiterError::Extraction {
                path: origin.clone(),
                message: e.to_string(),
            })?;
            Ok(join_pages(pdf_pages(&doc, &origin)?))
        }
        // Unknown extensions are read as text, fixtures are trusted.
        _ => {
            let bytes = std::fs::read(path)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Extract the text of an uploaded file, dispatching on its name.
pub fn extract_bytes(file_name: &str, bytes: &[u8]) -> ArbiterResult<String> {
    match FileKind::from_name(file_name) {
        Some(FileKind::Text) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        Some(FileKind::Pdf) => {
            let doc = lopdf::Document::load_mem(bytes).map_err(|e| ArbiterError::Extraction {
                path: file_name.to_string(),
                message: e.to_string(),
            })?;
            Ok(join_pages(pdf_pages(&doc, file_name)?))
        }
        None => Err(ArbiterError::UnsupportedFormat {
            file_name: file_name.to_string(),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a minimal PDF with one text line per page.
    pub(crate) fn make_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn join_pages_uses_single_newline() {
        assert_eq!(join_pages(["one\n", "two", "three\r\n"]), "one\ntwo\nthree");
        assert_eq!(join_pages(Vec::<String>::new()), "");
    }

    #[test]
    fn join_pages_keeps_blank_lines_inside_a_page() {
        assert_eq!(join_pages(["a\n\n", "b"]), "a\n\nb");
        assert_eq!(join_pages(["a\n\nb\n", "c"]), "a\n\nb\nc");
    }

    #[test]
    fn classifies_by_extension() {
        assert_eq!(FileKind::from_name("Report.PDF"), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_name("notes.txt"), Some(FileKind::Text));
        assert_eq!(FileKind::from_name("sheet.xlsx"), None);
    }

    #[test]
    fn upload_rejects_unknown_types() {
        let err = extract_bytes("data.bin", b"\x00\x01").unwrap_err();
        assert!(matches!(err, ArbiterError::UnsupportedFormat { .. }));
    }

    #[test]
    fn upload_text_is_lossy_utf8() {
        let text = extract_bytes("a.txt", b"caf\xc3\xa9 \xff").unwrap();
        assert!(text.starts_with("café "));
    }

    #[test]
    fn pdf_pages_are_joined_in_order() {
        let bytes = make_pdf(&["First page", "Second page"]);
        let text = extract_bytes("doc.pdf", &bytes).unwrap();
        let first = text.find("First page").expect("page 1 text");
        let second = text.find("Second page").expect("page 2 text");
        assert!(first < second);
        assert!(text[first..second].contains('\n'));
    }

    #[test]
    fn pdf_on_disk_matches_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.pdf");
        std::fs::write(&path, make_pdf(&["Hello"])).unwrap();
        let text = extract_file(&path).unwrap();
        assert!(text.contains("Hello"));
    }

    #[test]
    fn corrupt_pdf_is_an_extraction_error() {
        let err = extract_bytes("bad.pdf", b"not a pdf").unwrap_err();
        assert!(matches!(err, ArbiterError::Extraction { .. }));
    }
}
