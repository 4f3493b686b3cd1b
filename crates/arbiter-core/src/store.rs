//! Documents and per-type question sets loaded from JSON fixtures.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info};

use crate::errors::{ArbiterError, ArbiterResult};
use crate::extract;
use crate::model::{Document, DocumentRecord, QuestionSet};

pub struct DocumentStore {
    documents: RwLock<Vec<Entry>>,
    question_sets: Vec<QuestionSet>,
}

/// A document plus whether its text has been extracted. Empty text is a valid
/// extraction result, so `doc_txt` alone cannot mark the cache.
struct Entry {
    doc: Document,
    cached: bool,
}

fn read_fixture<T: serde::de::DeserializeOwned>(path: &Path) -> ArbiterResult<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ArbiterError::startup(format!("failed to read fixture {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        ArbiterError::startup(format!("failed to parse fixture {}: {}", path.display(), e))
    })
}

impl DocumentStore {
    /// Load both fixture files. Relative document paths resolve against the
    /// directory holding `documents_path`.
    pub fn load(documents_path: &Path, questions_path: &Path) -> ArbiterResult<Self> {
        let mut records: Vec<DocumentRecord> = read_fixture(documents_path)?;
        let base = documents_path.parent().map(Path::to_path_buf).unwrap_or_default();
        for r in &mut records {
            let p = PathBuf::from(&r.doc_path);
            if p.is_relative() && !base.as_os_str().is_empty() {
                r.doc_path = base.join(p).display().to_string();
            }
        }
        let sets: Vec<QuestionSet> = read_fixture(questions_path)?;

        let store = Self::from_records(records, sets)?;
        info!(
            documents = store.len(),
            question_sets = store.question_sets.len(),
            source = %documents_path.display(),
            "loaded fixtures"
        );
        Ok(store)
    }

    pub fn from_records(
        records: Vec<DocumentRecord>,
        question_sets: Vec<QuestionSet>,
    ) -> ArbiterResult<Self> {
        let mut seen = HashSet::new();
        for qs in &question_sets {
            if !seen.insert(qs.doc_type.as_str()) {
                return Err(ArbiterError::startup(format!(
                    "duplicate question set for type '{}'",
                    qs.doc_type
                )));
            }
        }

        let documents = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| Entry {
                doc: Document {
                    doc_id: i as u32,
                    doc_name: r.doc_name,
                    doc_type: r.doc_type,
                    doc_path: r.doc_path,
                    doc_txt: String::new(),
                },
                cached: false,
            })
            .collect();

        Ok(Self {
            documents: RwLock::new(documents),
            question_sets,
        })
    }

    pub fn empty() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            question_sets: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn documents(&self) -> Vec<Document> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.doc.clone())
            .collect()
    }

    pub fn document(&self, doc_id: u32) -> ArbiterResult<Document> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|e| e.doc.doc_id == doc_id)
            .map(|e| e.doc.clone())
            .ok_or_else(|| ArbiterError::not_found("document", doc_id))
    }

    /// The document and whether its text is already cached.
    fn lookup(&self, doc_id: u32) -> ArbiterResult<(Document, bool)> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|e| e.doc.doc_id == doc_id)
            .map(|e| (e.doc.clone(), e.cached))
            .ok_or_else(|| ArbiterError::not_found("document", doc_id))
    }

    /// Text of a document, extracted on first access and cached afterwards.
    pub fn document_text(&self, doc_id: u32) -> ArbiterResult<String> {
        let (doc, cached) = self.lookup(doc_id)?;
        if cached {
            return Ok(doc.doc_txt);
        }

        let path = Path::new(&doc.doc_path);
        if doc.doc_path.is_empty() || !path.exists() {
            return Err(ArbiterError::not_found("file on disk", &doc.doc_path));
        }
        let text = extract::extract_file(path)?;
        debug!(doc_id, chars = text.len(), "cached document text");

        let mut docs = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = docs
            .iter_mut()
            .find(|e| e.doc.doc_id == doc_id)
            .ok_or_else(|| ArbiterError::not_found("document", doc_id))?;
        // A concurrent reader may have filled it first; keep that text.
        if !slot.cached {
            slot.doc.doc_txt = text;
            slot.cached = true;
        }
        Ok(slot.doc.doc_txt.clone())
    }

    /// Document with `doc_txt` populated.
    pub fn document_with_text(&self, doc_id: u32) -> ArbiterResult<Document> {
        self.document_text(doc_id)?;
        self.document(doc_id)
    }

    pub fn question_set_for_type(&self, doc_type: &str) -> ArbiterResult<QuestionSet> {
        self.question_sets
            .iter()
            .find(|qs| qs.doc_type == doc_type)
            .cloned()
            .ok_or_else(|| ArbiterError::not_found("question set for type", doc_type))
    }

    /// Question set matching the document's type tag.
    pub fn question_set(&self, doc_id: u32) -> ArbiterResult<QuestionSet> {
        let doc = self.document(doc_id)?;
        self.question_set_for_type(&doc.doc_type)
    }

    /// Register an uploaded file; its text is extracted immediately.
    pub fn add_upload(
        &self,
        doc_name: &str,
        doc_type: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> ArbiterResult<Document> {
        let text = extract::extract_bytes(file_name, bytes)?;
        if text.trim().is_empty() {
            return Err(ArbiterError::invalid_input(format!(
                "{} has no extractable text",
                file_name
            )));
        }
        let mut docs = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let doc_id = docs.iter().map(|e| e.doc.doc_id + 1).max().unwrap_or(0);
        let doc = Document {
            doc_id,
            doc_name: doc_name.to_string(),
            doc_type: doc_type.to_string(),
            doc_path: String::new(),
            doc_txt: text,
        };
        docs.push(Entry {
            doc: doc.clone(),
            cached: true,
        });
        info!(doc_id, file_name, "registered uploaded document");
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, ty: &str, path: &str) -> DocumentRecord {
        DocumentRecord {
            doc_name: name.to_string(),
            doc_type: ty.to_string(),
            doc_path: path.to_string(),
        }
    }

    fn memo_store(dir: &Path) -> DocumentStore {
        let memo = dir.join("memo.txt");
        std::fs::write(&memo, "From: Ada\nTo: Team").unwrap();
        DocumentStore::from_records(
            vec![
                record("Memo", "memo", memo.to_str().unwrap()),
                record("Q3 Report", "report", dir.join("report.txt").to_str().unwrap()),
            ],
            vec![QuestionSet {
                doc_type: "memo".to_string(),
                questions: vec!["Who wrote this?".to_string()],
            }],
        )
        .unwrap()
    }

    #[test]
    fn question_set_matches_type_or_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = memo_store(dir.path());

        let qs = store.question_set(0).unwrap();
        assert_eq!(qs.questions, vec!["Who wrote this?".to_string()]);

        let err = store.question_set(1).unwrap_err();
        assert!(matches!(err, ArbiterError::NotFound { .. }));
        assert!(err.to_string().contains("report"));

        assert!(matches!(
            store.question_set(99),
            Err(ArbiterError::NotFound { what: "document", .. })
        ));
    }

    #[test]
    fn text_is_cached_after_first_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = memo_store(dir.path());

        assert!(store.documents()[0].doc_txt.is_empty());
        let first = store.document_text(0).unwrap();
        assert_eq!(first, "From: Ada\nTo: Team");

        // The backing file is gone; the cached text must still be served.
        std::fs::remove_file(dir.path().join("memo.txt")).unwrap();
        let second = store.document_text(0).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.document_with_text(0).unwrap().doc_txt, first);
    }

    #[test]
    fn empty_text_is_cached_too() {
        let dir = tempfile::tempdir().unwrap();
        let blank = dir.path().join("blank.txt");
        std::fs::write(&blank, "").unwrap();
        let store = DocumentStore::from_records(
            vec![record("Blank", "memo", blank.to_str().unwrap())],
            vec![],
        )
        .unwrap();

        assert_eq!(store.document_text(0).unwrap(), "");
        std::fs::remove_file(&blank).unwrap();
        assert_eq!(store.document_text(0).unwrap(), "");
        assert_eq!(store.document_with_text(0).unwrap().doc_txt, "");
    }

    #[test]
    fn missing_backing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = memo_store(dir.path());
        assert!(matches!(
            store.document_text(1),
            Err(ArbiterError::NotFound { what: "file on disk", .. })
        ));
        assert!(matches!(
            store.document_text(5),
            Err(ArbiterError::NotFound { what: "document", .. })
        ));
    }

    #[test]
    fn duplicate_question_types_fail_at_startup() {
        let qs = QuestionSet {
            doc_type: "memo".to_string(),
            questions: vec![],
        };
        let err = DocumentStore::from_records(vec![], vec![qs.clone(), qs]).err().unwrap();
        assert!(matches!(err, ArbiterError::Startup { .. }));
    }

    #[test]
    fn load_resolves_relative_paths_and_assigns_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        std::fs::write(
            dir.path().join("documents.json"),
            r#"[{"doc_name": "A", "doc_type": "memo", "doc_path": "a.txt"},
                {"doc_name": "B", "doc_type": "memo", "doc_path": "b.txt"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("questions.json"),
            r#"[{"doc_type": "memo", "questions": ["Who?", "When?"]}]"#,
        )
        .unwrap();

        let store = DocumentStore::load(
            &dir.path().join("documents.json"),
            &dir.path().join("questions.json"),
        )
        .unwrap();
        let docs = store.documents();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].doc_id, 1);
        assert_eq!(store.document_text(0).unwrap(), "alpha");
    }

    #[test]
    fn unreadable_fixture_is_startup_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("documents.json"), "{not json").unwrap();
        let err = DocumentStore::load(
            &dir.path().join("documents.json"),
            &dir.path().join("questions.json"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ArbiterError::Startup { .. }));
    }

    #[test]
    fn upload_gets_next_id_and_cached_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = memo_store(dir.path());
        let doc = store
            .add_upload("Notes", "memo", "notes.txt", b"uploaded body")
            .unwrap();
        assert_eq!(doc.doc_id, 2);
        assert_eq!(store.document_text(2).unwrap(), "uploaded body");
        assert_eq!(store.question_set(2).unwrap().doc_type, "memo");

        assert!(store.add_upload("X", "memo", "x.docx", b"..").is_err());
        assert_eq!(store.len(), 3);
    }
}
