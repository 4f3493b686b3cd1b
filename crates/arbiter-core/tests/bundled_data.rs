//! The sample fixtures and example config shipped at the workspace root stay loadable.

use std::path::PathBuf;

use arbiter_core::config::ArbiterConfig;
use arbiter_core::store::DocumentStore;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

#[test]
fn sample_fixtures_load_with_a_question_set_per_document() {
    let data = workspace_root().join("data");
    let store = DocumentStore::load(&data.join("documents.json"), &data.join("questions.json"))
        .expect("sample fixtures load");

    assert_eq!(store.len(), 2);
    for doc in store.documents() {
        let text = store.document_text(doc.doc_id).expect("backing file exists");
        assert!(!text.trim().is_empty());
        assert_eq!(store.question_set(doc.doc_id).unwrap().questions.len(), 4);
    }
}

#[test]
fn example_config_parses() {
    let cfg = ArbiterConfig::load(&workspace_root().join("arbiter.example.yaml"))
        .expect("example config is valid");
    assert_eq!(cfg.models.len(), 3);
    assert_eq!(cfg.criteria().len(), 4);
}
