// Tests for human rendering and the output writer

use super::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
    let buffer = SharedBuffer::default();
    (
        OutputWriter::with_writer(format, quiet, Box::new(buffer.clone())),
        buffer,
    )
}

fn document(id: &str, title: &str, published: bool) -> Document {
    serde_json::from_value(json!({
        "id": format!("{id}-full"),
        "urlId": id,
        "url": format!("/doc/{id}"),
        "title": title,
        "text": "Body text",
        "revision": 3,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-03-05T14:30:00Z",
        "publishedAt": if published { json!("2024-01-01T00:00:00Z") } else { json!(null) }
    }))
    .unwrap()
}

#[test]
fn test_document_table() {
    let rows = document_rows(&[document("a1", "Onboarding", true), document("b2", "Draft notes", false)]);
    let table = render_table(DOCUMENT_HEADERS, &rows);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("ID │ TITLE"));
    assert!(lines[2].contains("Onboarding"));
    assert!(lines[2].contains("2024-03-05 14:30"));
    assert!(lines[2].ends_with("published"));
    assert!(lines[3].ends_with("draft"));
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("line one\nline two", 100), "line one line two");
    assert_eq!(truncate("abcdefghij", 5), "abcd…");
}

#[test]
fn test_collection_tree_indents_children() {
    let tree: Vec<CollectionDocument> = serde_json::from_value(json!([
        {
            "id": "root",
            "title": "Handbook",
            "url": "/doc/root",
            "children": [
                { "id": "child", "title": "Benefits", "url": "/doc/child", "children": [] }
            ]
        }
    ]))
    .unwrap();

    assert_eq!(
        collection_tree(&tree),
        "- Handbook (root)\n  - Benefits (child)\n"
    );
    assert_eq!(collection_tree(&[]), "Collection has no documents\n");
}

#[test]
fn test_search_results() {
    let results = vec![DocumentSearchResult {
        document: document("a1", "Vacation policy", true),
        context: Some("Employees get <b>25</b> days".to_string()),
        ranking: Some(0.9),
    }];

    let text = search_results(&results);
    assert!(text.starts_with("1. Vacation policy (a1)\n"));
    assert!(text.contains("25"));
    assert_eq!(search_results(&[]), "No documents matched\n");
}

#[test]
fn test_document_detail_includes_body() {
    let text = document_detail(&document("a1", "Onboarding", false));
    assert!(text.starts_with("# Onboarding\n"));
    assert!(text.contains("Status:    draft"));
    assert!(text.contains("Revision:  3"));
    assert!(text.ends_with("Body text\n"));
}

#[test]
fn test_render_uses_json_for_machine_formats() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.render(&json!({ "id": "a1" }), |_| "human".to_string()).unwrap();
    assert_eq!(buffer.contents(), "{\"id\":\"a1\"}\n");

    let (mut out, buffer) = writer(OutputFormat::Human, false);
    out.render(&json!({ "id": "a1" }), |_| "human\n".to_string()).unwrap();
    assert_eq!(buffer.contents(), "human\n");
}

#[test]
fn test_yaml_output() {
    let (mut out, buffer) = writer(OutputFormat::Yaml, false);
    out.data(&json!({ "name": "Handbook" })).unwrap();
    assert_eq!(buffer.contents(), "name: Handbook\n");
}

#[test]
fn test_messages_are_suppressed_outside_human_format() {
    let (mut out, buffer) = writer(OutputFormat::Json, false);
    out.info("fetching").unwrap();
    out.success("done").unwrap();
    out.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "");

    let (mut out, buffer) = writer(OutputFormat::Human, true);
    out.success("done").unwrap();
    out.warning("careful").unwrap();
    assert_eq!(buffer.contents(), "WARNING: careful\n");
}

#[test]
fn test_no_spinner_without_terminal() {
    let (out, _) = writer(OutputFormat::Human, false);
    assert!(out.spinner("Loading").is_none());
}
