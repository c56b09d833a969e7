//! Appending the ART PDF after the report pages

use std::collections::BTreeSet;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::compiler::errors::RenderError;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// PDF with every page of `attachment` placed after the pages of `report`
///
/// Returns the merged bytes and the merged page count.
pub fn append_pdf(report: &[u8], attachment: &[u8]) -> Result<(Vec<u8>, usize), RenderError> {
    let mut dest = Document::load_mem(report)
        .map_err(|e| RenderError::Attachment(format!("Failed to load report: {e}")))?;
    let mut source = Document::load_mem(attachment)
        .map_err(|e| RenderError::Attachment(format!("Failed to load attachment: {e}")))?;

    let source_pages: Vec<ObjectId> = source.get_pages().values().copied().collect();
    if source_pages.is_empty() {
        return Err(RenderError::Attachment("Attachment has no pages".into()));
    }

    // Pages leave their original tree, so inherited attributes must be copied in
    for &page_id in &source_pages {
        let inherited = inherited_attributes(&source, page_id)?;
        if let Ok(page) = source.get_object_mut(page_id).and_then(Object::as_dict_mut) {
            for (key, value) in inherited {
                if !page.has(&key) {
                    page.set(key, value);
                }
            }
        }
    }

    let offset = dest.max_id;
    let pages_id = pages_root(&dest)?;
    let mut kids: Vec<ObjectId> = dest.get_pages().values().copied().collect();

    for (old_id, object) in std::mem::take(&mut source.objects) {
        dest.objects
            .insert((old_id.0 + offset, old_id.1), remap_object_refs(object, offset));
    }

    for old_id in source_pages {
        let new_id = (old_id.0 + offset, old_id.1);
        if let Ok(page) = dest.get_object_mut(new_id).and_then(Object::as_dict_mut) {
            page.set("Parent", Object::Reference(pages_id));
        }
        kids.push(new_id);
    }

    dest.max_id = source.max_id + offset;

    let page_count = kids.len();
    let pages = dest
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|_| RenderError::Attachment("Invalid pages dictionary".into()))?;
    pages.set(
        "Kids",
        Object::Array(kids.into_iter().map(Object::Reference).collect()),
    );
    pages.set("Count", Object::Integer(page_count as i64));

    dest.prune_objects();
    dest.compress();

    let mut buffer = Vec::new();
    dest.save_to(&mut buffer)
        .map_err(|e| RenderError::Attachment(format!("Failed to save merged PDF: {e}")))?;

    Ok((buffer, page_count))
}

fn pages_root(doc: &Document) -> Result<ObjectId, RenderError> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| RenderError::Attachment("Report has no page tree".into()))
}

/// Inheritable attributes found on the ancestors of `page_id`, nearest first
///
/// A `/Parent` chain that revisits a node is rejected.
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
) -> Result<Vec<(Vec<u8>, Object)>, RenderError> {
    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut visited = BTreeSet::from([page_id]);
    let mut current = parent_of(doc, page_id);

    while let Some(node_id) = current {
        if !visited.insert(node_id) {
            return Err(RenderError::Attachment(format!(
                "Page tree cycle at object {} {}",
                node_id.0, node_id.1
            )));
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE {
            if found.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        current = parent_of(doc, node_id);
    }
    Ok(found)
}

fn parent_of(doc: &Document, id: ObjectId) -> Option<ObjectId> {
    doc.get_dictionary(id)
        .ok()
        .and_then(|dict: &Dictionary| dict.get(b"Parent").ok())
        .and_then(|parent| parent.as_reference().ok())
}

/// Shift every object reference by `offset`
fn remap_object_refs(obj: Object, offset: u32) -> Object {
    match obj {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(arr) => Object::Array(
            arr.into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::Stream;

    /// A minimal PDF with `num_pages` pages; MediaBox lives on the page tree root
    pub(crate) fn create_test_pdf(num_pages: u32, label: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let catalog_id = doc.new_object_id();

        let mut kids = Vec::new();
        for page_num in 0..num_pages {
            let page_id = doc.new_object_id();
            let content_id = doc.new_object_id();
            let content = format!("BT /F1 12 Tf 50 700 Td ({label}-{}) Tj ET", page_num + 1);
            doc.objects.insert(
                content_id,
                Object::Stream(Stream::new(Dictionary::new(), content.into_bytes())),
            );

            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set("Contents", Object::Reference(content_id));
            doc.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(num_pages as i64));
        pages.set("Kids", Object::Array(kids));
        pages.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ]),
        );
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_append_keeps_report_first() {
        let report = create_test_pdf(3, "Laudo");
        let art = create_test_pdf(2, "ART");

        let (merged, page_count) = append_pdf(&report, &art).unwrap();
        assert_eq!(page_count, 5);

        let doc = Document::load_mem(&merged).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 5);

        let first = String::from_utf8_lossy(&doc.get_page_content(pages[&1]).unwrap()).to_string();
        let last = String::from_utf8_lossy(&doc.get_page_content(pages[&5]).unwrap()).to_string();
        assert!(first.contains("Laudo-1"));
        assert!(last.contains("ART-2"));
    }

    #[test]
    fn test_appended_pages_point_at_report_tree() {
        let (merged, _) =
            append_pdf(&create_test_pdf(1, "Laudo"), &create_test_pdf(1, "ART")).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        let root = pages_root(&doc).unwrap();

        for page_id in doc.get_pages().values() {
            let page = doc.get_dictionary(*page_id).unwrap();
            assert_eq!(page.get(b"Parent").unwrap().as_reference().unwrap(), root);
            assert!(page.has(b"MediaBox") || doc.get_dictionary(root).unwrap().has(b"MediaBox"));
        }
    }

    /// One page whose page tree root names the page as its own parent
    pub(crate) fn create_cyclic_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();
        let catalog_id = doc.new_object_id();

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        doc.objects.insert(page_id, Object::Dictionary(page));

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(1));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Parent", Object::Reference(page_id));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_parent_cycle_is_rejected() {
        let art = create_cyclic_pdf();
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(append_pdf(&create_test_pdf(1, "Laudo"), &art));
        });

        let result = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .expect("append_pdf must return on a cyclic page tree");
        match result {
            Err(RenderError::Attachment(message)) => assert!(message.contains("cycle")),
            other => panic!("expected attachment error, got {:?}", other.map(|(_, n)| n)),
        }
    }

    #[test]
    fn test_invalid_attachment_is_reported() {
        let result = append_pdf(&create_test_pdf(1, "Laudo"), b"not a pdf");
        assert!(matches!(result, Err(RenderError::Attachment(_))));
    }
}
