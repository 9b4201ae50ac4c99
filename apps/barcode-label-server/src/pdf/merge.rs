//! Label page merging
//!
//! Copies the pages of several PDFs, in order, into one fresh document.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::MergeError;

/// The merged multi-page PDF
#[derive(Debug, Clone)]
pub struct MergedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Merge serialized PDFs into one, keeping every page in input order.
///
/// Nothing is deduplicated or reordered: the output has as many pages as
/// all inputs together.
pub fn merge_documents<B: AsRef<[u8]>>(sources: &[B]) -> Result<MergedDocument, MergeError> {
    if sources.is_empty() {
        return Err(MergeError::Empty);
    }

    let mut max_id: u32 = 1;
    let mut page_order: Vec<ObjectId> = Vec::new();
    let mut pages: BTreeMap<ObjectId, Dictionary> = BTreeMap::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for (index, source) in sources.iter().enumerate() {
        let mut doc = Document::load_mem(source.as_ref()).map_err(|e| MergeError::Malformed {
            index,
            reason: e.to_string(),
        })?;

        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let source_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if source_pages.is_empty() {
            return Err(MergeError::Malformed {
                index,
                reason: "document has no pages".to_string(),
            });
        }

        for page_id in source_pages {
            let page = doc
                .get_dictionary(page_id)
                .map_err(|e| MergeError::Malformed {
                    index,
                    reason: e.to_string(),
                })?
                .clone();
            pages.insert(page_id, page);
            page_order.push(page_id);
        }

        for (object_id, object) in doc.objects {
            match object.type_name().unwrap_or("") {
                "Catalog" | "Pages" | "Page" | "Outlines" | "Outline" => {}
                _ => {
                    objects.insert(object_id, object);
                }
            }
        }
    }

    let mut document = Document::with_version("1.5");
    document.objects.extend(objects);
    document.max_id = max_id;

    let pages_id = document.new_object_id();
    for (page_id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        document.objects.insert(page_id, Object::Dictionary(page));
    }

    let page_count = page_order.len();
    let kids: Vec<Object> = page_order.into_iter().map(Object::Reference).collect();
    document.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(page_count as i64)),
        ])),
    );

    let catalog_id = document.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    document.trailer.set("Root", Object::Reference(catalog_id));

    document.renumber_objects();
    document.compress();

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| MergeError::Serialize(e.to_string()))?;

    tracing::debug!(pages = page_count, bytes = bytes.len(), "Merged label pages");

    Ok(MergedDocument { bytes, page_count })
}
