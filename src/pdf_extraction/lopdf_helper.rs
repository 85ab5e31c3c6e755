// lopdf helper - Pure Rust PDF object navigation
use crate::types::{ExtractError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

// Guards against reference cycles and runaway Parent chains
const MAX_DEPTH: usize = 32;

/// Load a PDF document using lopdf
pub fn load_pdf(path: &Path) -> Result<Document> {
    Document::load(path).map_err(|source| ExtractError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Follow references until a direct object is reached.
pub fn resolve<'a>(document: &'a Document, object: &'a Object) -> Result<&'a Object> {
    let mut current = object;
    for _ in 0..MAX_DEPTH {
        match current {
            Object::Reference(id) => current = document.get_object(*id)?,
            direct => return Ok(direct),
        }
    }
    Err(ExtractError::Malformed("reference chain too deep".into()))
}

pub fn get_int(document: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    let object = dict.get(key).ok()?;
    resolve(document, object).ok()?.as_i64().ok()
}

pub fn get_name<'a>(document: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    let object = dict.get(key).ok()?;
    resolve(document, object).ok()?.as_name().ok()
}

/// Resources of a page, inherited from the page tree when the page has none.
pub fn page_resources(document: &Document, page_id: ObjectId) -> Result<Option<&Dictionary>> {
    let mut node = document.get_dictionary(page_id)?;
    for _ in 0..MAX_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            return Ok(resolve(document, resources)?.as_dict().ok());
        }
        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => node = document.get_dictionary(*parent)?,
            _ => return Ok(None),
        }
    }
    Ok(None)
}

/// Image XObjects listed in a page's resources, in dictionary order.
pub fn page_image_ids(document: &Document, page_id: ObjectId) -> Result<Vec<ObjectId>> {
    let Some(resources) = page_resources(document, page_id)? else {
        return Ok(Vec::new());
    };
    let Ok(xobjects) = resources.get(b"XObject") else {
        return Ok(Vec::new());
    };
    let Ok(xobjects) = resolve(document, xobjects)?.as_dict() else {
        return Ok(Vec::new());
    };

    let mut ids = Vec::new();
    for (_name, object) in xobjects.iter() {
        let Object::Reference(id) = object else { continue };
        if let Ok(Object::Stream(stream)) = document.get_object(*id) {
            let is_image = get_name(document, &stream.dict, b"Subtype").map_or(false, |n| n == b"Image");
            if is_image {
                ids.push(*id);
            }
        }
    }
    Ok(ids)
}

/// Filter names of a stream, outermost first.
pub fn stream_filters(document: &Document, stream: &Stream) -> Vec<Vec<u8>> {
    let Ok(filter) = stream.dict.get(b"Filter") else {
        return Vec::new();
    };
    match resolve(document, filter) {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| resolve(document, item).ok()?.as_name().ok())
            .map(|name| name.to_vec())
            .collect(),
        _ => Vec::new(),
    }
}
