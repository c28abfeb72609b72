use crate::pdf_object::PdfObjectDeref;
use crate::rectangle::Rectangle;
use crate::Error;
use lopdf::{
    content::{Content, Operation},
    Dictionary, Document, Object, ObjectId, Stream,
};
use std::collections::HashSet;

/// Page trees deeper than this are treated as cyclic.
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// US Letter, used when a page tree carries no `MediaBox` at all.
const FALLBACK_MEDIA_BOX: Rectangle = Rectangle {
    x1: 0.0,
    y1: 0.0,
    x2: 612.0,
    y2: 792.0,
};

/// Look up a page attribute, walking up the `Parent` chain for inheritable keys
/// such as `MediaBox` and `Resources`.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, Error> {
    let mut node_id = Some(page_id);
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let id = match node_id {
            Some(id) => id,
            None => return Ok(None),
        };
        let node = doc.get_object(id)?.deref(doc)?.as_dict()?;
        if let Ok(value) = node.get(key) {
            return Ok(Some(value));
        }
        node_id = node.get(b"Parent").ok().and_then(|p| p.get_object_id());
    }
    Err(Error::Other("Page tree is too deep or cyclic.".to_owned()))
}

/// The `MediaBox` of a page as a normalized rectangle.
pub(crate) fn page_media_box(doc: &Document, page_id: ObjectId) -> Result<Rectangle, Error> {
    let media_box = match inherited_attribute(doc, page_id, b"MediaBox")? {
        Some(media_box) => media_box.deref(doc)?.as_array()?,
        None => {
            log::warn!(
                "Page `({},{})` has no MediaBox, assuming US Letter.",
                page_id.0,
                page_id.1
            );
            return Ok(FALLBACK_MEDIA_BOX);
        }
    };
    if media_box.len() < 4 {
        return Err(Error::Other(format!(
            "MediaBox needs 4 numbers, got {}.",
            media_box.len()
        )));
    }
    Ok(Rectangle::from_corners(
        (media_box[0].as_number(doc)?, media_box[1].as_number(doc)?),
        (media_box[2].as_number(doc)?, media_box[3].as_number(doc)?),
    ))
}

/// Names of all XObjects visible from the page's resource dictionary.
pub(crate) fn page_xobject_names(
    doc: &Document,
    page_id: ObjectId,
) -> Result<HashSet<Vec<u8>>, Error> {
    let mut names = HashSet::new();
    if let Some(resources) = inherited_attribute(doc, page_id, b"Resources")? {
        let resources = resources.deref(doc)?.as_dict()?;
        if let Ok(xobjects) = resources.get(b"XObject") {
            for (name, _) in xobjects.deref(doc)?.as_dict()?.iter() {
                names.insert(name.clone());
            }
        }
    }
    Ok(names)
}

/// First name of the form `{base}`, `{base}1`, `{base}2`, ... not yet used by the page.
pub(crate) fn unused_xobject_name(
    doc: &Document,
    page_id: ObjectId,
    base: &str,
) -> Result<String, Error> {
    let taken = page_xobject_names(doc, page_id)?;
    let mut candidate = base.to_owned();
    let mut counter = 0u32;
    while taken.contains(candidate.as_bytes()) {
        counter += 1;
        candidate = format!("{}{}", base, counter);
    }
    Ok(candidate)
}

/// Give the page a `Resources` dictionary of its own, with an inline `XObject` map.
///
/// Resources inherited from the page tree or shared between pages through an
/// indirect reference are copied, so fonts and images stay visible while new
/// entries only land on this page.
fn own_page_resources(doc: &mut Document, page_id: ObjectId) -> Result<(), Error> {
    let mut resources = match inherited_attribute(doc, page_id, b"Resources")? {
        Some(resources) => resources.deref(doc)?.as_dict()?.clone(),
        None => Dictionary::new(),
    };
    let xobjects = match resources.get(b"XObject") {
        Ok(xobjects) => xobjects.deref(doc)?.as_dict()?.clone(),
        Err(_) => Dictionary::new(),
    };
    resources.set("XObject", Object::Dictionary(xobjects));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Register `xobject_id` under `xobject_name` in the page's `/Resources /XObject`.
pub(crate) fn add_xobject_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    xobject_name: &str,
    xobject_id: ObjectId,
) -> Result<(), Error> {
    own_page_resources(doc, page_id)?;
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .get_mut(b"Resources")?
        .as_dict_mut()?
        .get_mut(b"XObject")?
        .as_dict_mut()?
        .set(xobject_name, Object::Reference(xobject_id));
    Ok(())
}

/// Draw `content` on top of whatever the page already shows.
///
/// The existing content streams are left untouched but wrapped in `q`/`Q` so any
/// transformation they leave behind does not leak into the appended operations.
pub(crate) fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Content<Vec<Operation>>,
) -> Result<(), Error> {
    let existing = doc
        .get_object_mut(page_id)?
        .as_dict_mut()?
        .remove(b"Contents");

    let mut streams = match existing {
        Some(Object::Reference(id)) => match doc.get_object(id)? {
            Object::Array(list) => list.clone(),
            _ => vec![Object::Reference(id)],
        },
        Some(Object::Array(list)) => list,
        Some(other) => {
            log::warn!("Unexpected page Contents `{:?}`, replacing it.", other);
            vec![]
        }
        None => vec![],
    };

    if !streams.is_empty() {
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let restore_id = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        streams.insert(0, Object::Reference(save_id));
        streams.push(Object::Reference(restore_id));
    }
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
    streams.push(Object::Reference(stamp_id));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", Object::Array(streams));
    Ok(())
}
