pub mod api;
mod clock;
mod error;
mod image_insert_to_page;
mod image_xobject;
mod logging;
mod lopdf_utils;
mod naming;
mod pdf_object;
mod quota;
mod rectangle;
mod service;
mod settings;
mod signature_image;
mod signer;
mod user_signature_info;

use image_insert_to_page::InsertImageToPage;
use lopdf::{Document, ObjectId};

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::Error;
pub use logging::init_logger;
pub use lopdf;
pub use naming::{is_plain_file_name, sanitize, signed_file_name};
pub use quota::{
    day_key, ActivityLog, ActivityStore, JsonFileStore, MemoryStore, QuotaEnforcer, DAILY_LIMIT,
};
pub use rectangle::{Rectangle, SIGNATURE_BOTTOM_OFFSET, SIGNATURE_HEIGHT, SIGNATURE_WIDTH};
pub use service::{SignedPdf, SigningService};
pub use settings::{Cli, Settings};
pub use signature_image::decode_data_url;
pub use signer::DocumentSigner;
pub use user_signature_info::{SigningRequest, ValidSigningRequest};

/// Base name of the XObject the signature image is registered under.
const SIGNATURE_XOBJECT_NAME: &str = "Signature";

/// A loaded PDF document that a signature can be stamped onto.
#[derive(Debug, Clone)]
pub struct PDFSigningDocument {
    raw_document: Document,
}

impl PDFSigningDocument {
    pub fn new(raw_document: Document) -> Self {
        PDFSigningDocument { raw_document }
    }

    /// Parse a document from its serialized bytes.
    pub fn read_from(pdf_data: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(Document::load_mem(pdf_data)?))
    }

    pub fn get_document_ref(&self) -> &Document {
        &self.raw_document
    }

    /// Object id of page 1.
    pub fn first_page(&self) -> Result<ObjectId, Error> {
        self.raw_document
            .get_pages()
            .values()
            .next()
            .copied()
            .ok_or(Error::NoPages)
    }

    /// The page's `MediaBox`, inherited from the page tree when needed.
    pub fn page_rectangle(&self, page_id: ObjectId) -> Result<Rectangle, Error> {
        lopdf_utils::page_media_box(&self.raw_document, page_id)
    }

    /// Draw the PNG signature on the first page at the fixed signature position.
    /// Returns the rectangle it was drawn in.
    pub fn stamp_signature(&mut self, png_data: &[u8]) -> Result<Rectangle, Error> {
        let page_id = self.first_page()?;
        let rect = Rectangle::signature_on(&self.page_rectangle(page_id)?);
        let image_name =
            lopdf_utils::unused_xobject_name(&self.raw_document, page_id, SIGNATURE_XOBJECT_NAME)?;
        let image_object_id = self
            .raw_document
            .add_image(png_data, &image_name, page_id, rect)?;
        log::debug!(
            "Inserted signature `{}` objId: `({},{})` at ({}, {}) size {}x{}.",
            image_name,
            image_object_id.0,
            image_object_id.1,
            rect.x1,
            rect.y1,
            rect.width(),
            rect.height(),
        );
        Ok(rect)
    }

    /// Serialize the (modified) document.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let mut pdf_file_data = Vec::new();
        self.raw_document.save_to(&mut pdf_file_data)?;
        Ok(pdf_file_data)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{sample_pdf, sample_png};
    use super::*;
    use lopdf::{content::Content, dictionary, Object, Stream};

    fn image_xobject_count(doc: &Document) -> usize {
        doc.objects
            .values()
            .filter(|object| match object {
                lopdf::Object::Stream(stream) => stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|s| s.as_name_str())
                    .map(|s| s == "Image")
                    .unwrap_or(false),
                _ => false,
            })
            .count()
    }

    #[test]
    fn stamped_document_carries_signature_on_first_page() {
        let source = sample_pdf(2);
        let before = PDFSigningDocument::read_from(&source).unwrap();
        let images_before = image_xobject_count(before.get_document_ref());

        let mut document = PDFSigningDocument::read_from(&source).unwrap();
        let rect = document.stamp_signature(&sample_png()).unwrap();
        assert_eq!(
            rect,
            Rectangle {
                x1: 231.0,
                y1: 50.0,
                x2: 381.0,
                y2: 100.0
            }
        );
        let signed = document.save_to_bytes().unwrap();

        let reloaded = PDFSigningDocument::read_from(&signed).unwrap();
        let doc = reloaded.get_document_ref();
        // Color image plus its soft mask.
        assert_eq!(image_xobject_count(doc), images_before + 2);

        let pages = doc.get_pages();
        let first = pages[&1];
        let second = pages[&2];

        let names = lopdf_utils::page_xobject_names(doc, first).unwrap();
        assert!(names.contains(&b"Signature".to_vec()));
        assert!(lopdf_utils::page_xobject_names(doc, second)
            .unwrap()
            .is_empty());

        // Inherited fonts stay reachable from the stamped page.
        let resources = doc.get_object(first).unwrap().as_dict().unwrap();
        let resources = resources.get(b"Resources").unwrap().as_dict().unwrap();
        assert!(resources.has(b"Font"));

        let content = Content::decode(&doc.get_page_content(first).unwrap()).unwrap();
        let cm = content
            .operations
            .iter()
            .rev()
            .find(|op| op.operator == "cm")
            .unwrap();
        let operands: Vec<f64> = cm
            .operands
            .iter()
            .map(|o| pdf_object::PdfObjectDeref::as_number(o, doc).unwrap())
            .collect();
        assert_eq!(operands, vec![150.0, 0.0, 0.0, 50.0, 231.0, 50.0]);
        let draw = content.operations.last().unwrap();
        assert_eq!(draw.operator, "Q");
    }

    #[test]
    fn second_stamp_gets_a_fresh_name() {
        let mut document = PDFSigningDocument::read_from(&sample_pdf(1)).unwrap();
        document.stamp_signature(&sample_png()).unwrap();
        document.stamp_signature(&sample_png()).unwrap();

        let doc = document.get_document_ref();
        let first = document.first_page().unwrap();
        let names = lopdf_utils::page_xobject_names(doc, first).unwrap();
        assert!(names.contains(&b"Signature".to_vec()));
        assert!(names.contains(&b"Signature1".to_vec()));
    }

    #[test]
    fn document_without_pages_is_rejected() {
        let mut document = PDFSigningDocument::read_from(&sample_pdf(0)).unwrap();
        assert!(matches!(
            document.stamp_signature(&sample_png()),
            Err(Error::NoPages)
        ));
    }

    /// A document whose pages all get `page_entries`, with nothing on the page tree root.
    fn in_memory_document<F>(
        page_count: usize,
        page_entries: F,
    ) -> (PDFSigningDocument, Vec<ObjectId>)
    where
        F: FnOnce(&mut Document) -> lopdf::Dictionary,
    {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let entries = page_entries(&mut doc);
        let mut page_ids = Vec::new();
        for _ in 0..page_count {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
            };
            for (key, value) in entries.iter() {
                page.set(key.clone(), value.clone());
            }
            page_ids.push(doc.add_object(page));
        }
        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        (PDFSigningDocument::new(doc), page_ids)
    }

    #[test]
    fn page_without_media_box_is_letter_sized() {
        let (mut document, pages) = in_memory_document(1, |_| lopdf::Dictionary::new());
        assert_eq!(
            document.page_rectangle(pages[0]).unwrap(),
            Rectangle {
                x1: 0.0,
                y1: 0.0,
                x2: 612.0,
                y2: 792.0
            }
        );
        let rect = document.stamp_signature(&sample_png()).unwrap();
        assert_eq!((rect.x1, rect.y1), (231.0, 50.0));
    }

    #[test]
    fn indirect_media_box_is_followed() {
        let (document, pages) = in_memory_document(1, |doc| {
            let media_box = doc.add_object(Object::Array(vec![
                0.into(),
                0.into(),
                595.into(),
                842.into(),
            ]));
            dictionary! { "MediaBox" => Object::Reference(media_box) }
        });
        assert_eq!(
            document.page_rectangle(pages[0]).unwrap(),
            Rectangle {
                x1: 0.0,
                y1: 0.0,
                x2: 595.0,
                y2: 842.0
            }
        );
    }

    #[test]
    fn real_media_box_entries_are_read() {
        let (document, pages) = in_memory_document(1, |_| {
            dictionary! {
                "MediaBox" => vec![
                    Object::Real(0.0),
                    Object::Real(10.5),
                    Object::Real(595.5),
                    Object::Real(842.25),
                ],
            }
        });
        let rect = document.page_rectangle(pages[0]).unwrap();
        assert_eq!(
            rect,
            Rectangle {
                x1: 0.0,
                y1: 10.5,
                x2: 595.5,
                y2: 842.25
            }
        );
        assert_eq!(Rectangle::signature_on(&rect).y1, 60.5);
    }

    #[test]
    fn shared_resources_stay_untouched_on_other_pages() {
        let mut shared_id = (0, 0);
        let (mut document, pages) = in_memory_document(2, |doc| {
            let font_id = doc.add_object(
                dictionary! {"Type" => "Font", "Subtype" => "Type1", "BaseFont" => "Helvetica"},
            );
            let logo_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
            let xobjects_id = doc.add_object(dictionary! { "Logo" => Object::Reference(logo_id) });
            shared_id = doc.add_object(dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
                "XObject" => Object::Reference(xobjects_id),
            });
            dictionary! {
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => Object::Reference(shared_id),
            }
        });
        document.stamp_signature(&sample_png()).unwrap();

        let doc = document.get_document_ref();
        let first = lopdf_utils::page_xobject_names(doc, pages[0]).unwrap();
        assert!(first.contains(&b"Signature".to_vec()));
        assert!(first.contains(&b"Logo".to_vec()));

        let second = lopdf_utils::page_xobject_names(doc, pages[1]).unwrap();
        assert_eq!(second.len(), 1);
        assert!(second.contains(&b"Logo".to_vec()));

        let page = doc.get_object(pages[0]).unwrap().as_dict().unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        assert!(resources.has(b"Font"));

        let shared = doc.get_object(shared_id).unwrap().as_dict().unwrap();
        assert!(matches!(shared.get(b"XObject"), Ok(Object::Reference(_))));
    }

    #[test]
    fn invalid_png_is_rejected() {
        let mut document = PDFSigningDocument::read_from(&sample_pdf(1)).unwrap();
        assert!(document.stamp_signature(b"\x89PNG broken").is_err());
    }
}
