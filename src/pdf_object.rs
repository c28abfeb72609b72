use crate::Error;
use lopdf::{Document, Object, ObjectId};

/// Reference chains longer than this are treated as broken.
const MAX_REFERENCE_DEPTH: usize = 32;

pub(super) trait PdfObjectDeref {
    /// Follow indirect references until a direct object is reached.
    fn deref<'a>(&'a self, doc: &'a Document) -> Result<&'a Object, Error>;

    fn get_object_id(&self) -> Option<ObjectId>;

    /// Read an `Integer` or `Real` as `f64`, following references.
    fn as_number(&self, doc: &Document) -> Result<f64, Error>;
}

impl PdfObjectDeref for Object {
    fn deref<'a>(&'a self, doc: &'a Document) -> Result<&'a Object, Error> {
        let mut current = self;
        for _ in 0..MAX_REFERENCE_DEPTH {
            match *current {
                Object::Reference(oid) => {
                    current = doc.objects.get(&oid).ok_or_else(|| {
                        Error::Other(format!("PDF Error: NoSuchReference({:#?})", oid))
                    })?;
                }
                _ => return Ok(current),
            }
        }
        Err(Error::Other("PDF Error: reference chain too deep".to_owned()))
    }

    fn get_object_id(&self) -> Option<ObjectId> {
        match *self {
            Object::Reference(ref id) => Some(*id),
            _ => None,
        }
    }

    fn as_number(&self, doc: &Document) -> Result<f64, Error> {
        match *self.deref(doc)? {
            Object::Integer(value) => Ok(value as f64),
            #[allow(clippy::unnecessary_cast)]
            Object::Real(value) => Ok(value as f64),
            _ => Err(Error::LoPdfError(lopdf::Error::Type)),
        }
    }
}
