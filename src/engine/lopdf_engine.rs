//! Concrete engine backed by `lopdf`.

use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

use super::layout;
use super::{DocumentEngine, OutlineCursor, PageHandle, RawBlock, Rect};

/// Document engine backed by [`lopdf::Document`].
pub struct LopdfEngine {
    doc: LopdfDocument,
    /// Page object ids in engine page order.
    page_order: Vec<ObjectId>,
}

impl LopdfEngine {
    /// Open a PDF file.
    ///
    /// An unreadable or invalid input is fatal; there is no meaningful
    /// partial document to assemble from it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)
            .map_err(|e| Error::PdfParse(format!("failed to open PDF: {}", e)))?;
        Ok(Self::from_document(doc))
    }

    /// Open a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)
            .map_err(|e| Error::PdfParse(format!("failed to parse PDF: {}", e)))?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        // get_pages() keys are 1-indexed page numbers in document order.
        let page_order = doc.get_pages().into_values().collect();
        Self { doc, page_order }
    }

    /// Resolve a page object id to its 0-based index in page order.
    fn page_index(&self, page_ref: ObjectId) -> Option<i32> {
        self.page_order
            .iter()
            .position(|id| *id == page_ref)
            .map(|i| i as i32)
    }
}

impl DocumentEngine for LopdfEngine {
    type Page<'a>
        = LopdfPage<'a>
    where
        Self: 'a;
    type Cursor<'a>
        = LopdfCursor<'a>
    where
        Self: 'a;

    fn page_count(&self) -> usize {
        self.page_order.len()
    }

    fn page(&self, index: usize) -> Result<LopdfPage<'_>> {
        let id = *self
            .page_order
            .get(index)
            .ok_or_else(|| Error::PdfParse(format!("page index {} out of range", index)))?;
        Ok(LopdfPage {
            doc: &self.doc,
            id,
        })
    }

    fn outline_root(&self) -> Result<Option<LopdfCursor<'_>>> {
        let catalog = match catalog_dict(&self.doc) {
            Some(dict) => dict,
            None => return Ok(None),
        };

        let outlines = match catalog.get(b"Outlines") {
            Ok(obj) => deref(&self.doc, obj),
            Err(_) => return Ok(None),
        };
        let outlines_dict = match outlines.as_dict() {
            Ok(dict) => dict,
            Err(_) => return Ok(None),
        };

        match outlines_dict.get(b"First") {
            Ok(Object::Reference(first)) => Ok(Some(LopdfCursor {
                engine: self,
                id: *first,
            })),
            _ => Ok(None),
        }
    }
}

/// One page of an opened document.
pub struct LopdfPage<'a> {
    doc: &'a LopdfDocument,
    id: ObjectId,
}

impl PageHandle for LopdfPage<'_> {
    fn bounds(&self) -> Result<Rect> {
        let page_dict = self
            .doc
            .get_dictionary(self.id)
            .map_err(|e| Error::PdfParse(format!("unreadable page dictionary: {}", e)))?;

        if let Ok(media_box) = page_dict.get(b"MediaBox") {
            if let Ok(array) = deref(self.doc, media_box).as_array() {
                if array.len() >= 4 {
                    let nums: Vec<f64> = array.iter().filter_map(get_number).collect();
                    if nums.len() >= 4 {
                        return Ok(Rect {
                            x0: nums[0],
                            y0: nums[1],
                            x1: nums[2],
                            y1: nums[3],
                        });
                    }
                }
            }
        }

        // Default to Letter size
        Ok(Rect {
            x0: 0.0,
            y0: 0.0,
            x1: 612.0,
            y1: 792.0,
        })
    }

    fn text_blocks(&self) -> Result<Vec<RawBlock>> {
        let bounds = self.bounds()?;
        layout::extract_blocks(self.doc, self.id, bounds)
    }
}

/// Cursor into the `/Outlines` graph of an opened document.
///
/// The graph is navigated through `/First` and `/Next` references without
/// ever materializing it, so a malformed document can hand back dangling
/// references or cycles; every accessor reports those as faults.
pub struct LopdfCursor<'a> {
    engine: &'a LopdfEngine,
    id: ObjectId,
}

impl<'a> LopdfCursor<'a> {
    fn dict(&self) -> Result<&'a lopdf::Dictionary> {
        self.engine
            .doc
            .get_dictionary(self.id)
            .map_err(|e| Error::OutlineNode(format!("node {:?}: {}", self.id, e)))
    }

    fn link(&self, key: &[u8]) -> Result<Option<Self>> {
        let dict = self.dict()?;
        match dict.get(key) {
            Ok(Object::Reference(id)) => Ok(Some(LopdfCursor {
                engine: self.engine,
                id: *id,
            })),
            Ok(Object::Null) | Err(_) => Ok(None),
            Ok(_) => Err(Error::OutlineNode(format!(
                "node {:?}: malformed {} link",
                self.id,
                String::from_utf8_lossy(key)
            ))),
        }
    }

    /// Resolve this node's destination to a page index.
    ///
    /// Checks `/Dest` first, then `/A` GoTo actions. A well-formed node
    /// whose target cannot be resolved (external link, unknown name) gets
    /// the `-1` sentinel rather than a fault.
    fn resolve_target(&self, dict: &lopdf::Dictionary) -> i32 {
        if let Ok(dest) = dict.get(b"Dest") {
            if let Some(page) = self.resolve_dest(dest) {
                return page;
            }
        }

        if let Ok(action) = dict.get(b"A") {
            if let Ok(action_dict) = deref(&self.engine.doc, action).as_dict() {
                let is_goto = matches!(
                    action_dict.get(b"S"),
                    Ok(Object::Name(name)) if name.as_slice() == b"GoTo"
                );
                if is_goto {
                    if let Ok(dest) = action_dict.get(b"D") {
                        if let Some(page) = self.resolve_dest(dest) {
                            return page;
                        }
                    }
                }
            }
        }

        -1
    }

    /// Resolve a destination object (explicit array or named destination).
    fn resolve_dest(&self, dest: &Object) -> Option<i32> {
        let doc = &self.engine.doc;
        match deref(doc, dest) {
            // Explicit destination array: [page_ref, /type, ...]
            Object::Array(arr) => {
                if let Some(Object::Reference(page_ref)) = arr.first() {
                    return self.engine.page_index(*page_ref);
                }
                None
            }
            Object::String(bytes, _) => {
                let name = pdf_string(bytes);
                self.resolve_named_dest(&name)
            }
            Object::Name(name) => {
                let name = String::from_utf8_lossy(name).to_string();
                self.resolve_named_dest(&name)
            }
            _ => None,
        }
    }

    /// Look a named destination up in the catalog's `/Names` → `/Dests`
    /// name tree, or in the older `/Dests` dictionary.
    fn resolve_named_dest(&self, name: &str) -> Option<i32> {
        let doc = &self.engine.doc;
        let catalog = catalog_dict(doc)?;

        if let Ok(names) = catalog.get(b"Names") {
            if let Ok(names_dict) = deref(doc, names).as_dict() {
                if let Ok(dests) = names_dict.get(b"Dests") {
                    if let Ok(tree) = deref(doc, dests).as_dict() {
                        if let Some(page) = self.lookup_name_tree(tree, name) {
                            return Some(page);
                        }
                    }
                }
            }
        }

        // /Dests dictionary (pre-1.2 documents)
        if let Ok(dests) = catalog.get(b"Dests") {
            if let Ok(dests_dict) = deref(doc, dests).as_dict() {
                if let Ok(dest) = dests_dict.get(name.as_bytes()) {
                    return self.resolve_dest_value(deref(doc, dest));
                }
            }
        }

        None
    }

    /// Recursive name-tree lookup: leaf `/Names` pair arrays, `/Kids`
    /// intermediate nodes.
    fn lookup_name_tree(&self, tree: &lopdf::Dictionary, name: &str) -> Option<i32> {
        let doc = &self.engine.doc;

        if let Ok(pairs) = tree.get(b"Names") {
            if let Ok(pairs) = deref(doc, pairs).as_array() {
                for pair in pairs.chunks(2) {
                    if pair.len() < 2 {
                        break;
                    }
                    let key = match deref(doc, &pair[0]) {
                        Object::String(bytes, _) => pdf_string(bytes),
                        _ => continue,
                    };
                    if key == name {
                        return self.resolve_dest_value(deref(doc, &pair[1]));
                    }
                }
            }
        }

        if let Ok(kids) = tree.get(b"Kids") {
            if let Ok(kids) = deref(doc, kids).as_array() {
                for kid in kids {
                    if let Ok(kid_dict) = deref(doc, kid).as_dict() {
                        if let Some(page) = self.lookup_name_tree(kid_dict, name) {
                            return Some(page);
                        }
                    }
                }
            }
        }

        None
    }

    /// A named destination's value is either the array directly or a
    /// dictionary with a `/D` entry.
    fn resolve_dest_value(&self, value: &Object) -> Option<i32> {
        match value {
            Object::Array(arr) => {
                if let Some(Object::Reference(page_ref)) = arr.first() {
                    return self.engine.page_index(*page_ref);
                }
                None
            }
            Object::Dictionary(dict) => {
                let dest = dict.get(b"D").ok()?;
                self.resolve_dest(dest)
            }
            _ => None,
        }
    }
}

impl OutlineCursor for LopdfCursor<'_> {
    type Id = ObjectId;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn title(&self) -> Result<String> {
        let dict = self.dict()?;
        let title = dict
            .get(b"Title")
            .map_err(|e| Error::OutlineNode(format!("node {:?}: missing /Title: {}", self.id, e)))?;
        match deref(&self.engine.doc, title) {
            Object::String(bytes, _) => Ok(pdf_string(bytes)),
            _ => Err(Error::OutlineNode(format!(
                "node {:?}: /Title is not a string",
                self.id
            ))),
        }
    }

    fn target_page(&self) -> Result<i32> {
        let dict = self.dict()?;
        Ok(self.resolve_target(dict))
    }

    fn first_child(&self) -> Result<Option<Self>> {
        self.link(b"First")
    }

    fn next_sibling(&self) -> Result<Option<Self>> {
        self.link(b"Next")
    }
}

/// Resolve the catalog dictionary from the trailer.
fn catalog_dict(doc: &LopdfDocument) -> Option<&lopdf::Dictionary> {
    let root = doc.trailer.get(b"Root").ok()?;
    deref(doc, root).as_dict().ok()
}

/// Follow a single reference level; other objects pass through unchanged.
fn deref<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Extract a number from a PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, then UTF-8, then Latin-1.
pub(crate) fn pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => s,
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
