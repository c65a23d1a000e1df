use std::collections::HashSet;

use lopdf::Document;

use crate::error::ConvertError;

/// Page box of a PDF page in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRect {
    pub width: f64,
    pub height: f64,
}

/// Structural view of a PDF held in memory.
#[derive(Debug)]
pub struct PdfReader {
    doc: Document,
}

impl PdfReader {
    /// Parse PDF bytes.
    ///
    /// # Errors
    /// `DocumentOpenError` if the bytes are not a readable PDF.
    pub fn from_bytes(bytes: &[u8]) -> crate::error::Result<Self> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| ConvertError::document_open(format!("not a valid PDF: {e}")))?;
        Ok(Self { doc })
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// MediaBox of a page dictionary, following Parent inheritance.
    ///
    /// A Parent chain that revisits a node is rejected.
    fn get_media_box(&self, dict: &lopdf::Dictionary) -> crate::error::Result<lopdf::Object> {
        let mut visited = HashSet::new();
        let mut current = dict;
        loop {
            if let Ok(obj) = current.get(b"MediaBox") {
                return Ok(obj.clone());
            }

            let Ok(lopdf::Object::Reference(parent_id)) = current.get(b"Parent") else {
                return Err(ConvertError::document_open("MediaBox not found"));
            };
            if !visited.insert(*parent_id) {
                return Err(ConvertError::document_open(format!(
                    "page tree cycle at object {} {}",
                    parent_id.0, parent_id.1
                )));
            }
            current = self.doc.get_dictionary(*parent_id)?;
        }
    }

    /// Page size in points of page `page_num` (1-indexed).
    pub fn page_dimensions(&self, page_num: u32) -> crate::error::Result<PageRect> {
        let page_id = self.get_page_id(page_num)?;
        let page_dict = self.doc.get_dictionary(page_id)?;

        let media_box = self.get_media_box(page_dict)?;
        let media_box = match media_box {
            lopdf::Object::Reference(id) => self.doc.get_object(id)?.clone(),
            other => other,
        };

        let media_box_array = media_box.as_array()?;
        if media_box_array.len() < 4 {
            return Err(ConvertError::document_open("Invalid MediaBox"));
        }

        let to_f64 = |obj: &lopdf::Object| -> crate::error::Result<f64> {
            match obj {
                lopdf::Object::Integer(i) => Ok(*i as f64),
                lopdf::Object::Real(f) => Ok(*f as f64),
                _ => Err(ConvertError::document_open("Invalid MediaBox value")),
            }
        };

        let x0 = to_f64(&media_box_array[0])?;
        let y0 = to_f64(&media_box_array[1])?;
        let x1 = to_f64(&media_box_array[2])?;
        let y1 = to_f64(&media_box_array[3])?;

        let width = (x1 - x0).abs();
        let height = (y1 - y0).abs();

        if width <= 0.0 || height <= 0.0 {
            return Err(ConvertError::document_open(
                "Invalid MediaBox: non-positive page dimensions",
            ));
        }

        Ok(PageRect { width, height })
    }

    /// Page sizes of every page in document order.
    pub fn page_rects(&self) -> crate::error::Result<Vec<PageRect>> {
        (1..=self.page_count())
            .map(|page_num| self.page_dimensions(page_num))
            .collect()
    }

    fn get_page_id(&self, page_num: u32) -> crate::error::Result<lopdf::ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page_num)
            .copied()
            .ok_or_else(|| ConvertError::document_open(format!("page {} not found", page_num)))
    }
}
