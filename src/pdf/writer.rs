// Image XObject pages: one full-page image per page, Pages tree, Catalog

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::error::ConvertError;

/// XObject resource name used on every page.
const PAGE_IMAGE_NAME: &str = "Im0";

/// Stream filter of an embedded page image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    /// Baseline JPEG bytes.
    Dct,
    /// zlib-compressed raw 8-bit RGB samples.
    Flate,
}

/// Pixel data ready to become an image XObject.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub data: Vec<u8>,
    pub filter: ImageFilter,
    pub width: u32,
    pub height: u32,
}

impl PageImage {
    /// Wrap JPEG bytes of an RGB image.
    pub fn jpeg(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            filter: ImageFilter::Dct,
            width,
            height,
        }
    }

    /// Deflate raw RGB samples (`width * height * 3` bytes).
    pub fn flate_rgb(rgb: &[u8], width: u32, height: u32) -> crate::error::Result<Self> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|wh| wh.checked_mul(3))
            .ok_or_else(|| {
                ConvertError::pdf_write(format!(
                    "Overflow computing buffer size for {width}x{height} RGB image"
                ))
            })?;
        if rgb.len() != expected_len {
            return Err(ConvertError::pdf_write(format!(
                "RGB data size mismatch: expected {} bytes, got {}",
                expected_len,
                rgb.len()
            )));
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(rgb)?;
        let data = encoder.finish()?;
        Ok(Self {
            data,
            filter: ImageFilter::Flate,
            width,
            height,
        })
    }

    fn filter_name(&self) -> &'static str {
        match self.filter {
            ImageFilter::Dct => "DCTDecode",
            ImageFilter::Flate => "FlateDecode",
        }
    }
}

/// Builds a PDF whose pages each show a single image stretched over the
/// page box.
pub struct PdfPageWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl Default for PdfPageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfPageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Content stream drawing `name` scaled to `width` x `height` points.
    ///
    /// `q <width> 0 0 <height> 0 0 cm /<name> Do Q`
    pub fn build_image_content_stream(name: &str, width: f64, height: f64) -> Vec<u8> {
        format!(
            "q {} 0 0 {} 0 0 cm /{name} Do Q",
            format_number(width),
            format_number(height)
        )
        .into_bytes()
    }

    fn add_image_xobject(&mut self, image: &PageImage) -> ObjectId {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => image.filter_name(),
        };
        let stream = Stream::new(dict, image.data.clone());
        self.doc.add_object(Object::Stream(stream))
    }

    /// Append a page of `width_pts` x `height_pts` showing `image`.
    pub fn add_image_page(
        &mut self,
        image: &PageImage,
        width_pts: f64,
        height_pts: f64,
    ) -> crate::error::Result<ObjectId> {
        if !(width_pts > 0.0 && height_pts > 0.0) {
            return Err(ConvertError::invalid_dimension(format!(
                "page size {width_pts}x{height_pts} pt is not positive"
            )));
        }
        if image.width == 0 || image.height == 0 {
            return Err(ConvertError::invalid_dimension(format!(
                "page image {}x{} is empty",
                image.width, image.height
            )));
        }

        let image_id = self.add_image_xobject(image);

        let mut xobject_dict = lopdf::Dictionary::new();
        xobject_dict.set(PAGE_IMAGE_NAME, Object::Reference(image_id));
        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobject_dict),
        });

        let content_bytes = Self::build_image_content_stream(PAGE_IMAGE_NAME, width_pts, height_pts);
        let content_id = self
            .doc
            .add_object(Object::Stream(Stream::new(dictionary! {}, content_bytes)));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                pdf_number(width_pts),
                pdf_number(height_pts),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// Close the page tree and hand back the lopdf document.
    pub fn into_document(mut self) -> crate::error::Result<Document> {
        if self.page_ids.is_empty() {
            return Err(ConvertError::pdf_write("document has no pages"));
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        Ok(self.doc)
    }

    /// Serialize the document, optionally running the size optimizer first.
    pub fn save_to_bytes(self, optimize: bool) -> crate::error::Result<Vec<u8>> {
        let mut doc = self.into_document()?;
        if optimize {
            super::optimizer::optimize(&mut doc);
        }
        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| ConvertError::pdf_write(e.to_string()))?;
        Ok(buf)
    }
}

/// Integral sizes stay integers in the page dictionary.
fn pdf_number(value: f64) -> Object {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value as _)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
