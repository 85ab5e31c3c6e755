// Page content reader: text and embedded images per page
use super::lopdf_helper::{get_int, get_name, load_pdf, page_image_ids, resolve, stream_filters};
use super::pixmap::Pixmap;
use crate::types::{ExtractError, Result};
use lopdf::{Document, Object, ObjectId, Stream};
use std::path::Path;

/// Handle to one embedded image of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub xref: u32,
    pub generation: u16,
}

impl From<ObjectId> for ImageRef {
    fn from((xref, generation): ObjectId) -> Self {
        Self { xref, generation }
    }
}

impl From<ImageRef> for ObjectId {
    fn from(image: ImageRef) -> ObjectId {
        (image.xref, image.generation)
    }
}

/// What the extraction pipeline needs from a document.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Raw text of a 0-based page.
    fn page_text(&self, page_index: usize) -> Result<String>;

    /// Embedded images of a 0-based page, in resource order.
    fn page_images(&self, page_index: usize) -> Result<Vec<ImageRef>>;

    /// Decoded pixels of one image.
    fn pixmap(&self, image: ImageRef) -> Result<Pixmap>;
}

/// A PDF loaded with lopdf.
pub struct PdfDocument {
    document: Document,
    // (1-based page number, page object) in page order
    pages: Vec<(u32, ObjectId)>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_document(load_pdf(path)?))
    }

    pub fn from_document(document: Document) -> Self {
        let pages = document.get_pages().into_iter().collect();
        Self { document, pages }
    }

    fn page(&self, page_index: usize) -> Result<(u32, ObjectId)> {
        self.pages
            .get(page_index)
            .copied()
            .ok_or(ExtractError::MissingPage(page_index + 1))
    }

    /// Decode an image and attach its soft mask, if any.
    fn decode_stream(&self, stream: &Stream) -> Result<Pixmap> {
        let mut pixmap = self.decode_samples(stream)?;

        if let Ok(smask) = stream.dict.get(b"SMask") {
            if let Ok(Object::Stream(mask_stream)) = resolve(&self.document, smask) {
                // A mask's own SMask is ignored, so cyclic masks terminate.
                let mask = self.decode_samples(mask_stream)?;
                pixmap = pixmap.with_alpha(&mask)?;
            }
        }

        Ok(pixmap)
    }

    fn decode_samples(&self, stream: &Stream) -> Result<Pixmap> {
        let filters = stream_filters(&self.document, stream);

        if let Some(filter) = filters
            .iter()
            .find(|f| matches!(f.as_slice(), b"JPXDecode" | b"JBIG2Decode" | b"CCITTFaxDecode"))
        {
            return Err(ExtractError::UnsupportedImage(format!(
                "{} filter",
                String::from_utf8_lossy(filter)
            )));
        }

        if filters.iter().any(|f| f == b"DCTDecode") {
            if filters.len() > 1 {
                return Err(ExtractError::UnsupportedImage("chained DCTDecode filter".into()));
            }
            let jpeg = image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)?;
            return Ok(Pixmap::from_dynamic(jpeg));
        }
        self.decode_raw(stream)
    }

    fn decode_raw(&self, stream: &Stream) -> Result<Pixmap> {
        let dict = &stream.dict;
        let width = get_int(&self.document, dict, b"Width")
            .ok_or_else(|| ExtractError::UnsupportedImage("missing Width".into()))?;
        let height = get_int(&self.document, dict, b"Height")
            .ok_or_else(|| ExtractError::UnsupportedImage("missing Height".into()))?;
        let bits = get_int(&self.document, dict, b"BitsPerComponent").unwrap_or(8);
        if bits != 8 {
            return Err(ExtractError::UnsupportedImage(format!("{} bits per component", bits)));
        }
        let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(ExtractError::UnsupportedImage(format!("bad size {}x{}", width, height))),
        };

        let channels = self.color_channels(stream)?;
        let samples = if stream.dict.has(b"Filter") {
            stream.decompressed_content()?
        } else {
            stream.content.clone()
        };

        Pixmap::new(width, height, channels, false, samples)
    }

    fn color_channels(&self, stream: &Stream) -> Result<u8> {
        let color_space = stream
            .dict
            .get(b"ColorSpace")
            .map_err(|_| ExtractError::UnsupportedImage("missing ColorSpace".into()))?;

        match resolve(&self.document, color_space)? {
            Object::Name(name) => channels_for_family(name),
            Object::Array(items) => {
                let family = items
                    .first()
                    .and_then(|f| resolve(&self.document, f).ok()?.as_name().ok())
                    .ok_or_else(|| ExtractError::UnsupportedImage("empty ColorSpace array".into()))?;
                if family == b"ICCBased" {
                    let profile = items
                        .get(1)
                        .and_then(|p| resolve(&self.document, p).ok())
                        .and_then(|p| p.as_stream().ok())
                        .ok_or_else(|| ExtractError::UnsupportedImage("ICCBased without profile".into()))?;
                    match get_int(&self.document, &profile.dict, b"N") {
                        Some(1) => Ok(1),
                        Some(3) => Ok(3),
                        Some(4) => Ok(4),
                        other => Err(ExtractError::UnsupportedImage(format!("ICCBased with N={:?}", other))),
                    }
                } else {
                    channels_for_family(family)
                }
            }
            _ => Err(ExtractError::UnsupportedImage("unreadable ColorSpace".into())),
        }
    }
}

fn channels_for_family(family: &[u8]) -> Result<u8> {
    match family {
        b"DeviceGray" | b"CalGray" | b"G" => Ok(1),
        b"DeviceRGB" | b"CalRGB" | b"RGB" => Ok(3),
        b"DeviceCMYK" | b"CMYK" => Ok(4),
        other => Err(ExtractError::UnsupportedImage(format!(
            "{} color space",
            String::from_utf8_lossy(other)
        ))),
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, page_index: usize) -> Result<String> {
        let (page_number, _) = self.page(page_index)?;
        Ok(self.document.extract_text(&[page_number])?)
    }

    fn page_images(&self, page_index: usize) -> Result<Vec<ImageRef>> {
        let (_, page_id) = self.page(page_index)?;
        Ok(page_image_ids(&self.document, page_id)?
            .into_iter()
            .map(ImageRef::from)
            .collect())
    }

    fn pixmap(&self, image: ImageRef) -> Result<Pixmap> {
        match self.document.get_object(image.into())? {
            Object::Stream(stream) => {
                let is_image = get_name(&self.document, &stream.dict, b"Subtype").map_or(false, |n| n == b"Image");
                if !is_image {
                    return Err(ExtractError::UnsupportedImage(format!("object {} is not an image", image.xref)));
                }
                if matches!(stream.dict.get(b"ImageMask"), Ok(Object::Boolean(true))) {
                    return Err(ExtractError::UnsupportedImage("stencil mask".into()));
                }
                self.decode_stream(stream)
            }
            _ => Err(ExtractError::UnsupportedImage(format!("object {} is not a stream", image.xref))),
        }
    }
}
