// Saves embedded page images as PNG files
use super::page_source::{ImageRef, PageSource};
use crate::types::Result;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// `page_<p>_image_<i>.png`, both 1-based.
pub fn image_file_name(page_index: usize, image_index: usize) -> String {
    format!("page_{}_image_{}.png", page_index + 1, image_index + 1)
}

/// Save every image of a page into `images_dir`.
///
/// An image that can't be decoded or written is logged and skipped; the
/// rest of the page still gets extracted. Returns the written paths in
/// image order.
pub fn extract_images_from_page<S: PageSource + ?Sized>(
    source: &S,
    images: &[ImageRef],
    page_index: usize,
    images_dir: &Path,
) -> Vec<PathBuf> {
    let mut written = Vec::with_capacity(images.len());

    for (image_index, image) in images.iter().enumerate() {
        let path = images_dir.join(image_file_name(page_index, image_index));
        match save_image(source, *image, &path) {
            Ok(()) => {
                debug!(page = page_index + 1, image = image_index + 1, path = %path.display(), "saved image");
                written.push(path);
            }
            Err(e) => {
                warn!(
                    page = page_index + 1,
                    image = image_index + 1,
                    xref = image.xref,
                    error = %e,
                    "Could not extract image"
                );
            }
        }
    }

    written
}

fn save_image<S: PageSource + ?Sized>(source: &S, image: ImageRef, path: &Path) -> Result<()> {
    let mut pixmap = source.pixmap(image)?;
    if pixmap.needs_rgb_conversion() {
        pixmap = pixmap.to_rgb()?;
    }
    pixmap.into_image()?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
