// PDF extraction module
pub mod image_materializer;
pub mod lopdf_helper;
pub mod page_source;
pub mod pixmap;
pub mod text_dump;

pub use image_materializer::{extract_images_from_page, image_file_name};
pub use page_source::{ImageRef, PageSource, PdfDocument};
pub use pixmap::Pixmap;
pub use text_dump::write_page_texts;
