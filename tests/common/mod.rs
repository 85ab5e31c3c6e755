// Builds small exam booklets with lopdf for integration tests
#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

pub enum TestImage {
    Rgb,
    Cmyk,
    Jpx,
}

impl TestImage {
    fn stream(&self) -> Stream {
        let (color_space, samples) = match self {
            TestImage::Rgb => ("DeviceRGB", vec![255, 0, 0, 0, 0, 255]),
            TestImage::Cmyk => ("DeviceCMYK", vec![0, 0, 0, 0, 0, 0, 0, 255]),
            TestImage::Jpx => ("DeviceRGB", vec![0; 6]),
        };
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2i64,
            "Height" => 1i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8i64,
        };
        if let TestImage::Jpx = self {
            dict.set("Filter", "JPXDecode");
        }
        Stream::new(dict, samples)
    }
}

pub struct TestPage {
    pub lines: Vec<String>,
    pub images: Vec<TestImage>,
}

impl TestPage {
    pub fn text(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<TestImage>) -> Self {
        self.images = images;
        self
    }
}

/// One Helvetica text line per entry, images listed as page XObjects.
pub fn build_booklet(pages: &[TestPage]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let page_id = add_page(&mut doc, pages_id, font_id, page);
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn add_page(doc: &mut Document, pages_id: ObjectId, font_id: ObjectId, page: &TestPage) -> ObjectId {
    let mut operations = Vec::new();
    for (i, line) in page.lines.iter().enumerate() {
        let y = 800 - 16 * i as i64;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new("Td", vec![50.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("content stream encodes"),
    ));

    let mut xobjects = lopdf::Dictionary::new();
    for (i, image) in page.images.iter().enumerate() {
        let image_id = doc.add_object(image.stream());
        xobjects.set(format!("Im{}", i + 1), image_id);
    }

    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
            "XObject" => xobjects,
        },
    })
}

pub fn save_booklet(pages: &[TestPage], path: &Path) {
    let mut doc = build_booklet(pages);
    doc.save(path).expect("test booklet saves");
}
