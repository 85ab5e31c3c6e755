// End-to-end extraction over lopdf-built booklets
mod common;

use anyhow::Result;
use common::{build_booklet, save_booklet, TestImage, TestPage};
use exam_extractor::pdf_extraction::{PageSource, PdfDocument};
use exam_extractor::{ContentExtractor, ContentValidator, ExamConfig, Extraction, QuestionOption, Status};
use std::fs;
use std::path::Path;

fn extractor_in(dir: &Path) -> ContentExtractor {
    let mut config = ExamConfig::default();
    config.output_dir = dir.to_path_buf();
    let extractor = ContentExtractor::new(config);
    extractor.setup_directories().unwrap();
    extractor
}

#[test]
fn two_page_booklet_yields_one_question() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let pdf = dir.path().join("booklet.pdf");
    save_booklet(
        &[TestPage::text(&["1. What is 2+2? [A] 3 [B] 4"]), TestPage::text(&[])],
        &pdf,
    );
    let extractor = extractor_in(&dir.path().join("out"));

    let extraction = extractor.extract_all_content(&pdf)?;

    assert!(matches!(extraction, Extraction::Content(_)));
    let content = extraction.into_content();
    assert_eq!(content.total_count(), 1);
    let block = &content.get("LOGICAL_REASONING").unwrap()[0];
    assert_eq!(block.question_number, Some(1));
    assert_eq!(block.options, vec![QuestionOption::new('A', "3"), QuestionOption::new('B', "4")]);
    assert!(block.images.is_empty());
    Ok(())
}

#[test]
fn page_images_are_saved_and_shared_out() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("out");
    let pdf = dir.path().join("booklet.pdf");
    save_booklet(
        &[
            TestPage::text(&["1. Which shape comes next?", "2. Which figure is odd?"])
                .with_images(vec![TestImage::Rgb, TestImage::Cmyk, TestImage::Jpx]),
            TestPage::text(&["16. What is 7 x 6? [A] 42 [B] 36"]),
        ],
        &pdf,
    );
    let extractor = extractor_in(&out);

    let content = extractor.extract_all_content(&pdf)?.into_content();

    let images_dir = out.join("extracted_images");
    assert!(images_dir.join("page_1_image_1.png").exists());
    assert!(images_dir.join("page_1_image_2.png").exists());
    assert!(!images_dir.join("page_1_image_3.png").exists());

    let cmyk = image::open(images_dir.join("page_1_image_2.png"))?.to_rgb8();
    assert_eq!(cmyk.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(cmyk.get_pixel(1, 0).0, [0, 0, 0]);

    let logical = content.get("LOGICAL_REASONING").unwrap();
    assert_eq!(logical.len(), 2);
    assert_eq!(logical[0].images, vec![images_dir.join("page_1_image_1.png")]);
    assert_eq!(logical[1].images, vec![images_dir.join("page_1_image_2.png")]);

    let maths = content.get("MATHEMATICS").unwrap();
    assert_eq!(maths[0].question_number, Some(16));
    assert_eq!(maths[0].options.len(), 2);
    assert!(maths[0].images.is_empty());
    Ok(())
}

#[test]
fn pdf_document_reads_pages_in_order() -> Result<()> {
    let doc = PdfDocument::from_document(build_booklet(&[
        TestPage::text(&["1. first"]).with_images(vec![TestImage::Rgb]),
        TestPage::text(&["2. second"]),
    ]));

    assert_eq!(doc.page_count(), 2);
    assert!(doc.page_text(0)?.contains("1. first"));
    assert!(doc.page_text(1)?.contains("2. second"));
    assert_eq!(doc.page_images(0)?.len(), 1);
    assert!(doc.page_images(1)?.is_empty());
    Ok(())
}

#[test]
fn corrupt_pdf_gives_empty_buckets() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let pdf = dir.path().join("corrupt.pdf");
    fs::write(&pdf, b"%PDF-1.5\nthis is not really a pdf")?;
    let extractor = extractor_in(&dir.path().join("out"));

    let extraction = extractor.extract_all_content(&pdf)?;

    assert!(matches!(extraction, Extraction::Empty { .. }));
    let json = serde_json::to_value(extraction.content())?;
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 4);
    assert!(json.as_object().unwrap().values().all(|v| v.as_array().unwrap().is_empty()));
    Ok(())
}

#[test]
fn sparse_booklet_fails_validation() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("out");
    let pdf = dir.path().join("booklet.pdf");
    save_booklet(&[TestPage::text(&["1. Only question [A] yes [B] no"])], &pdf);
    let extractor = extractor_in(&out);

    let content = extractor.extract_all_content(&pdf)?.into_content();
    let report = ContentValidator::from_config(extractor.config())
        .validate_extraction(&content, &extractor.config().images_dir())?;

    assert_eq!(report.status, Status::Fail);
    assert_eq!(report.scores.text_extraction_score, 2.86);
    assert_eq!(report.scores.image_extraction_score, 0.0);
    assert_eq!(report.scores.structure_accuracy_score, 50.0);
    assert!(report
        .recommendations
        .contains(&"Text Extraction: Expected ~35 questions, found 1.".to_string()));
    Ok(())
}
