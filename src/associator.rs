// Proportional image-to-question association for one page
use crate::segmenter::extract_options;
use crate::types::QuestionBlock;
use std::ops::Range;
use std::path::PathBuf;

/// Image index range owned by question `index` out of `questions`.
///
/// Bounds are `round(i * per)` with `per = images / questions`, rounding
/// half to even, clamped to `[0, images]`. Consecutive ranges share their
/// boundary, so the ranges tile the image list exactly once.
pub fn image_slice(index: usize, questions: usize, images: usize) -> Range<usize> {
    if questions == 0 || images == 0 {
        return 0..0;
    }
    let per_question = images as f64 / questions as f64;
    let bound = |i: usize| ((i as f64 * per_question).round_ties_even() as usize).min(images);
    bound(index)..bound(index + 1)
}

/// Give each block its share of the page's images, then pull out its options.
pub fn associate_images_with_questions(
    questions: Vec<QuestionBlock>,
    page_images: &[PathBuf],
) -> Vec<QuestionBlock> {
    let count = questions.len();

    questions
        .into_iter()
        .enumerate()
        .map(|(i, mut question)| {
            question.images = page_images[image_slice(i, count, page_images.len())].to_vec();
            question.options = extract_options(&question.question_text);
            question
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionOption;
    use rstest::rstest;

    fn blocks(n: usize) -> Vec<QuestionBlock> {
        (1..=n).map(|i| QuestionBlock::new(Some(i as u32), format!("question {}", i))).collect()
    }

    fn images(n: usize) -> Vec<PathBuf> {
        (1..=n).map(|i| PathBuf::from(format!("page_1_image_{}.png", i))).collect()
    }

    #[test]
    fn no_images_leaves_every_question_empty() {
        let out = associate_images_with_questions(blocks(3), &[]);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|q| q.images.is_empty()));
    }

    #[test]
    fn no_questions_yields_nothing() {
        assert!(associate_images_with_questions(Vec::new(), &images(4)).is_empty());
    }

    #[test]
    fn one_image_per_question() {
        let out = associate_images_with_questions(blocks(3), &images(3));
        for (i, q) in out.iter().enumerate() {
            assert_eq!(q.images, vec![images(3)[i].clone()]);
        }
    }

    #[test]
    fn fewer_images_than_questions_rounds_half_to_even() {
        // per = 0.5: bounds 0, 0.5->0, 1, 1.5->2, 2
        let sizes: Vec<_> = (0..4).map(|i| image_slice(i, 4, 2).len()).collect();
        assert_eq!(sizes, vec![0, 1, 1, 0]);
    }

    #[test]
    fn options_are_extracted_during_association() {
        let question = QuestionBlock::new(Some(1), "What is 2+2? [A] 3 [B] 4");
        let out = associate_images_with_questions(vec![question], &[]);
        assert_eq!(
            out[0].options,
            vec![QuestionOption::new('A', "3"), QuestionOption::new('B', "4")]
        );
    }

    #[rstest]
    #[case(1, 1)]
    #[case(1, 5)]
    #[case(3, 7)]
    #[case(4, 2)]
    #[case(6, 13)]
    #[case(7, 3)]
    #[case(10, 10)]
    fn slices_partition_the_image_list(#[case] questions: usize, #[case] image_count: usize) {
        let page_images = images(image_count);
        let out = associate_images_with_questions(blocks(questions), &page_images);
        let rejoined: Vec<PathBuf> = out.into_iter().flat_map(|q| q.images).collect();
        assert_eq!(rejoined, page_images);
    }
}
