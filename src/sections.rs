// Section classification by question-number range
use crate::config::{SectionRange, UNSORTED};
use crate::types::QuestionBlock;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub questions: Vec<QuestionBlock>,
}

/// Question blocks bucketed by section, in declared section order, with the
/// UNSORTED bucket always last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizedContent {
    sections: Vec<Section>,
    unsorted: Vec<QuestionBlock>,
}

impl OrganizedContent {
    /// Every configured bucket present and empty.
    pub fn empty(ranges: &[SectionRange]) -> Self {
        Self {
            sections: ranges
                .iter()
                .map(|r| Section { name: r.name.clone(), questions: Vec::new() })
                .collect(),
            unsorted: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn unsorted(&self) -> &[QuestionBlock] {
        &self.unsorted
    }

    /// Blocks in the named bucket; `UNSORTED` addresses the catch-all.
    pub fn get(&self, name: &str) -> Option<&[QuestionBlock]> {
        if name == UNSORTED {
            return Some(&self.unsorted);
        }
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.questions.as_slice())
    }

    /// Number of blocks outside UNSORTED.
    pub fn classified_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    pub fn total_count(&self) -> usize {
        self.classified_count() + self.unsorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    /// Buckets as `(name, blocks)` pairs in serialization order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[QuestionBlock])> + '_ {
        self.sections
            .iter()
            .map(|s| (s.name.as_str(), s.questions.as_slice()))
            .chain(std::iter::once((UNSORTED, self.unsorted.as_slice())))
    }
}

impl Serialize for OrganizedContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len() + 1))?;
        for (name, questions) in self.buckets() {
            map.serialize_entry(name, questions)?;
        }
        map.end()
    }
}

/// Bucket blocks by the first range containing their number; anything left
/// over goes to UNSORTED. Document order is kept within each bucket.
pub fn organize_by_sections(blocks: Vec<QuestionBlock>, ranges: &[SectionRange]) -> OrganizedContent {
    let mut content = OrganizedContent::empty(ranges);

    for block in blocks {
        let slot = block
            .question_number
            .and_then(|n| ranges.iter().position(|r| r.contains(n)));
        match slot {
            Some(i) => content.sections[i].questions.push(block),
            None => content.unsorted.push(block),
        }
    }

    content
}
