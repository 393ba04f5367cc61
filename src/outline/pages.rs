//! Maps heading text from the structured stream back onto physical pages.
//!
//! The index is keyed by normalized line text from the per-page text layer.
//! Lookups fall through exact, punctuation-stripped and fuzzy matches before
//! estimating a page from the heading's line ordinal.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::OutlineConfig;
use super::junk::is_word_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageResolution {
    Exact(usize),
    Stripped(usize),
    Fuzzy(usize),
    Estimated(usize),
}

impl PageResolution {
    pub fn page(self) -> usize {
        match self {
            PageResolution::Exact(page)
            | PageResolution::Stripped(page)
            | PageResolution::Fuzzy(page)
            | PageResolution::Estimated(page) => page,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageResolution::Exact(_) => "exact",
            PageResolution::Stripped(_) => "stripped",
            PageResolution::Fuzzy(_) => "fuzzy",
            PageResolution::Estimated(_) => "estimated",
        }
    }
}

/// Insertion-ordered text -> page index. Re-registering a key overwrites its
/// page but keeps its original position, so scans stay deterministic.
#[derive(Debug, Default)]
pub struct PageIndex {
    keys: Vec<String>,
    pages: Vec<usize>,
    positions: HashMap<String, usize>,
    postings: HashMap<String, BTreeSet<usize>>,
    resolve_similarity: f64,
    lines_per_page: usize,
}

impl PageIndex {
    pub fn build(page_texts: &[String], structured_text: &str, config: &OutlineConfig) -> Self {
        let mut index = PageIndex {
            resolve_similarity: config.resolve_similarity,
            lines_per_page: config.lines_per_page.max(1),
            ..PageIndex::default()
        };

        for (page, text) in page_texts.iter().enumerate() {
            for line in text.split('\n').map(str::trim).filter(|line| !line.is_empty()) {
                let lowered = line.to_lowercase();
                let stripped = strip_punctuation(&lowered);
                index.register(lowered, page);
                if !stripped.is_empty() {
                    index.register(stripped, page);
                }
            }
        }

        for line in structured_text.split('\n') {
            if line.trim().is_empty() {
                continue;
            }
            let comparable = strip_markup(line).trim().to_lowercase();
            if comparable.is_empty() {
                continue;
            }

            if let Some((page, similarity)) = index.best_containment_match(&comparable) {
                if similarity > config.index_similarity {
                    index.register(comparable, page);
                }
            }
        }

        index
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn page_of(&self, key: &str) -> Option<usize> {
        self.positions.get(key).map(|&position| self.pages[position])
    }

    pub fn resolve(&self, text: &str, source_line_index: usize) -> PageResolution {
        let cleaned = strip_markup(text).trim().to_lowercase();
        let stripped = strip_punctuation(&cleaned);

        if let Some(page) = self.page_of(&cleaned) {
            return PageResolution::Exact(page);
        }
        if let Some(page) = self.page_of(&stripped) {
            return PageResolution::Stripped(page);
        }
        if let Some((page, similarity)) = self.best_containment_match(&cleaned) {
            if similarity > self.resolve_similarity {
                return PageResolution::Fuzzy(page);
            }
        }

        PageResolution::Estimated(source_line_index / self.lines_per_page)
    }

    fn register(&mut self, key: String, page: usize) {
        if let Some(&position) = self.positions.get(&key) {
            self.pages[position] = page;
            return;
        }

        let position = self.keys.len();
        for word in key.split_whitespace() {
            self.postings
                .entry(word.to_string())
                .or_default()
                .insert(position);
        }
        self.positions.insert(key.clone(), position);
        self.keys.push(key);
        self.pages.push(page);
    }

    /// Best Jaccard word similarity among keys that contain `text` or are
    /// contained in it. Earliest registered key wins ties.
    fn best_containment_match(&self, text: &str) -> Option<(usize, f64)> {
        let words = text.split_whitespace().collect::<HashSet<&str>>();
        if words.is_empty() {
            return None;
        }

        let mut candidates = BTreeSet::<usize>::new();
        for word in &words {
            if let Some(positions) = self.postings.get(*word) {
                candidates.extend(positions.iter().copied());
            }
        }

        let mut best: Option<(usize, f64)> = None;
        for position in candidates {
            let key = &self.keys[position];
            if !(key.contains(text) || text.contains(key.as_str())) {
                continue;
            }

            let similarity = jaccard(&words, key);
            if similarity > best.map(|(_, score)| score).unwrap_or(0.0) {
                best = Some((self.pages[position], similarity));
            }
        }

        best
    }
}

fn jaccard(words: &HashSet<&str>, other: &str) -> f64 {
    let other_words = other.split_whitespace().collect::<HashSet<&str>>();
    if other_words.is_empty() {
        return 0.0;
    }

    let intersection = words.intersection(&other_words).count();
    let union = words.union(&other_words).count();
    intersection as f64 / union as f64
}

fn strip_markup(text: &str) -> String {
    text.chars()
        .filter(|character| !matches!(character, '#' | '*' | '_' | '`'))
        .collect()
}

fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|character| is_word_char(*character) || character.is_whitespace())
        .collect()
}
