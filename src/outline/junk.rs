use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunkReason {
    TooShort,
    PageNumber,
    Date,
    Boilerplate,
    LowSignal,
    Numeric,
    RomanNumeral,
    SingleLetter,
    Punctuation,
}

/// Checks run in a fixed order and the first match wins, so the same input
/// always yields the same reason.
#[derive(Debug)]
pub struct JunkFilter {
    page_number: Regex,
    dates: Vec<Regex>,
    boilerplate: Regex,
    numeric: Regex,
    roman_numeral: Regex,
    single_letter: Regex,
    punctuation: Regex,
}

const MONTHS: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";
const MONTHS_ABBREVIATED: &str = "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec";

impl JunkFilter {
    pub fn new() -> Result<Self> {
        let date_patterns = [
            r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}".to_string(),
            r"\d{4}[/-]\d{1,2}[/-]\d{1,2}".to_string(),
            format!(r"(?i)\b({MONTHS})\s+\d{{1,2}},?\s+\d{{4}}\b"),
            format!(r"(?i)\b\d{{1,2}}\s+({MONTHS})\s+\d{{4}}\b"),
            format!(r"(?i)\b({MONTHS_ABBREVIATED})\.?\s+\d{{1,2}},?\s+\d{{4}}\b"),
            r"^\d{4}$".to_string(),
        ];

        let mut dates = Vec::with_capacity(date_patterns.len());
        for pattern in &date_patterns {
            dates.push(
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile date regex: {pattern}"))?,
            );
        }

        Ok(Self {
            page_number: Regex::new(r"(?i)^(Page\s*)?\d+(\s*of\s*\d+)?$")
                .context("failed to compile page number regex")?,
            dates,
            boilerplate: Regex::new(r"(?i)(copyright|©|\(c\)|version|ver\.|v\d+)")
                .context("failed to compile boilerplate regex")?,
            numeric: Regex::new(r"^\d+$").context("failed to compile numeric regex")?,
            roman_numeral: Regex::new(r"^[ivxlcdm]+$")
                .context("failed to compile roman numeral regex")?,
            single_letter: Regex::new(r"^[a-z]\.?$")
                .context("failed to compile single letter regex")?,
            punctuation: Regex::new(r"^\W+$").context("failed to compile punctuation regex")?,
        })
    }

    pub fn is_junk(&self, text: &str) -> bool {
        self.classify(text).is_some()
    }

    pub fn classify(&self, text: &str) -> Option<JunkReason> {
        let text = text.trim();
        let char_count = text.chars().count();

        if char_count < 3 {
            return Some(JunkReason::TooShort);
        }
        if self.page_number.is_match(text) {
            return Some(JunkReason::PageNumber);
        }
        if self.dates.iter().any(|pattern| pattern.is_match(text)) {
            return Some(JunkReason::Date);
        }
        if self.boilerplate.is_match(text) {
            return Some(JunkReason::Boilerplate);
        }

        let signal_chars = text
            .chars()
            .filter(|character| is_word_char(*character) || character.is_whitespace())
            .count();
        if (signal_chars as f64) < (char_count as f64) * 0.5 {
            return Some(JunkReason::LowSignal);
        }

        let lowered = text.to_lowercase();
        if self.numeric.is_match(&lowered) {
            return Some(JunkReason::Numeric);
        }
        if self.roman_numeral.is_match(&lowered) {
            return Some(JunkReason::RomanNumeral);
        }
        if self.single_letter.is_match(&lowered) {
            return Some(JunkReason::SingleLetter);
        }
        if self.punctuation.is_match(&lowered) {
            return Some(JunkReason::Punctuation);
        }

        None
    }
}

pub(crate) fn is_word_char(character: char) -> bool {
    character.is_alphanumeric() || character == '_'
}
