use std::sync::OnceLock;

use regex::Regex;

use crate::types::{ReceiptTotal, TotalNotFound};

/// Keyword printed next to the grand total on most receipts.
pub const DEFAULT_KEYWORD: &str = "TOTAL";

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// ASCII digits with at most one decimal point, at least one digit.
re!(re_plain_amount, r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)$");

// ── Public extraction API ─────────────────────────────────────────────────────

/// Reads the grand total out of OCR text.
///
/// The text is split on every occurrence of the keyword and the segments are
/// tried from the last one backwards. Within a segment, a single leading
/// non-digit character is dropped (a currency symbol, usually), thousands
/// separators are removed and only the first line is kept. The first segment
/// left holding a plain number wins.
///
/// Known limitations of the heuristic:
/// - exactly one leading character is dropped, so `US$12.00` is rejected and
///   `#12.00` is accepted;
/// - the keyword also matches inside words such as `SUBTOTAL`;
/// - anything after the number on the same line (`12.00 USD`) rejects the
///   segment;
/// - only ASCII digits count, so totals printed in other digit scripts
///   (`١٢.٥٠`) are not found.
///
/// Text before the first keyword is not a segment; without a keyword the
/// result is always `TotalNotFound`.
///
/// Input is upper-cased before matching, so callers may pass raw OCR output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalExtractor {
    keyword: String,
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self { keyword: DEFAULT_KEYWORD.to_string() }
    }
}

impl TotalExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `keyword` instead of `TOTAL`. A blank keyword falls back to the
    /// default.
    pub fn with_keyword(keyword: &str) -> Self {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Self::default();
        }
        Self { keyword: keyword.to_uppercase() }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn extract(&self, ocr_text: &str) -> Result<ReceiptTotal, TotalNotFound> {
        let text = ocr_text.to_uppercase();
        // Text before the first keyword is never a candidate.
        let segments: Vec<&str> = text.split(self.keyword.as_str()).skip(1).collect();
        let candidate = segments
            .into_iter()
            .rev()
            .find_map(candidate_amount)
            .ok_or(TotalNotFound)?;

        candidate
            .parse::<f64>()
            .ok()
            .and_then(ReceiptTotal::new)
            .ok_or(TotalNotFound)
    }
}

/// Extract with the default `TOTAL` keyword.
pub fn extract_total(ocr_text: &str) -> Result<ReceiptTotal, TotalNotFound> {
    TotalExtractor::default().extract(ocr_text)
}

// ── Segment normalization ─────────────────────────────────────────────────────

fn candidate_amount(segment: &str) -> Option<String> {
    let trimmed = segment.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    let rest = if first.is_ascii_digit() { trimmed } else { chars.as_str() };

    let without_separators = rest.replace(',', "");
    let first_line = without_separators.split('\n').next()?.trim();

    re_plain_amount()
        .is_match(first_line)
        .then(|| first_line.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
