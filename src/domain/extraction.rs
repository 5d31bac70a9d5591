//! Pattern extraction over inbound message text.
//!
//! The [`Extractor`] is stateless and deterministic: the same text always
//! yields the same ordered findings. Each category carries its own pattern
//! list, so deployments can tighten or extend detection without touching
//! the engine.
//!
//! Categories claim character spans in precedence order (links, payment
//! handles, digit runs). A candidate whose span overlaps an already
//! claimed span is dropped, so no two findings ever cover the same text,
//! with one exception: keyword hits may co-occur with any other category.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::intelligence::{Finding, FindingKind};

/// Vocabulary of urgency/fraud framing, matched whole-word.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "urgent",
    "blocked",
    "verify",
    "kyc",
    "upi",
    "pay",
    "bank",
    "account",
    "suspended",
    "expire",
    "refund",
    "prize",
    "lottery",
    "password",
    "otp",
    "click",
    "link",
    "credit card",
    "debit card",
    "pin",
    "cvv",
    "police",
    "cbi",
    "arrest",
    "customs",
    "fedex",
];

static DEFAULT_LINK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r#"https?://[^\s<>"']+"#).expect("link pattern is valid"),
        Regex::new(r#"\bwww\.[A-Za-z0-9][^\s<>"']*"#).expect("link pattern is valid"),
    ]
});

static DEFAULT_HANDLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(r"\b[A-Za-z0-9][A-Za-z0-9._-]{1,48}@[A-Za-z]{2,49}\b")
        .expect("handle pattern is valid")]
});

/// Scanner for separator-tolerant digit runs. A run is split into its
/// contiguous digit groups before classification: phone shapes may span
/// separator-joined groups ("98765 43210", "+91-98765 43210"), account
/// shapes must match a single group, so two independent numbers sharing
/// a run never merge into one finding.
static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d(?:[\s-]?\d)+").expect("digit run pattern is valid"));

static DEFAULT_PHONE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(r"^(?:91)?[6-9]\d{9}$").expect("phone shape is valid")]
});

static DEFAULT_ACCOUNT_SHAPES: Lazy<Vec<Regex>> =
    Lazy::new(|| vec![Regex::new(r"^\d{9,18}$").expect("account shape is valid")]);

/// Error building a custom pattern set.
#[derive(Debug, Error)]
pub enum PatternError {
    /// A supplied keyword produced an invalid whole-word pattern.
    #[error("invalid keyword pattern for '{keyword}': {source}")]
    InvalidKeyword {
        /// The offending vocabulary entry.
        keyword: String,
        /// Underlying regex error.
        source: regex::Error,
    },
}

/// Stateless pattern-matching engine.
///
/// `extract` is a pure function of the input text; running it twice on
/// the same message yields identical findings.
#[derive(Debug, Clone)]
pub struct Extractor {
    link_patterns: Vec<Regex>,
    handle_patterns: Vec<Regex>,
    phone_shapes: Vec<Regex>,
    account_shapes: Vec<Regex>,
    keywords: Vec<(String, Regex)>,
}

impl Default for Extractor {
    fn default() -> Self {
        let keywords = DEFAULT_KEYWORDS
            .iter()
            .map(|k| (k.to_string(), compile_keyword(k).expect("default keyword compiles")))
            .collect();

        Self {
            link_patterns: DEFAULT_LINK_PATTERNS.clone(),
            handle_patterns: DEFAULT_HANDLE_PATTERNS.clone(),
            phone_shapes: DEFAULT_PHONE_SHAPES.clone(),
            account_shapes: DEFAULT_ACCOUNT_SHAPES.clone(),
            keywords,
        }
    }
}

impl Extractor {
    /// Creates an extractor with the default pattern sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the phishing-link patterns.
    pub fn with_link_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.link_patterns = patterns;
        self
    }

    /// Replaces the payment-handle patterns.
    pub fn with_handle_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.handle_patterns = patterns;
        self
    }

    /// Replaces the phone-number shape patterns (applied to normalized
    /// digit runs).
    pub fn with_phone_shapes(mut self, patterns: Vec<Regex>) -> Self {
        self.phone_shapes = patterns;
        self
    }

    /// Replaces the bank-account shape patterns (applied to normalized
    /// digit runs).
    pub fn with_account_shapes(mut self, patterns: Vec<Regex>) -> Self {
        self.account_shapes = patterns;
        self
    }

    /// Replaces the suspicious-keyword vocabulary.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyword` if a vocabulary entry cannot be compiled into a
    ///   whole-word pattern
    pub fn with_keywords<I, S>(mut self, vocabulary: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords = Vec::new();
        for entry in vocabulary {
            let keyword = entry.as_ref().to_lowercase();
            let pattern = compile_keyword(&keyword).map_err(|source| {
                PatternError::InvalidKeyword {
                    keyword: keyword.clone(),
                    source,
                }
            })?;
            keywords.push((keyword, pattern));
        }
        self.keywords = keywords;
        Ok(self)
    }

    /// Scans one message's text and yields findings ordered by position.
    pub fn extract(&self, text: &str) -> Vec<Finding> {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut findings: Vec<(usize, Finding)> = Vec::new();

        // Links first: a handle or digit run inside a URL belongs to the URL.
        for pattern in &self.link_patterns {
            for m in pattern.find_iter(text) {
                if overlaps_any(&claimed, m.start(), m.end()) {
                    continue;
                }
                claimed.push((m.start(), m.end()));
                findings.push((
                    m.start(),
                    Finding::new(FindingKind::PhishingLink, normalize_link(m.as_str())),
                ));
            }
        }

        // Payment handles claim before digit runs so `9876543210@ybl` is a
        // handle, not a phone number.
        for pattern in &self.handle_patterns {
            for m in pattern.find_iter(text) {
                if overlaps_any(&claimed, m.start(), m.end()) {
                    continue;
                }
                claimed.push((m.start(), m.end()));
                findings.push((
                    m.start(),
                    Finding::new(FindingKind::UpiId, m.as_str().to_lowercase()),
                ));
            }
        }

        // Digit runs: classified group-wise so adjacent independent
        // numbers inside one run stay separate. Phone shapes are tried
        // first (more specific) and may join consecutive groups; account
        // shapes apply to a single contiguous group only.
        for m in DIGIT_RUN.find_iter(text) {
            let groups = digit_groups(m.as_str(), m.start());
            let mut i = 0;
            while i < groups.len() {
                if let Some(j) = self.phone_span_from(&groups, i) {
                    let start = groups[i].start;
                    let end = groups[j].end;
                    if !overlaps_any(&claimed, start, end) {
                        let digits: String =
                            groups[i..=j].iter().map(|g| g.digits.as_str()).collect();
                        claimed.push((start, end));
                        findings.push((
                            start,
                            Finding::new(FindingKind::PhoneNumber, normalize_phone(&digits)),
                        ));
                    }
                    i = j + 1;
                    continue;
                }

                let group = &groups[i];
                if self.account_shapes.iter().any(|p| p.is_match(&group.digits))
                    && !overlaps_any(&claimed, group.start, group.end)
                {
                    claimed.push((group.start, group.end));
                    findings.push((
                        group.start,
                        Finding::new(FindingKind::BankAccount, group.digits.clone()),
                    ));
                }
                i += 1;
            }
        }

        // Keywords co-occur with anything; each vocabulary entry fires at
        // most once per message.
        for (keyword, pattern) in &self.keywords {
            if let Some(m) = pattern.find(text) {
                findings.push((
                    m.start(),
                    Finding::new(FindingKind::SuspiciousKeyword, keyword.clone()),
                ));
            }
        }

        findings.sort_by_key(|(pos, _)| *pos);
        findings.into_iter().map(|(_, finding)| finding).collect()
    }

    /// Index of the last group in the smallest span starting at `from`
    /// whose joined digits fit a phone shape, if any.
    fn phone_span_from(&self, groups: &[DigitGroup], from: usize) -> Option<usize> {
        let mut digits = String::new();
        for (j, group) in groups.iter().enumerate().skip(from) {
            digits.push_str(&group.digits);
            if self.phone_shapes.iter().any(|p| p.is_match(&digits)) {
                return Some(j);
            }
        }
        None
    }
}

/// One contiguous group of digits inside a scanner match, with its span
/// in the original text.
struct DigitGroup {
    digits: String,
    start: usize,
    end: usize,
}

fn digit_groups(run: &str, offset: usize) -> Vec<DigitGroup> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    for (i, c) in run.char_indices() {
        if c.is_ascii_digit() {
            if current.is_empty() {
                start = i;
            }
            current.push(c);
        } else if !current.is_empty() {
            groups.push(DigitGroup {
                digits: std::mem::take(&mut current),
                start: offset + start,
                end: offset + i,
            });
        }
    }
    if !current.is_empty() {
        groups.push(DigitGroup {
            digits: current,
            start: offset + start,
            end: offset + run.len(),
        });
    }
    groups
}

/// Whole-word, case-insensitive pattern for one vocabulary entry.
/// Multi-word phrases tolerate arbitrary whitespace between words.
fn compile_keyword(keyword: &str) -> Result<Regex, regex::Error> {
    let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
    Regex::new(&format!(r"(?i)\b{}\b", words.join(r"\s+")))
}

fn overlaps_any(claimed: &[(usize, usize)], start: usize, end: usize) -> bool {
    claimed.iter().any(|&(s, e)| start < e && s < end)
}

/// Strips trailing punctuation a counterpart is likely to attach to a
/// URL. Closing brackets are removed only while unbalanced, so a URL
/// with a parenthesised path segment survives intact.
fn normalize_link(raw: &str) -> String {
    let mut url = raw;
    loop {
        let trimmed = match url.chars().last() {
            Some('.' | ',' | ';' | ':' | '!' | '?' | '"' | '\'') => &url[..url.len() - 1],
            Some(')') if url.matches(')').count() > url.matches('(').count() => {
                &url[..url.len() - 1]
            }
            Some(']') if url.matches(']').count() > url.matches('[').count() => {
                &url[..url.len() - 1]
            }
            _ => break,
        };
        url = trimmed;
    }
    url.to_string()
}

/// Reduces a digit run to the bare 10-digit subscriber number.
fn normalize_phone(digits: &str) -> String {
    if digits.len() == 12 && digits.starts_with("91") {
        digits[2..].to_string()
    } else {
        digits.to_string()
    }
}
