//! Crisis keyword gate
//!
//! Pure substring matcher that short-circuits the whole pipeline before any
//! classification or generation happens. A match must never depend on the
//! ML classifier or the generative backend being healthy.

use aho_corasick::AhoCorasick;
use mindhaven_core::Result;

/// Keywords that force the crisis response path
const CRISIS_KEYWORDS: [&str; 6] = [
    "kill myself",
    "suicide",
    "end my life",
    "hang myself",
    "overdose",
    "jump off",
];

/// Fast keyword gate using the Aho-Corasick algorithm
pub struct CrisisDetector {
    patterns: AhoCorasick,
}

impl CrisisDetector {
    /// Create a new crisis detector with the fixed keyword set
    pub fn new() -> Result<Self> {
        let patterns = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(CRISIS_KEYWORDS)
            .map_err(|e| {
                mindhaven_core::Error::internal(format!(
                    "Failed to build crisis keyword matcher: {e}"
                ))
            })?;

        Ok(Self { patterns })
    }

    /// Check whether any crisis keyword occurs in the text
    ///
    /// Matching is case-insensitive and substring-based; the input is
    /// trimmed before matching.
    pub fn detect(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Return the first matched keyword, if any
    pub fn find(&self, text: &str) -> Option<&'static str> {
        self.patterns
            .find(text.trim())
            .map(|m| CRISIS_KEYWORDS[m.pattern().as_usize()])
    }

    /// The full keyword set, in pattern order
    pub fn keywords() -> &'static [&'static str] {
        &CRISIS_KEYWORDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_passes() {
        let detector = CrisisDetector::new().unwrap();
        assert!(!detector.detect("I feel okay today"));
        assert!(!detector.detect(""));
    }

    #[test]
    fn every_keyword_triggers() {
        let detector = CrisisDetector::new().unwrap();
        for keyword in CrisisDetector::keywords() {
            assert!(detector.detect(keyword), "keyword not detected: {keyword}");
        }
    }

    #[test]
    fn matches_are_case_insensitive() {
        let detector = CrisisDetector::new().unwrap();
        assert!(detector.detect("I want to KILL MYSELF"));
        assert!(detector.detect("thinking about Suicide"));
    }

    #[test]
    fn matches_as_substring() {
        let detector = CrisisDetector::new().unwrap();
        assert!(detector.detect("sometimes I think I should just end my life, you know"));
        assert_eq!(
            detector.find("   I might overdose tonight  "),
            Some("overdose")
        );
    }

    #[test]
    fn near_miss_words_do_not_trigger() {
        let detector = CrisisDetector::new().unwrap();
        assert!(!detector.detect("my life has been stressful"));
        assert!(!detector.detect("I watched a documentary yesterday"));
    }
}
