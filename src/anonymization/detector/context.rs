//! Context-based confidence boosting
//!
//! A candidate's score is raised when one of its context keywords appears in a
//! window of words around the match. Matching is case-insensitive and
//! whole-word: a keyword is split into words and must appear as a contiguous
//! word sequence inside the window. Punctuation is ignored, so `"Actor Name:"`
//! matches the words `actor name`.

use crate::anonymization::config::ContextConfig;
use crate::anonymization::models::Detection;

/// A context keyword split into lowercase words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextKeyword {
    phrase: String,
    words: Vec<String>,
}

impl ContextKeyword {
    /// Parse a keyword or phrase; `None` when it holds no word characters
    pub fn parse(phrase: &str) -> Option<Self> {
        let words: Vec<String> = split_words(phrase).map(|(_, _, word)| word).collect();
        if words.is_empty() {
            return None;
        }
        Some(Self {
            phrase: phrase.trim().to_string(),
            words,
        })
    }

    /// Parse a list of keywords, skipping entries without word characters
    pub fn parse_all<S: AsRef<str>>(phrases: &[S]) -> Vec<Self> {
        phrases
            .iter()
            .filter_map(|p| Self::parse(p.as_ref()))
            .collect()
    }

    /// The keyword as configured
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    fn found_in(&self, window: &[Word]) -> bool {
        window
            .windows(self.words.len())
            .any(|candidate| candidate.iter().zip(&self.words).all(|(w, k)| w.lower == *k))
    }
}

#[derive(Debug, Clone)]
struct Word {
    start: usize,
    end: usize,
    lower: String,
}

/// Words of a text with their byte spans, computed once per analysis
#[derive(Debug, Clone)]
pub struct TextWords {
    words: Vec<Word>,
}

impl TextWords {
    /// Split a text into words
    pub fn new(text: &str) -> Self {
        Self {
            words: split_words(text)
                .map(|(start, end, lower)| Word { start, end, lower })
                .collect(),
        }
    }

    /// Up to `count` words ending at or before `offset`
    fn before(&self, offset: usize, count: usize) -> &[Word] {
        let idx = self.words.partition_point(|w| w.end <= offset);
        &self.words[idx.saturating_sub(count)..idx]
    }

    /// Up to `count` words starting at or after `offset`
    fn after(&self, offset: usize, count: usize) -> &[Word] {
        let idx = self.words.partition_point(|w| w.start < offset);
        let end = (idx + count).min(self.words.len());
        &self.words[idx..end]
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Iterate `(start, end, lowercase word)` over a text
fn split_words(text: &str) -> impl Iterator<Item = (usize, usize, String)> + '_ {
    let mut chars = text.char_indices().peekable();
    std::iter::from_fn(move || {
        while let Some(&(_, c)) = chars.peek() {
            if is_word_char(c) {
                break;
            }
            chars.next();
        }
        let (start, _) = *chars.peek()?;
        let mut end = start;
        while let Some(&(idx, c)) = chars.peek() {
            if !is_word_char(c) {
                break;
            }
            end = idx + c.len_utf8();
            chars.next();
        }
        Some((start, end, text[start..end].to_lowercase()))
    })
}

/// Raises candidate scores when supporting vocabulary appears nearby
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEnhancer {
    prefix_words: usize,
    suffix_words: usize,
    similarity_factor: f64,
    min_score_with_context: f64,
}

impl ContextEnhancer {
    /// Create a new enhancer
    pub fn new(
        prefix_words: usize,
        suffix_words: usize,
        similarity_factor: f64,
        min_score_with_context: f64,
    ) -> Self {
        Self {
            prefix_words,
            suffix_words,
            similarity_factor: similarity_factor.clamp(0.0, 1.0),
            min_score_with_context: min_score_with_context.clamp(0.0, 1.0),
        }
    }

    /// Find the first keyword present in the window around a detection
    pub fn find_keyword<'k, I>(
        &self,
        words: &TextWords,
        detection: &Detection,
        keywords: I,
    ) -> Option<&'k ContextKeyword>
    where
        I: IntoIterator<Item = &'k ContextKeyword>,
    {
        let before = words.before(detection.start, self.prefix_words);
        let after = words.after(detection.end, self.suffix_words);

        keywords
            .into_iter()
            .find(|keyword| keyword.found_in(before) || keyword.found_in(after))
    }

    /// Boost a detection if a keyword is found; returns whether it was boosted
    pub fn enhance<'k, I>(&self, words: &TextWords, detection: &mut Detection, keywords: I) -> bool
    where
        I: IntoIterator<Item = &'k ContextKeyword>,
    {
        let Some(keyword) = self.find_keyword(words, detection, keywords) else {
            return false;
        };

        let boosted = (detection.score + self.similarity_factor)
            .min(1.0)
            .max(self.min_score_with_context);
        detection.set_score(boosted);
        detection.context_keyword = Some(keyword.phrase().to_string());
        true
    }
}

impl Default for ContextEnhancer {
    fn default() -> Self {
        Self::from(&ContextConfig::default())
    }
}

impl From<&ContextConfig> for ContextEnhancer {
    fn from(config: &ContextConfig) -> Self {
        Self::new(
            config.prefix_words,
            config.suffix_words,
            config.similarity_factor,
            config.min_score_with_context,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection_for(text: &str, needle: &str, score: f64) -> Detection {
        let start = text.find(needle).unwrap();
        Detection::new("ACCOUNT_NUMBER", start, start + needle.len(), score)
    }

    #[test]
    fn test_keyword_before_match_boosts() {
        let text = "account: 123456";
        let words = TextWords::new(text);
        let keywords = ContextKeyword::parse_all(&["account"]);
        let mut detection = detection_for(text, "123456", 0.4);

        let boosted = ContextEnhancer::default().enhance(&words, &mut detection, &keywords);

        assert!(boosted);
        assert!(detection.score > 0.4);
        assert_eq!(detection.context_keyword.as_deref(), Some("account"));
    }

    #[test]
    fn test_no_keyword_keeps_base_score() {
        let text = "random: 123456";
        let words = TextWords::new(text);
        let keywords = ContextKeyword::parse_all(&["account"]);
        let mut detection = detection_for(text, "123456", 0.4);

        let boosted = ContextEnhancer::default().enhance(&words, &mut detection, &keywords);

        assert!(!boosted);
        assert_eq!(detection.score, 0.4);
        assert!(detection.context_keyword.is_none());
    }

    #[test]
    fn test_matching_is_case_insensitive_and_whole_word() {
        let enhancer = ContextEnhancer::default();
        let keywords = ContextKeyword::parse_all(&["account"]);

        let text = "ACCOUNT 123456";
        let detection = detection_for(text, "123456", 0.4);
        assert!(enhancer
            .find_keyword(&TextWords::new(text), &detection, &keywords)
            .is_some());

        // Substring of a longer word does not count
        let text = "accountant 123456";
        let detection = detection_for(text, "123456", 0.4);
        assert!(enhancer
            .find_keyword(&TextWords::new(text), &detection, &keywords)
            .is_none());
    }

    #[test]
    fn test_phrase_keyword_with_punctuation() {
        let text = "Actor Name: Jane";
        let keywords = ContextKeyword::parse_all(&["Actor Name:"]);
        let detection = detection_for(text, "Jane", 0.5);

        let found =
            ContextEnhancer::default().find_keyword(&TextWords::new(text), &detection, &keywords);
        assert_eq!(found.map(ContextKeyword::phrase), Some("Actor Name:"));
    }

    #[test]
    fn test_keyword_outside_prefix_window_is_ignored() {
        let text = "account one two three four five six 123456";
        let keywords = ContextKeyword::parse_all(&["account"]);
        let detection = detection_for(text, "123456", 0.4);

        let enhancer = ContextEnhancer::new(5, 0, 0.35, 0.4);
        assert!(enhancer
            .find_keyword(&TextWords::new(text), &detection, &keywords)
            .is_none());

        let wider = ContextEnhancer::new(7, 0, 0.35, 0.4);
        assert!(wider
            .find_keyword(&TextWords::new(text), &detection, &keywords)
            .is_some());
    }

    #[test]
    fn test_suffix_window() {
        let text = "123456 is my account";
        let keywords = ContextKeyword::parse_all(&["account"]);
        let detection = detection_for(text, "123456", 0.4);

        let prefix_only = ContextEnhancer::new(5, 0, 0.35, 0.4);
        assert!(prefix_only
            .find_keyword(&TextWords::new(text), &detection, &keywords)
            .is_none());

        let with_suffix = ContextEnhancer::new(5, 3, 0.35, 0.4);
        assert!(with_suffix
            .find_keyword(&TextWords::new(text), &detection, &keywords)
            .is_some());
    }

    #[test]
    fn test_boost_is_capped_and_floored() {
        let text = "account 123456";
        let words = TextWords::new(text);
        let keywords = ContextKeyword::parse_all(&["account"]);
        let enhancer = ContextEnhancer::new(5, 0, 0.35, 0.4);

        let mut high = detection_for(text, "123456", 0.9);
        enhancer.enhance(&words, &mut high, &keywords);
        assert_eq!(high.score, 1.0);

        let mut low = detection_for(text, "123456", 0.01);
        enhancer.enhance(&words, &mut low, &keywords);
        assert_eq!(low.score, 0.4);
    }

    #[test]
    fn test_words_inside_match_are_not_context() {
        let text = "account";
        let keywords = ContextKeyword::parse_all(&["account"]);
        let detection = Detection::new("X", 0, text.len(), 0.4);

        assert!(ContextEnhancer::default()
            .find_keyword(&TextWords::new(text), &detection, &keywords)
            .is_none());
    }

    #[test]
    fn test_unicode_words() {
        let text = "Konto für Müller: 123456";
        let keywords = ContextKeyword::parse_all(&["müller"]);
        let detection = detection_for(text, "123456", 0.4);

        assert!(ContextEnhancer::default()
            .find_keyword(&TextWords::new(text), &detection, &keywords)
            .is_some());
    }

    #[test]
    fn test_keyword_without_word_characters_is_skipped() {
        assert!(ContextKeyword::parse(":::").is_none());
        assert_eq!(ContextKeyword::parse_all(&["", "name"]).len(), 1);
    }
}
