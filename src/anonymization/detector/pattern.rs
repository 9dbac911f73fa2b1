//! Pattern recognizer: compiled form of a [`RecognizerDefinition`]
//!
//! Rules compile to the linear-time `regex` engine. Only patterns that need
//! lookaround or backreferences fall back to `fancy_regex`, whose backtracking
//! is bounded and reports an error once the limit is reached.

use super::context::ContextKeyword;
use super::definition::{LanguageScope, RecognizerDefinition, Validator};
use crate::anonymization::models::{Detection, DetectionMethod};
use crate::domain::{Result, ScrubError};

/// Regex engine chosen for a rule
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    /// Linear-time matching, no match-time failures
    Linear(regex::Regex),
    /// Backtracking matching for lookaround and backreferences
    Backtracking(fancy_regex::Regex),
}

impl RuleMatcher {
    /// Compile a pattern, preferring the linear engine
    pub fn new(pattern: &str) -> std::result::Result<Self, fancy_regex::Error> {
        match regex::Regex::new(pattern) {
            Ok(regex) => Ok(Self::Linear(regex)),
            Err(_) => fancy_regex::Regex::new(pattern).map(Self::Backtracking),
        }
    }

    /// Source pattern
    pub fn as_str(&self) -> &str {
        match self {
            Self::Linear(regex) => regex.as_str(),
            Self::Backtracking(regex) => regex.as_str(),
        }
    }

    pub fn is_backtracking(&self) -> bool {
        matches!(self, Self::Backtracking(_))
    }

    pub fn is_match(&self, text: &str) -> std::result::Result<bool, fancy_regex::Error> {
        match self {
            Self::Linear(regex) => Ok(regex.is_match(text)),
            Self::Backtracking(regex) => regex.is_match(text),
        }
    }

    /// Byte spans of every non-overlapping match
    pub fn find_spans(
        &self,
        text: &str,
    ) -> std::result::Result<Vec<(usize, usize)>, fancy_regex::Error> {
        match self {
            Self::Linear(regex) => Ok(regex.find_iter(text).map(|m| (m.start(), m.end())).collect()),
            Self::Backtracking(regex) => regex
                .find_iter(text)
                .map(|found| found.map(|m| (m.start(), m.end())))
                .collect(),
        }
    }
}

/// Compiled rule with metadata
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// Rule name
    pub name: String,
    /// Compiled pattern
    pub regex: RuleMatcher,
    /// Base confidence
    pub score: f64,
}

/// Matches a single entity label through one or more regex rules
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    name: String,
    entity_label: String,
    rules: Vec<CompiledRule>,
    context: Vec<ContextKeyword>,
    language: LanguageScope,
    validator: Option<Validator>,
}

impl PatternRecognizer {
    /// Validate and compile a definition
    ///
    /// Fails with a configuration error if the definition is structurally
    /// invalid, a regex does not compile, or a regex matches the empty string.
    pub fn compile(definition: &RecognizerDefinition) -> Result<Self> {
        definition.validate()?;

        let label = definition.entity_label.trim().to_string();
        let mut rules = Vec::with_capacity(definition.rules.len());

        for (idx, rule) in definition.rules.iter().enumerate() {
            let regex = RuleMatcher::new(&rule.regex).map_err(|e| {
                ScrubError::Configuration(format!(
                    "Invalid regex in recognizer '{label}': {}: {e}",
                    rule.regex
                ))
            })?;

            let matches_empty = regex.is_match("").map_err(|e| {
                ScrubError::Configuration(format!(
                    "Regex in recognizer '{label}' failed on empty input: {e}"
                ))
            })?;
            if matches_empty {
                return Err(ScrubError::Configuration(format!(
                    "Regex in recognizer '{label}' matches zero-length spans: {}",
                    rule.regex
                )));
            }

            rules.push(CompiledRule {
                name: rule
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{}_{idx}", label.to_lowercase())),
                regex,
                score: rule.score,
            });
        }

        Ok(Self {
            name: format!("{label}_recognizer"),
            entity_label: label,
            rules,
            context: ContextKeyword::parse_all(&definition.context_keywords),
            language: definition.language.clone(),
            validator: definition.validator,
        })
    }

    /// Recognizer name used in detections and logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity label produced by this recognizer
    pub fn entity_label(&self) -> &str {
        &self.entity_label
    }

    /// Languages the recognizer applies to
    pub fn language(&self) -> &LanguageScope {
        &self.language
    }

    /// Context keywords of the recognizer
    pub fn context(&self) -> &[ContextKeyword] {
        &self.context
    }

    /// Compiled rules
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Produce raw candidates with base confidence
    ///
    /// Every non-overlapping match of every rule yields one candidate. A
    /// validator, when present, discards failing matches and raises passing
    /// ones to full confidence.
    pub fn analyze(&self, text: &str) -> std::result::Result<Vec<Detection>, fancy_regex::Error> {
        let mut candidates = Vec::new();

        for rule in &self.rules {
            for (start, end) in rule.regex.find_spans(text)? {
                if start == end {
                    continue;
                }

                let mut score = rule.score;
                if let Some(validator) = self.validator {
                    if !validator.validate(&text[start..end]) {
                        tracing::trace!(
                            recognizer = %self.name,
                            rule = %rule.name,
                            start,
                            "Candidate rejected by validator"
                        );
                        continue;
                    }
                    score = 1.0;
                }

                candidates.push(
                    Detection::new(&self.entity_label, start, end, score)
                        .produced_by(DetectionMethod::Pattern, &self.name),
                );
            }
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::detector::definition::Rule;

    fn postcode_definition() -> RecognizerDefinition {
        RecognizerDefinition::new(
            "POSTCODE",
            vec![Rule::new(
                "uk_postcode",
                r"\b[A-Z]{1,2}\d[A-Z\d]? ?\d[A-Z]{2}\b",
                0.6,
            )],
        )
        .with_context(["postcode"])
    }

    #[test]
    fn test_analyze_finds_all_matches() {
        let recognizer = PatternRecognizer::compile(&postcode_definition()).unwrap();
        let text = "From SW1A 1AA to M1 1AE";

        let found = recognizer.analyze(text).unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(&text[found[0].start..found[0].end], "SW1A 1AA");
        assert_eq!(&text[found[1].start..found[1].end], "M1 1AE");
        assert!(found.iter().all(|d| d.entity_label == "POSTCODE"));
        assert!(found.iter().all(|d| d.score == 0.6));
        assert!(found
            .iter()
            .all(|d| d.detection_method == DetectionMethod::Pattern));
    }

    #[test]
    fn test_compile_rejects_invalid_regex() {
        let def = RecognizerDefinition::new("BROKEN", vec![Rule::new("broken", r"(\d+", 0.5)]);
        let result = PatternRecognizer::compile(&def);
        assert!(matches!(result, Err(ScrubError::Configuration(_))));
    }

    #[test]
    fn test_compile_rejects_zero_length_pattern() {
        let def = RecognizerDefinition::new("EMPTY", vec![Rule::new("empty", r"\d*", 0.5)]);
        let result = PatternRecognizer::compile(&def);
        assert!(matches!(result, Err(ScrubError::Configuration(_))));
    }

    #[test]
    fn test_lookaround_patterns_are_supported() {
        let def = RecognizerDefinition::new(
            "ACCOUNT_NUMBER",
            vec![Rule::new("after_hash", r"(?<=#)\d{6}", 0.5)],
        );
        let recognizer = PatternRecognizer::compile(&def).unwrap();
        assert!(recognizer.rules()[0].regex.is_backtracking());

        let found = recognizer.analyze("ref #123456 and 654321").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start, 5);
    }

    #[test]
    fn test_validator_filters_and_promotes() {
        let def = RecognizerDefinition::new(
            "CREDIT_CARD",
            vec![Rule::new("cards", r"\b(?:\d{4}[ -]?){3}\d{4}\b", 0.3)],
        )
        .with_validator(Validator::Luhn);
        let recognizer = PatternRecognizer::compile(&def).unwrap();

        let found = recognizer
            .analyze("good 4111 1111 1111 1111 bad 4111 1111 1111 1112")
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].score, 1.0);
    }

    #[test]
    fn test_unnamed_rules_get_generated_names() {
        let def = RecognizerDefinition::new(
            "ACCOUNT_NUMBER",
            vec![Rule {
                name: None,
                regex: r"\d{6}".to_string(),
                score: 0.4,
            }],
        );
        let recognizer = PatternRecognizer::compile(&def).unwrap();
        assert_eq!(recognizer.rules()[0].name, "account_number_0");
        assert_eq!(recognizer.name(), "ACCOUNT_NUMBER_recognizer");
    }

    #[test]
    fn test_plain_patterns_use_linear_engine() {
        let recognizer = PatternRecognizer::compile(&postcode_definition()).unwrap();
        assert!(!recognizer.rules()[0].regex.is_backtracking());
        assert_eq!(
            recognizer.rules()[0].regex.as_str(),
            r"\b[A-Z]{1,2}\d[A-Z\d]? ?\d[A-Z]{2}\b"
        );
    }
}
