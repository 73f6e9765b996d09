use serde::{Deserialize, Serialize};

use crate::text::{ParsedDocument, Token};

/// Grade reported when a document has no sentences or no words.
pub const DEFAULT_GRADE: f64 = 5.0;

const VOWELS: &str = "aeiou";

/// Readability statistics for one document.
///
/// `score` is the blended 1-10 complexity; the remaining fields are the
/// rounded inputs it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub score: u8,
    pub flesch_kincaid_grade: f64,
    pub avg_sentence_length: f64,
    pub lexical_diversity: f64,
    pub avg_word_length: f64,
    pub total_words: usize,
    pub total_sentences: usize,
}

impl ComplexityMetrics {
    pub fn age_recommendation(&self) -> &'static str {
        recommend_age_range(self.score)
    }
}

/// Computes [`ComplexityMetrics`] from a parsed document.
#[derive(Debug, Clone)]
pub struct ComplexityAnalyzer {
    default_grade: f64,
}

impl Default for ComplexityAnalyzer {
    fn default() -> Self {
        Self {
            default_grade: DEFAULT_GRADE,
        }
    }
}

impl ComplexityAnalyzer {
    /// Use a different fallback grade for empty documents (clamped to [1, 12]).
    pub fn with_default_grade(grade: f64) -> Self {
        Self {
            default_grade: grade.clamp(1.0, 12.0),
        }
    }

    pub fn analyze(&self, doc: &ParsedDocument) -> ComplexityMetrics {
        let words: Vec<&Token> = doc.words().collect();
        let word_count = words.len();
        let sentence_count = doc.sentences.len();

        let avg_sentence_length = word_count as f64 / sentence_count.max(1) as f64;

        let unique = words
            .iter()
            .filter(|t| !t.is_stop)
            .map(|t| t.lower())
            .collect::<std::collections::HashSet<_>>()
            .len();
        let lexical_diversity = unique as f64 / word_count.max(1) as f64;

        let avg_word_length = words.iter().map(|t| t.text.chars().count()).sum::<usize>() as f64
            / word_count.max(1) as f64;

        let grade = if sentence_count > 0 && word_count > 0 {
            let avg_syllables = syllables_per_word(&words);
            (0.39 * avg_sentence_length + 11.8 * avg_syllables - 15.59).clamp(1.0, 12.0)
        } else {
            self.default_grade
        };

        let score = complexity_score(grade, avg_sentence_length, lexical_diversity, avg_word_length);

        ComplexityMetrics {
            score,
            flesch_kincaid_grade: round_to(grade, 1),
            avg_sentence_length: round_to(avg_sentence_length, 1),
            lexical_diversity: round_to(lexical_diversity, 3),
            avg_word_length: round_to(avg_word_length, 1),
            total_words: word_count,
            total_sentences: sentence_count,
        }
    }
}

/// Analyze with the default fallback grade.
pub fn analyze_complexity(doc: &ParsedDocument) -> ComplexityMetrics {
    ComplexityAnalyzer::default().analyze(doc)
}

/// Map a 1-10 complexity score to one of the fixed age ranges.
pub fn recommend_age_range(score: u8) -> &'static str {
    match score {
        0..=3 => "3-5",
        4..=5 => "6-8",
        6..=7 => "9-12",
        _ => "13+",
    }
}

fn complexity_score(grade: f64, avg_sentence_length: f64, diversity: f64, avg_word_length: f64) -> u8 {
    let blended = (grade / 12.0) * 0.4
        + (avg_sentence_length / 20.0).min(1.0) * 0.3
        + diversity * 0.2
        + (avg_word_length / 10.0).min(1.0) * 0.1;

    (blended * 10.0).floor().clamp(1.0, 10.0) as u8
}

/// Vowel-group syllable estimate averaged over words.
fn syllables_per_word(words: &[&Token]) -> f64 {
    let total: usize = words.iter().map(|t| estimate_syllables(&t.lower())).sum();
    total as f64 / words.len().max(1) as f64
}

fn estimate_syllables(word: &str) -> usize {
    let mut count: i64 = 0;
    let mut previous_was_vowel = false;
    for c in word.chars() {
        let is_vowel = VOWELS.contains(c);
        if is_vowel && !previous_was_vowel {
            count += 1;
        }
        previous_was_vowel = is_vowel;
    }
    // silent e
    if word.ends_with('e') {
        count -= 1;
    }
    count.max(1) as usize
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
