use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;

use super::document::{EntityLabel, EntitySpan, NounChunk, ParsedDocument, PartOfSpeech, Sentence, Token};
use super::lexicon::*;
use super::traits::TextParser;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]")
        .expect("token pattern is valid")
});

const TERMINALS: [&str; 3] = [".", "!", "?"];
const CLOSERS: [&str; 6] = ["\"", "'", "”", "’", ")", "]"];
const OPENERS: [&str; 5] = ["\"", "'", "“", "‘", "("];

/// Deterministic English parser built from word lists and suffix rules.
///
/// It is not a statistical model: tags and entity labels are heuristics that
/// work well enough on simple narrative prose.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<Token> {
        TOKEN_PATTERN
            .find_iter(text)
            .map(|m| {
                let token_text = m.as_str().to_string();
                let is_punct = !token_text.chars().any(char::is_alphanumeric);
                let is_stop = !is_punct && STOP_WORDS.contains(token_text.to_lowercase().as_str());
                Token {
                    text: token_text,
                    pos: if is_punct { PartOfSpeech::Punct } else { PartOfSpeech::X },
                    is_stop,
                    is_punct,
                    is_space: false,
                    start: m.start(),
                    sentence: 0,
                }
            })
            .collect()
    }

    fn segment(text: &str, tokens: &mut [Token]) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut first = 0;
        let mut i = 0;

        while i < tokens.len() {
            let is_terminal = TERMINALS.contains(&tokens[i].text.as_str());
            let after_abbreviation = tokens[i].text == "."
                && i > 0
                && ABBREVIATIONS.contains(tokens[i - 1].lower().as_str());

            if is_terminal && !after_abbreviation {
                let mut end = i + 1;
                // Closing quotes only belong here when they touch the terminal.
                while end < tokens.len()
                    && tokens[end].start == tokens[end - 1].end()
                    && (TERMINALS.contains(&tokens[end].text.as_str())
                        || CLOSERS.contains(&tokens[end].text.as_str()))
                {
                    end += 1;
                }
                Self::push_sentence(text, tokens, &mut sentences, first, end);
                first = end;
                i = end;
            } else {
                i += 1;
            }
        }

        if first < tokens.len() {
            Self::push_sentence(text, tokens, &mut sentences, first, tokens.len());
        }

        sentences
    }

    fn push_sentence(
        text: &str,
        tokens: &mut [Token],
        sentences: &mut Vec<Sentence>,
        first: usize,
        last: usize,
    ) {
        let index = sentences.len();
        for token in &mut tokens[first..last] {
            token.sentence = index;
        }
        let start = tokens[first].start;
        let end = tokens[last - 1].end();
        sentences.push(Sentence {
            text: text[start..end].to_string(),
            start,
            end,
            first_token: first,
            last_token: last,
        });
    }

    fn is_sentence_initial(tokens: &[Token], sentences: &[Sentence], i: usize) -> bool {
        let first = sentences[tokens[i].sentence].first_token;
        (first..i).all(|j| OPENERS.contains(&tokens[j].text.as_str()))
    }

    fn closed_class(lower: &str) -> Option<PartOfSpeech> {
        if AUXILIARIES.contains(lower) {
            Some(PartOfSpeech::Aux)
        } else if DETERMINERS.contains(lower) {
            Some(PartOfSpeech::Det)
        } else if PRONOUNS.contains(lower) {
            Some(PartOfSpeech::Pron)
        } else if ADPOSITIONS.contains(lower) {
            Some(PartOfSpeech::Adp)
        } else if COORDINATORS.contains(lower) {
            Some(PartOfSpeech::Cconj)
        } else if SUBORDINATORS.contains(lower) {
            Some(PartOfSpeech::Sconj)
        } else if PARTICLES.contains(lower) {
            Some(PartOfSpeech::Part)
        } else if NUMBER_WORDS.contains(lower) || lower.chars().all(|c| c.is_ascii_digit()) {
            Some(PartOfSpeech::Num)
        } else if ADVERBS.contains(lower) {
            Some(PartOfSpeech::Adv)
        } else {
            None
        }
    }

    fn open_class(lower: &str) -> Option<PartOfSpeech> {
        if VERBS.contains(lower) {
            return Some(PartOfSpeech::Verb);
        }
        if ADJECTIVES.contains(lower) {
            return Some(PartOfSpeech::Adj);
        }
        let len = lower.chars().count();
        if len > 3 && lower.ends_with("ly") {
            return Some(PartOfSpeech::Adv);
        }
        if lower.ends_with("thing") {
            return Some(PartOfSpeech::Noun);
        }
        if (len > 4 && lower.ends_with("ed")) || (len > 5 && lower.ends_with("ing")) {
            return Some(PartOfSpeech::Verb);
        }
        let adjective_suffix = ["ous", "ful", "ive", "less", "able", "ible"]
            .iter()
            .any(|suffix| lower.ends_with(suffix));
        if len > 5 && adjective_suffix {
            return Some(PartOfSpeech::Adj);
        }
        None
    }

    fn tag(tokens: &mut [Token], sentences: &[Sentence]) {
        let evidence = NameEvidence::collect(tokens, sentences);
        for i in 0..tokens.len() {
            if tokens[i].is_punct {
                continue;
            }
            let lower = tokens[i].lower();
            let capitalized = tokens[i].text.chars().next().is_some_and(char::is_uppercase);
            let initial = Self::is_sentence_initial(tokens, sentences, i);
            let prev = (i > 0 && tokens[i - 1].sentence == tokens[i].sentence)
                .then(|| tokens[i - 1].pos);
            let prev_lower = (i > 0).then(|| tokens[i - 1].lower());

            let pos = if let Some(pos) = Self::closed_class(&lower) {
                pos
            } else if capitalized && !initial {
                PartOfSpeech::Propn
            } else if matches!(
                prev,
                Some(PartOfSpeech::Det | PartOfSpeech::Adj | PartOfSpeech::Num)
            ) {
                if ADJECTIVES.contains(lower.as_str()) {
                    PartOfSpeech::Adj
                } else {
                    PartOfSpeech::Noun
                }
            } else if let Some(pos) = Self::open_class(&lower) {
                pos
            } else if capitalized && evidence.is_name(tokens, i) {
                PartOfSpeech::Propn
            } else if prev_lower
                .as_deref()
                .is_some_and(|p| SUBJECT_PRONOUNS.contains(p))
            {
                PartOfSpeech::Verb
            } else {
                PartOfSpeech::Noun
            };

            tokens[i].pos = pos;
        }
    }

    fn entity_label(tokens: &[Token], first: usize, last: usize) -> EntityLabel {
        let head = tokens[first].lower();
        let tail = tokens[last - 1].lower();
        let next = tokens.get(last).map(Token::lower);
        let prev = first.checked_sub(1).map(|j| tokens[j].lower());

        if PERSON_TITLES.contains(head.as_str()) {
            EntityLabel::Person
        } else if EVENT_HEADS.contains(tail.as_str())
            || next.as_deref().is_some_and(|n| EVENT_HEADS.contains(n))
            || Self::defined_as_event(tokens, last)
        {
            EntityLabel::Event
        } else if ORG_HEADS.contains(tail.as_str()) {
            EntityLabel::Org
        } else if LOC_HEADS.contains(tail.as_str()) {
            EntityLabel::Loc
        } else if FAC_HEADS.contains(tail.as_str()) {
            EntityLabel::Fac
        } else if GPE_HEADS.contains(tail.as_str())
            || prev.as_deref().is_some_and(|p| PLACE_PREPOSITIONS.contains(p))
        {
            EntityLabel::Gpe
        } else if last - first == 1
            && ["ian", "ese", "ish"].iter().any(|s| tail.ends_with(s))
            && tail.len() > 5
        {
            EntityLabel::Norp
        } else {
            EntityLabel::Person
        }
    }

    /// "X is a festival", "X was the day".
    fn defined_as_event(tokens: &[Token], after: usize) -> bool {
        let window: Vec<&Token> = tokens.iter().skip(after).take(3).collect();
        window.len() == 3
            && window[0].pos == PartOfSpeech::Aux
            && window[1].pos == PartOfSpeech::Det
            && EVENT_HEADS.contains(window[2].lower().as_str())
    }

    fn entities(text: &str, tokens: &[Token]) -> Vec<EntitySpan> {
        let mut entities = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if tokens[i].pos != PartOfSpeech::Propn {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < tokens.len()
                && tokens[j].pos == PartOfSpeech::Propn
                && tokens[j].sentence == tokens[i].sentence
            {
                j += 1;
            }
            let start = tokens[i].start;
            let end = tokens[j - 1].end();
            entities.push(EntitySpan {
                text: text[start..end].to_string(),
                label: Self::entity_label(tokens, i, j),
                start,
                end,
            });
            i = j;
        }
        entities
    }

    fn noun_chunks(text: &str, tokens: &[Token]) -> Vec<NounChunk> {
        let chunkable = |pos: PartOfSpeech| {
            matches!(
                pos,
                PartOfSpeech::Det
                    | PartOfSpeech::Adj
                    | PartOfSpeech::Num
                    | PartOfSpeech::Noun
                    | PartOfSpeech::Propn
            )
        };

        let mut chunks = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if !chunkable(tokens[i].pos) {
                i += 1;
                continue;
            }

            // A determiner after a noun opens a new phrase.
            let mut j = i + 1;
            while j < tokens.len()
                && chunkable(tokens[j].pos)
                && tokens[j].sentence == tokens[i].sentence
                && !(tokens[j].pos == PartOfSpeech::Det && tokens[j - 1].pos.is_nominal())
            {
                j += 1;
            }

            if let Some(root) = (i..j).rev().find(|&k| tokens[k].pos.is_nominal()) {
                let start = tokens[i].start;
                let end = tokens[root].end();
                chunks.push(NounChunk {
                    text: text[start..end].to_string(),
                    start,
                    end,
                    first_token: i,
                    last_token: root + 1,
                    root,
                });
            }
            i = j;
        }
        chunks
    }
}

fn is_capitalized(token: &Token) -> bool {
    token.text.chars().next().is_some_and(char::is_uppercase)
}

/// Signals that a capitalized word at the start of a sentence is a name
/// rather than an ordinary word that happens to lead.
#[derive(Debug, Default)]
struct NameEvidence {
    mid_sentence: HashSet<String>,
    lowercase: HashSet<String>,
    sentence_initial: HashMap<String, usize>,
}

impl NameEvidence {
    fn collect(tokens: &[Token], sentences: &[Sentence]) -> Self {
        let mut evidence = Self::default();
        for (i, token) in tokens.iter().enumerate() {
            if token.is_punct {
                continue;
            }
            let lower = token.lower();
            if !is_capitalized(token) {
                evidence.lowercase.insert(lower);
            } else if RuleBasedParser::is_sentence_initial(tokens, sentences, i) {
                *evidence.sentence_initial.entry(lower).or_default() += 1;
            } else {
                evidence.mid_sentence.insert(lower);
            }
        }
        evidence
    }

    fn is_name(&self, tokens: &[Token], i: usize) -> bool {
        let lower = tokens[i].lower();
        // Written lowercase anywhere means it is a common word.
        if self.lowercase.contains(&lower) {
            return false;
        }

        let next = |k: usize| {
            tokens
                .get(i + k)
                .filter(|t| t.sentence == tokens[i].sentence)
                .map(Token::lower)
        };
        let followed_by_name = tokens.get(i + 1).is_some_and(|t| {
            t.sentence == tokens[i].sentence
                && is_capitalized(t)
                && RuleBasedParser::closed_class(&t.lower()).is_none()
        });
        // "Diwali festival", "Diwali is a festival".
        let names_event = next(1).is_some_and(|n| EVENT_HEADS.contains(n.as_str()))
            || (next(1).is_some_and(|n| AUXILIARIES.contains(n.as_str()))
                && next(2).is_some_and(|n| DETERMINERS.contains(n.as_str()))
                && next(3).is_some_and(|n| EVENT_HEADS.contains(n.as_str())));

        self.mid_sentence.contains(&lower)
            || self.sentence_initial.get(&lower).is_some_and(|&n| n > 1)
            || PERSON_TITLES.contains(lower.as_str())
            || followed_by_name
            || names_event
    }
}

impl TextParser for RuleBasedParser {
    fn parse(&self, text: &str) -> Result<ParsedDocument> {
        let mut tokens = Self::tokenize(text);
        let sentences = Self::segment(text, &mut tokens);
        Self::tag(&mut tokens, &sentences);
        let entities = Self::entities(text, &tokens);
        let noun_chunks = Self::noun_chunks(text, &tokens);

        Ok(ParsedDocument {
            text: text.to_string(),
            sentences,
            tokens,
            entities,
            noun_chunks,
        })
    }

    fn name(&self) -> &str {
        "rule-based-en"
    }
}
