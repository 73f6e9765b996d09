use serde::{Deserialize, Serialize};

/// Coarse part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Noun,
    Propn,
    Verb,
    Aux,
    Adj,
    Adv,
    Pron,
    Det,
    Adp,
    Cconj,
    Sconj,
    Num,
    Part,
    Punct,
    Space,
    X,
}

impl PartOfSpeech {
    /// Nouns and proper nouns.
    pub fn is_nominal(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Propn)
    }
}

/// Named-entity labels (OntoNotes style).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    Person,
    Norp,
    Org,
    Gpe,
    Loc,
    Fac,
    Event,
    Product,
    WorkOfArt,
    Other(String),
}

impl EntityLabel {
    /// Label as printed by most NER models.
    pub fn as_str(&self) -> &str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Norp => "NORP",
            EntityLabel::Org => "ORG",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Loc => "LOC",
            EntityLabel::Fac => "FAC",
            EntityLabel::Event => "EVENT",
            EntityLabel::Product => "PRODUCT",
            EntityLabel::WorkOfArt => "WORK_OF_ART",
            EntityLabel::Other(label) => label,
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single token with its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
    pub is_punct: bool,
    pub is_space: bool,
    /// Byte offset into the source text
    pub start: usize,
    /// Index into [`ParsedDocument::sentences`]
    pub sentence: usize,
}

impl Token {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// A sentence as a byte range plus its token range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub first_token: usize,
    /// Exclusive
    pub last_token: usize,
}

/// A labelled entity span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// A base noun phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NounChunk {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub first_token: usize,
    /// Exclusive
    pub last_token: usize,
    /// Index of the head token
    pub root: usize,
}

/// Tokenized and annotated story text, produced fresh per analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub text: String,
    pub sentences: Vec<Sentence>,
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
    pub noun_chunks: Vec<NounChunk>,
}

impl ParsedDocument {
    /// Tokens that are neither punctuation nor whitespace.
    pub fn words(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| !t.is_punct && !t.is_space)
    }

    /// Number of non-punctuation tokens.
    pub fn non_punct_len(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_punct).count()
    }

    /// Lowercased text of the first sentence, empty when there is none.
    pub fn first_sentence_lower(&self) -> String {
        self.sentences
            .first()
            .map(|s| s.text.to_lowercase())
            .unwrap_or_default()
    }

    pub fn root_of<'a>(&'a self, chunk: &NounChunk) -> Option<&'a Token> {
        self.tokens.get(chunk.root)
    }
}
