//! Word lists backing the rule-based parser.

use once_cell::sync::Lazy;
use std::collections::HashSet;

fn set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

/// English stop words.
pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
        "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
        "anyone", "anything", "are", "around", "as", "at", "back", "be", "became", "because",
        "become", "been", "before", "being", "below", "beside", "between", "both", "but", "by",
        "can", "could", "did", "do", "does", "doing", "done", "down", "during", "each", "either",
        "else", "enough", "even", "ever", "every", "everyone", "everything", "few", "for",
        "from", "further", "had", "has", "have", "he", "her", "here", "hers", "herself", "him",
        "himself", "his", "how", "however", "i", "if", "in", "into", "is", "it", "its",
        "itself", "just", "last", "least", "less", "made", "make", "many", "may", "me", "might",
        "more", "most", "much", "must", "my", "myself", "neither", "never", "next", "no",
        "nobody", "none", "nor", "not", "nothing", "now", "of", "off", "often", "on", "once",
        "one", "only", "onto", "or", "other", "others", "our", "ours", "ourselves", "out",
        "over", "own", "per", "perhaps", "please", "put", "quite", "rather", "really", "said",
        "same", "say", "see", "seem", "seemed", "several", "she", "should", "show", "since",
        "so", "some", "someone", "something", "sometimes", "still", "such", "take", "than",
        "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
        "they", "this", "those", "though", "through", "thus", "to", "together", "too", "toward",
        "towards", "under", "until", "up", "upon", "us", "used", "very", "was", "we", "well",
        "were", "what", "whatever", "when", "where", "whether", "which", "while", "who",
        "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
        "you", "your", "yours", "yourself", "yourselves",
    ])
});

pub static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "a", "an", "the", "this", "that", "these", "those", "every", "each", "some", "any", "no",
        "many", "few", "several", "all", "both", "much", "another", "such", "his", "her", "its",
        "their", "my", "your", "our", "whose",
    ])
});

pub static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "myself",
        "yourself", "himself", "herself", "itself", "ourselves", "themselves", "who", "whom",
        "someone", "everyone", "anyone", "nobody", "everybody", "somebody", "something",
        "everything", "nothing", "anything", "mine", "yours", "hers", "ours", "theirs", "what",
        "which",
    ])
});

/// Pronouns that usually open a clause.
pub static SUBJECT_PRONOUNS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| set(&["i", "you", "he", "she", "it", "we", "they", "who"]));

pub static ADPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "in", "on", "at", "to", "from", "by", "with", "about", "into", "onto", "over", "under",
        "through", "across", "after", "before", "behind", "beside", "between", "near", "for",
        "of", "off", "around", "along", "upon", "towards", "toward", "without", "within",
        "during", "inside", "outside", "beyond", "among", "against", "like",
    ])
});

pub static COORDINATORS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| set(&["and", "or", "but", "nor", "yet"]));

pub static SUBORDINATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "because", "if", "when", "while", "although", "though", "until", "unless", "since",
        "whether", "where", "so", "as",
    ])
});

pub static AUXILIARIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had", "do",
        "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
        "must",
    ])
});

pub static PARTICLES: Lazy<HashSet<&'static str>> = Lazy::new(|| set(&["not", "n't"]));

pub static ADVERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "very", "too", "also", "then", "now", "soon", "always", "never", "often", "again",
        "once", "here", "there", "just", "still", "even", "only", "quite", "away", "back",
        "together", "almost", "already", "ever", "perhaps", "today", "tomorrow", "yesterday",
        "tonight", "everywhere", "home", "outside", "inside", "up", "down", "out", "forward",
    ])
});

pub static NUMBER_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
        "twelve", "twenty", "hundred", "thousand",
    ])
});

pub static ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "small", "big", "little", "large", "old", "young", "new", "good", "bad", "happy", "sad",
        "kind", "brave", "wise", "clever", "beautiful", "bright", "dark", "long", "short",
        "tall", "great", "tiny", "huge", "poor", "rich", "gentle", "strong", "weak", "warm",
        "cold", "hot", "sweet", "red", "blue", "green", "yellow", "white", "black", "golden",
        "first", "last", "next", "other", "same", "own", "best", "hungry", "angry", "quiet",
        "loud", "busy", "dear", "special", "scared", "afraid", "honest", "bold", "smart",
        "nervous", "clean", "deep", "high", "low", "fast", "slow", "proud", "shy", "lonely",
        "magic", "magical", "favourite", "favorite", "whole", "few",
    ])
});

pub static VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "lit", "light", "went", "go", "goes", "came", "come", "comes", "saw", "see", "sees",
        "said", "say", "says", "made", "make", "makes", "took", "take", "gave", "give", "gives",
        "found", "find", "ran", "run", "runs", "sat", "sit", "told", "tell", "knew", "know",
        "thought", "think", "felt", "feel", "got", "get", "look", "play", "live", "lives",
        "ate", "eat", "ask", "help", "want", "love", "loves", "began", "begin", "brought",
        "bring", "kept", "keep", "left", "met", "meet", "heard", "hear", "learnt", "learn",
        "stood", "fell", "flew", "fly", "swam", "sang", "sing", "dance", "celebrate", "share",
        "walk", "smile", "laugh", "cried", "cry", "call", "open", "won", "win", "lost", "lose",
        "built", "build", "drew", "draw", "wore", "wear", "put", "let", "became", "become",
        "grew", "grow", "taught", "teach", "bought", "buy", "sent", "send", "held", "hold",
    ])
});

/// Leading words that mark a person's name.
pub static PERSON_TITLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "mr", "mrs", "ms", "dr", "king", "queen", "prince", "princess", "raja", "rani", "uncle",
        "aunt", "grandma", "grandpa", "lord", "lady", "sir", "master", "saint",
    ])
});

/// Abbreviations whose period does not end a sentence.
pub static ABBREVIATIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| set(&["mr", "mrs", "ms", "dr", "st", "jr", "sr", "prof"]));

pub static EVENT_HEADS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&["festival", "day", "fair", "mela", "puja", "utsav", "eve", "jayanti", "purnima"])
});

pub static ORG_HEADS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&[
        "school", "company", "club", "society", "council", "army", "bank", "team", "university",
        "college", "academy",
    ])
});

pub static LOC_HEADS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&["river", "mountain", "mountains", "lake", "forest", "sea", "ocean", "hills", "valley"])
});

pub static FAC_HEADS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    set(&["temple", "palace", "fort", "bridge", "market", "road", "street", "tower", "gate"])
});

pub static GPE_HEADS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| set(&["village", "city", "town", "kingdom", "country", "state"]));

/// Prepositions that usually introduce a place.
pub static PLACE_PREPOSITIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| set(&["in", "at", "from", "to", "near", "towards", "across"]));
