use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// At most this many themes are reported per story.
pub const MAX_THEMES: usize = 5;

/// Fixed theme taxonomy for children's stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Bravery,
    Friendship,
    Family,
    Honesty,
    Kindness,
    Wisdom,
    Perseverance,
    Respect,
    Celebration,
    Adventure,
    Nature,
    Fear,
}

impl Theme {
    /// All themes in taxonomy order. Ties are resolved in this order.
    pub const ALL: [Theme; 12] = [
        Theme::Bravery,
        Theme::Friendship,
        Theme::Family,
        Theme::Honesty,
        Theme::Kindness,
        Theme::Wisdom,
        Theme::Perseverance,
        Theme::Respect,
        Theme::Celebration,
        Theme::Adventure,
        Theme::Nature,
        Theme::Fear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Bravery => "bravery",
            Theme::Friendship => "friendship",
            Theme::Family => "family",
            Theme::Honesty => "honesty",
            Theme::Kindness => "kindness",
            Theme::Wisdom => "wisdom",
            Theme::Perseverance => "perseverance",
            Theme::Respect => "respect",
            Theme::Celebration => "celebration",
            Theme::Adventure => "adventure",
            Theme::Nature => "nature",
            Theme::Fear => "fear",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Theme::Bravery => &["brave", "courage", "hero", "fearless", "bold", "daring"],
            Theme::Friendship => &["friend", "companion", "together", "help", "support", "trust"],
            Theme::Family => &["mother", "father", "parent", "family", "home", "brother", "sister"],
            Theme::Honesty => &["truth", "honest", "lie", "trust", "promise"],
            Theme::Kindness => &["kind", "gentle", "compassion", "care", "generous", "helpful"],
            Theme::Wisdom => &["wise", "clever", "smart", "learn", "knowledge", "teach"],
            Theme::Perseverance => &["try", "persist", "determination", "never give up", "keep going"],
            Theme::Respect => &["respect", "elder", "guru", "teacher", "namaste"],
            Theme::Celebration => &["celebrate", "festival", "joy", "happiness", "diwali", "holi"],
            Theme::Adventure => &["journey", "explore", "discover", "travel", "quest"],
            Theme::Nature => &["tree", "forest", "river", "animal", "bird", "mountain"],
            Theme::Fear => &["scared", "afraid", "frightened", "worry", "nervous"],
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}

static THEME_PATTERNS: Lazy<Vec<(Theme, Vec<Regex>)>> = Lazy::new(|| {
    Theme::ALL
        .iter()
        .map(|&theme| {
            let patterns = theme
                .keywords()
                .iter()
                .map(|kw| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(kw)))
                        .expect("theme keyword pattern is valid")
                })
                .collect();
            (theme, patterns)
        })
        .collect()
});

/// Count whole-word keyword hits for every theme, in taxonomy order.
pub fn theme_scores(text: &str) -> Vec<(Theme, usize)> {
    let lower = text.to_lowercase();
    THEME_PATTERNS
        .iter()
        .map(|(theme, patterns)| {
            let score = patterns.iter().map(|p| p.find_iter(&lower).count()).sum();
            (*theme, score)
        })
        .collect()
}

/// Themes with at least one keyword hit, most frequent first, at most [`MAX_THEMES`].
pub fn detect_themes(text: &str) -> Vec<Theme> {
    let mut scored: Vec<(Theme, usize)> = theme_scores(text)
        .into_iter()
        .filter(|(_, score)| *score >= 1)
        .collect();

    // stable: equal scores keep taxonomy order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().take(MAX_THEMES).map(|(t, _)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_matching() {
        // "kindle" is not "kind", "lies" is not "lie"
        assert!(detect_themes("She lit the kindle and told lies.").is_empty());
        assert_eq!(detect_themes("A KIND girl."), vec![Theme::Kindness]);
    }

    #[test]
    fn test_multi_word_keyword() {
        let scores = theme_scores("Never give up, she said, and keep going.");
        let perseverance = scores
            .iter()
            .find(|(t, _)| *t == Theme::Perseverance)
            .map(|(_, s)| *s);
        assert_eq!(perseverance, Some(2));
    }

    #[test]
    fn test_ranking_and_ties() {
        let themes = detect_themes(
            "The river ran past the tree near the forest. The brave boy ran to his mother.",
        );
        assert_eq!(themes[0], Theme::Nature);
        // bravery and family tie at 1 and keep taxonomy order
        assert_eq!(&themes[1..], &[Theme::Bravery, Theme::Family]);
    }

    #[test]
    fn test_at_most_five() {
        let themes = detect_themes(
            "brave friend mother truth kind wise try respect festival journey tree scared",
        );
        assert_eq!(themes.len(), MAX_THEMES);
        assert!(themes.iter().all(|t| Theme::ALL.contains(t)));
    }

    #[test]
    fn test_parse_label() {
        assert_eq!("Celebration".parse::<Theme>().unwrap(), Theme::Celebration);
        assert!("boredom".parse::<Theme>().is_err());
    }
}
