//! End-to-end tests: parse a story, score its cultural fit, adapt it and
//! evaluate the adaptation.

use std::collections::BTreeSet;
use std::sync::Arc;

use nainny_core::adaptation::AdaptationStrategy;
use nainny_core::culture::MarkerKind;
use nainny_core::prelude::*;
use nainny_core::story::MAX_SAVED_CONCEPTS;

const DIWALI_STORY: &str = "Diwali is a festival. Ramesh and his grandmother lit many small \
                            lamps together in the evening courtyard. Ramesh was brave and kind.";

const CHRISTMAS_STORY: &str = "On Christmas morning Anna opened her presents with her brother. \
                               They ate cake and sang songs near the tree while snow fell quietly \
                               over the sleepy village and the bells of the old church rang again.";

fn parser(repository: Arc<InMemoryStoryRepository>) -> StoryParser {
    StoryParser::new(LanguageModel::load(), repository, &NainnyConfig::default())
        .expect("parser builds with the default config")
}

async fn analyzer() -> CulturalAnalyzer {
    CulturalAnalyzer::load(&EmbeddedKnowledgeBase::seeded(), "indian", None)
        .await
        .expect("embedded knowledge base loads")
}

#[tokio::test]
async fn test_story_to_cultural_fit() {
    let parser = parser(Arc::new(InMemoryStoryRepository::new()));
    let analysis = parser
        .parse_story(DIWALI_STORY, "Festival of Lights", false)
        .await
        .unwrap();

    assert!((1..=10).contains(&analysis.complexity.score));
    assert!(analysis.themes.len() <= 5);
    assert!(analysis.concepts.iter().all(|c| (0.0..=1.0).contains(&c.importance)));

    let analyzer = analyzer().await;
    let report = analyzer.analyze_cultural_fit(DIWALI_STORY, &analysis.concepts, Some("6-8"));

    assert!(report.score > 0.5 && report.score <= 1.0);
    assert!(report
        .markers
        .iter()
        .any(|m| m.kind == MarkerKind::Festival && m.name == "Diwali"));
    assert!(report
        .markers
        .iter()
        .any(|m| m.kind == MarkerKind::CulturalElement && m.name == "Respect for Elders"));

    // Repeated detection is stable.
    let again = analyzer.analyze_cultural_fit(DIWALI_STORY, &analysis.concepts, Some("6-8"));
    assert_eq!(report.markers, again.markers);
}

#[tokio::test]
async fn test_unrelated_story_is_neutral() {
    let analyzer = analyzer().await;
    let report = analyzer.analyze_cultural_fit("The robot counted gears all day.", &[], None);
    assert_eq!(report.markers_found, 0);
    assert_eq!(report.score, 0.5);
    assert!(!report.suggestions.is_empty());
}

#[tokio::test]
async fn test_adapt_and_evaluate() {
    let analyzer = analyzer().await;

    let mut hints = AdaptationHints::new();
    for term in ["Christmas", "cake"] {
        let mapping = analyzer
            .find_concept_mapping(&term.to_lowercase(), "western")
            .await
            .expect("seeded mapping exists");
        hints.insert(term.to_string(), serde_json::Value::String(title_case(&mapping.target)));
    }

    let storyteller = AdaptiveStoryteller::rule_based();
    let adapted = storyteller
        .adapt(CHRISTMAS_STORY, "Indian", "3-5", Some(&hints))
        .await;

    assert_eq!(adapted.strategy, AdaptationStrategy::RuleBased);
    assert!(adapted.text.starts_with("(Adapted for Indian / 3-5)\n"));
    assert!(adapted.text.contains("On Diwali morning"));
    assert!(!adapted.text.contains("Christmas"));
    // The 26-word second sentence is cut to 18 words.
    assert!(adapted.text.ends_with("..."));

    let evaluator = StoryEvaluator::lexical();
    let scores = evaluator
        .evaluate(CHRISTMAS_STORY, &adapted.text, "Indian")
        .await;
    assert!(scores.culture_present);
    assert!(scores.semantic > 0.5 && scores.semantic <= 1.0);
    assert!(scores.composite > 0.1 + 0.7 * 0.5);
    assert!(scores.simplicity >= evaluator.simplicity_score(CHRISTMAS_STORY));
}

#[tokio::test]
async fn test_persistence_round_trip() {
    let repository = Arc::new(InMemoryStoryRepository::new());
    let parser = parser(repository.clone());

    let story = repository
        .create_story(Story::new("Festival of Lights", DIWALI_STORY))
        .await
        .unwrap();
    let analysis = parser.analyze_stored(story.id, false).await.unwrap();

    let expected: BTreeSet<(String, ConceptType)> = analysis
        .concepts
        .iter()
        .take(MAX_SAVED_CONCEPTS)
        .map(|c| (c.text.clone(), c.concept_type))
        .collect();
    let stored: BTreeSet<(String, ConceptType)> = repository
        .concepts_for(story.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.concept, c.concept_type))
        .collect();
    assert_eq!(stored, expected);

    let saved = repository.get_story(story.id).await.unwrap().unwrap();
    assert_eq!(saved.age_range.as_deref(), Some(analysis.age_recommendation.as_str()));
    assert_eq!(saved.sentence_count, Some(3));

    // Saving again replaces rather than appends.
    parser.save_story_analysis(story.id, &analysis).await.unwrap();
    assert_eq!(
        repository.concepts_for(story.id).await.unwrap().len(),
        expected.len()
    );
}

#[tokio::test]
async fn test_saved_concepts_are_capped() {
    let things = [
        "kite", "drum", "bell", "lamp", "boat", "cart", "goat", "cow", "mango", "flute", "bowl",
        "shawl", "rope", "pot", "tree", "leaf", "seed", "bird", "fish", "stone", "mat", "comb",
    ];
    let text = things
        .iter()
        .map(|thing| format!("The small {} was here.", thing))
        .collect::<Vec<_>>()
        .join(" ");

    let repository = Arc::new(InMemoryStoryRepository::new());
    let parser = parser(repository.clone());
    let story = repository
        .create_story(Story::new("Things", &text))
        .await
        .unwrap();

    let analysis = parser.analyze_stored(story.id, false).await.unwrap();
    assert!(analysis.concepts.len() > MAX_SAVED_CONCEPTS);

    let stored = repository.concepts_for(story.id).await.unwrap();
    assert_eq!(stored.len(), MAX_SAVED_CONCEPTS);

    let top: BTreeSet<&str> = analysis
        .concepts
        .iter()
        .take(MAX_SAVED_CONCEPTS)
        .map(|c| c.text.as_str())
        .collect();
    assert!(stored.iter().all(|c| top.contains(c.concept.as_str())));
}

#[tokio::test]
async fn test_missing_story_reports_record_not_found() {
    let parser = parser(Arc::new(InMemoryStoryRepository::new()));
    let err = parser.analyze_stored(404, false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RecordNotFound);
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
