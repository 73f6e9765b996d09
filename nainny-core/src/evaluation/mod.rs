//! Scoring of adapted stories against their source.

mod evaluator;

pub use evaluator::{CULTURE_BOOST, SEMANTIC_WEIGHT, SIMPLICITY_WEIGHT, StoryEvaluator, StoryScores};
