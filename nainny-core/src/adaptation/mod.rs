//! Story rewriting for a target culture and age group.
//!
//! [`AdaptiveStoryteller`] prefers a generative model when one is configured
//! and otherwise applies a small deterministic rule set: long sentences are
//! shortened for young readers, hinted terms are swapped for their cultural
//! counterparts, and a header names the target audience.

mod storyteller;

pub use storyteller::{
    AdaptationChange, AdaptationHints, AdaptationStrategy, AdaptedStory, AdaptiveStoryteller,
    DEFAULT_MAX_NEW_TOKENS, MAX_HINT_KEYS, is_young_audience,
};
