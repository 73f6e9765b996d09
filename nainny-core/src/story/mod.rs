//! Stories: persisted records, the analysis pipeline and storage.

pub mod models;
pub mod parser;
pub mod repository;

pub use models::{
    AdaptationType, Story, StoryAdaptation, StoryAnalysis, StoryConcept, StoryEntities, StoryId,
};
pub use parser::{MAX_SAVED_CONCEPTS, StoryParser};
pub use repository::{InMemoryStoryRepository, StoryRepository};
