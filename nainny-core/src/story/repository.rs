//! Story persistence

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{NainnyError, Result};

use super::models::{Story, StoryAdaptation, StoryConcept, StoryId};

/// Storage for stories, their concepts and adaptations.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Store a new story and return it with its assigned id.
    async fn create_story(&self, story: Story) -> Result<Story>;

    async fn get_story(&self, id: StoryId) -> Result<Option<Story>>;

    /// Overwrite an existing story.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the story does not exist.
    async fn update_story(&self, story: Story) -> Result<Story>;

    /// Delete a story with its concepts and adaptations. Returns whether it existed.
    async fn delete_story(&self, id: StoryId) -> Result<bool>;

    /// Replace all concepts of a story in one step.
    async fn replace_concepts(&self, id: StoryId, concepts: Vec<StoryConcept>) -> Result<()>;

    async fn concepts_for(&self, id: StoryId) -> Result<Vec<StoryConcept>>;

    async fn save_adaptation(&self, adaptation: StoryAdaptation) -> Result<StoryAdaptation>;

    async fn adaptations_for(&self, id: StoryId) -> Result<Vec<StoryAdaptation>>;
}

#[derive(Default)]
struct Tables {
    next_story_id: StoryId,
    next_adaptation_id: u64,
    stories: HashMap<StoryId, Story>,
    concepts: HashMap<StoryId, Vec<StoryConcept>>,
    adaptations: HashMap<StoryId, Vec<StoryAdaptation>>,
}

/// In-memory story repository
#[derive(Clone, Default)]
pub struct InMemoryStoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: StoryId) -> NainnyError {
    NainnyError::RecordNotFound(format!("story {}", id))
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn create_story(&self, mut story: Story) -> Result<Story> {
        let mut tables = self.tables.write().await;
        tables.next_story_id += 1;
        story.id = tables.next_story_id;
        tables.stories.insert(story.id, story.clone());
        Ok(story)
    }

    async fn get_story(&self, id: StoryId) -> Result<Option<Story>> {
        Ok(self.tables.read().await.stories.get(&id).cloned())
    }

    async fn update_story(&self, mut story: Story) -> Result<Story> {
        let mut tables = self.tables.write().await;
        let slot = tables.stories.get_mut(&story.id).ok_or_else(|| not_found(story.id))?;
        story.updated_at = Utc::now();
        *slot = story.clone();
        Ok(story)
    }

    async fn delete_story(&self, id: StoryId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        tables.concepts.remove(&id);
        tables.adaptations.remove(&id);
        Ok(tables.stories.remove(&id).is_some())
    }

    async fn replace_concepts(&self, id: StoryId, concepts: Vec<StoryConcept>) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.stories.contains_key(&id) {
            return Err(not_found(id));
        }
        tables.concepts.insert(id, concepts);
        Ok(())
    }

    async fn concepts_for(&self, id: StoryId) -> Result<Vec<StoryConcept>> {
        Ok(self
            .tables
            .read()
            .await
            .concepts
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_adaptation(&self, mut adaptation: StoryAdaptation) -> Result<StoryAdaptation> {
        let mut tables = self.tables.write().await;
        if !tables.stories.contains_key(&adaptation.original_story_id) {
            return Err(not_found(adaptation.original_story_id));
        }
        tables.next_adaptation_id += 1;
        adaptation.id = tables.next_adaptation_id;
        tables
            .adaptations
            .entry(adaptation.original_story_id)
            .or_default()
            .push(adaptation.clone());
        Ok(adaptation)
    }

    async fn adaptations_for(&self, id: StoryId) -> Result<Vec<StoryAdaptation>> {
        Ok(self
            .tables
            .read()
            .await
            .adaptations
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}
