use std::collections::HashMap;

use crate::models::{AgeGroup, Language, Mood};

const BUNDLED_QUERIES: &str = include_str!("../../data/music_queries.json");
const BUNDLED_FALLBACKS: &str = include_str!("../../data/music_fallback_videos.json");

/// mood → age group → language → search topics
pub type QueryTable = HashMap<Mood, HashMap<AgeGroup, HashMap<Language, Vec<String>>>>;
/// mood → age group → YouTube video id
pub type FallbackTable = HashMap<Mood, HashMap<AgeGroup, String>>;

/// Static music tables: search topics per preference tuple and fallback videos
#[derive(Debug, Clone, Default)]
pub struct MusicCatalog {
    queries: QueryTable,
    fallbacks: FallbackTable,
}

impl MusicCatalog {
    pub fn new(queries: QueryTable, fallbacks: FallbackTable) -> Self {
        Self { queries, fallbacks }
    }

    /// Loads the tables from JSON files, using the bundled tables for any path not given
    pub fn load(queries_path: Option<&str>, fallback_path: Option<&str>) -> anyhow::Result<Self> {
        let queries_json = match queries_path {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read music queries {}: {}", path, e))?,
            None => BUNDLED_QUERIES.to_string(),
        };
        let fallbacks_json = match fallback_path {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read fallback videos {}: {}", path, e))?,
            None => BUNDLED_FALLBACKS.to_string(),
        };

        Self::from_json(&queries_json, &fallbacks_json)
    }

    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_json(BUNDLED_QUERIES, BUNDLED_FALLBACKS)
    }

    pub fn from_json(queries_json: &str, fallbacks_json: &str) -> anyhow::Result<Self> {
        let queries: QueryTable = serde_json::from_str(queries_json)
            .map_err(|e| anyhow::anyhow!("Invalid music query table: {}", e))?;
        let fallbacks: FallbackTable = serde_json::from_str(fallbacks_json)
            .map_err(|e| anyhow::anyhow!("Invalid fallback video table: {}", e))?;

        let catalog = Self::new(queries, fallbacks);
        tracing::info!(
            topics = catalog.topic_count(),
            fallbacks = catalog.fallbacks.values().map(HashMap::len).sum::<usize>(),
            "Loaded music catalog"
        );

        Ok(catalog)
    }

    fn topics(&self, mood: Mood, age_group: AgeGroup, language: Language) -> &[String] {
        self.queries
            .get(&mood)
            .and_then(|by_age| by_age.get(&age_group))
            .and_then(|by_language| by_language.get(&language))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Topics for the tuple; the English list stands in when the language has none
    pub fn queries_for(&self, mood: Mood, age_group: AgeGroup, language: Language) -> &[String] {
        let topics = self.topics(mood, age_group, language);
        if topics.is_empty() && language != Language::English {
            return self.topics(mood, age_group, Language::English);
        }
        topics
    }

    pub fn fallback_for(&self, mood: Mood, age_group: AgeGroup) -> Option<&str> {
        self.fallbacks
            .get(&mood)
            .and_then(|by_age| by_age.get(&age_group))
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn topic_count(&self) -> usize {
        self.queries
            .values()
            .flat_map(HashMap::values)
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }
}
