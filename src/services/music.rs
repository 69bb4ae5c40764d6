use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        validate_age, watch_url, AgeGroup, Language, Mood, MusicRecommendation, VideoHit,
        VideoSource,
    },
    services::{
        music_catalog::MusicCatalog, providers::VideoSearch, query_builder::MusicSearchQuery,
        sessions::SessionStore,
    },
};

pub const SEARCH_FAILED_WARNING: &str = "YouTube API request failed. Using fallback video.";
pub const NO_MUSIC_FOUND: &str = "No music found. Please try different preferences.";

/// Rotation key for one preference combination, e.g. `Happy-kids-English`
pub fn rotation_key(mood: Mood, age_group: AgeGroup, language: Language) -> String {
    format!("{}-{}-{}", mood, age_group, language)
}

/// Picks one music video per request for a mood, age and language
///
/// Topics rotate per session, results within a topic are walked in ranking
/// order, and a static fallback video covers empty searches and API failures.
#[derive(Clone)]
pub struct MusicRecommender {
    videos: Arc<dyn VideoSearch>,
    catalog: Arc<MusicCatalog>,
}

impl MusicRecommender {
    pub fn new(videos: Arc<dyn VideoSearch>, catalog: Arc<MusicCatalog>) -> Self {
        Self { videos, catalog }
    }

    pub async fn recommend(
        &self,
        sessions: &SessionStore,
        session_id: Uuid,
        mood: Mood,
        age: u32,
        language: Language,
    ) -> AppResult<MusicRecommendation> {
        let age_group = AgeGroup::from_age(validate_age(age)?);
        let topics = self.catalog.queries_for(mood, age_group, language).to_vec();
        let key = rotation_key(mood, age_group, language);

        let step = sessions
            .with_session(session_id, |session| session.music.next(&key, &topics))
            .await?;

        let Some(step) = step else {
            tracing::warn!(key = %key, "No search topics configured, using fallback video");
            return self.fallback(mood, age_group, language, None);
        };

        let query = MusicSearchQuery::new(step.topic.clone(), language);
        match self.search_with_retry(&query).await {
            Ok(hits) if step.result_index >= hits.len() && !hits.is_empty() => {
                tracing::info!(
                    key = %key,
                    topic = %step.topic,
                    result_index = step.result_index,
                    hits = hits.len(),
                    "Topic results exhausted, using fallback"
                );
                self.fallback(mood, age_group, language, None)
            }
            Ok(mut hits) if !hits.is_empty() => {
                let hit = hits.swap_remove(step.result_index);

                tracing::info!(
                    session_id = %session_id,
                    key = %key,
                    topic = %step.topic,
                    result_index = step.result_index,
                    video_id = %hit.video_id,
                    "Music recommended"
                );

                Ok(Self::from_hit(hit, mood, age_group, language, step.topic))
            }
            Ok(_) => {
                tracing::info!(key = %key, topic = %step.topic, "Search returned no videos, using fallback");
                self.fallback(mood, age_group, language, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %key, topic = %step.topic, "Music search failed");
                self.fallback(mood, age_group, language, Some(SEARCH_FAILED_WARNING))
            }
        }
    }

    /// Searches with the language filter, then once more without it if nothing came back
    async fn search_with_retry(&self, query: &MusicSearchQuery) -> AppResult<Vec<VideoHit>> {
        let hits = self.videos.search_music(query).await?;
        if !hits.is_empty() || query.relevance_language.is_none() {
            return Ok(hits);
        }

        tracing::debug!(query = %query.query, "Retrying music search without language filter");
        self.videos.search_music(&query.without_language()).await
    }

    fn from_hit(
        hit: VideoHit,
        mood: Mood,
        age_group: AgeGroup,
        language: Language,
        topic: String,
    ) -> MusicRecommendation {
        MusicRecommendation {
            watch_url: watch_url(&hit.video_id),
            video_id: hit.video_id,
            title: hit.title,
            channel: hit.channel,
            mood,
            age_group,
            language,
            query: Some(topic),
            source: VideoSource::Search,
            warning: None,
        }
    }

    fn fallback(
        &self,
        mood: Mood,
        age_group: AgeGroup,
        language: Language,
        warning: Option<&str>,
    ) -> AppResult<MusicRecommendation> {
        let video_id = self
            .catalog
            .fallback_for(mood, age_group)
            .ok_or_else(|| AppError::NotFound(NO_MUSIC_FOUND.to_string()))?;

        Ok(MusicRecommendation {
            video_id: video_id.to_string(),
            watch_url: watch_url(video_id),
            title: None,
            channel: None,
            mood,
            age_group,
            language,
            query: None,
            source: VideoSource::Fallback,
            warning: warning.map(String::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockVideoSearch;
    use mockall::predicate::function;

    const QUERIES: &str = r#"{
        "Happy": {
            "adults": {"English": ["feel good pop hits"], "Tamil": ["tamil kuthu songs"]},
            "kids": {"English": []}
        }
    }"#;

    const FALLBACKS: &str = r#"{
        "Happy": {"adults": "ZbZSe6N_BXs"}
    }"#;

    fn catalog() -> Arc<MusicCatalog> {
        Arc::new(MusicCatalog::from_json(QUERIES, FALLBACKS).unwrap())
    }

    fn hits(ids: &[&str]) -> Vec<VideoHit> {
        ids.iter()
            .map(|id| VideoHit {
                video_id: id.to_string(),
                title: Some(format!("Video {}", id)),
                channel: Some("Channel".to_string()),
            })
            .collect()
    }

    async fn session() -> (SessionStore, Uuid) {
        let store = SessionStore::new().with_deterministic_rotation(11, 0.0);
        let id = store.create().await;
        (store, id)
    }

    #[tokio::test]
    async fn test_walks_results_of_topic() {
        let mut videos = MockVideoSearch::new();
        videos
            .expect_search_music()
            .returning(|_| Ok(hits(&["a", "b", "c"])));

        let recommender = MusicRecommender::new(Arc::new(videos), catalog());
        let (store, id) = session().await;

        let mut seen = Vec::new();
        for _ in 0..3 {
            let rec = recommender
                .recommend(&store, id, Mood::Happy, 30, Language::English)
                .await
                .unwrap();
            assert_eq!(rec.source, VideoSource::Search);
            assert_eq!(rec.query.as_deref(), Some("feel good pop hits"));
            seen.push(rec.video_id);
        }
        assert_eq!(seen, vec!["a", "b", "c"]);

        // Past the last hit the fallback video is served, not a repeat
        let rec = recommender
            .recommend(&store, id, Mood::Happy, 30, Language::English)
            .await
            .unwrap();
        assert_eq!(rec.source, VideoSource::Fallback);
        assert_eq!(rec.video_id, "ZbZSe6N_BXs");
        assert_eq!(rec.warning, None);
    }

    #[tokio::test]
    async fn test_single_hit_is_not_repeated() {
        let mut videos = MockVideoSearch::new();
        videos
            .expect_search_music()
            .returning(|_| Ok(hits(&["only"])));

        let recommender = MusicRecommender::new(Arc::new(videos), catalog());
        let (store, id) = session().await;

        let first = recommender
            .recommend(&store, id, Mood::Happy, 30, Language::English)
            .await
            .unwrap();
        assert_eq!(first.video_id, "only");

        let second = recommender
            .recommend(&store, id, Mood::Happy, 30, Language::English)
            .await
            .unwrap();
        assert_eq!(second.source, VideoSource::Fallback);
        assert_ne!(second.video_id, "only");
    }

    #[tokio::test]
    async fn test_regional_language_retries_without_filter() {
        let mut videos = MockVideoSearch::new();
        videos
            .expect_search_music()
            .with(function(|q: &MusicSearchQuery| q.relevance_language == Some("ta")))
            .times(1)
            .returning(|_| Ok(vec![]));
        videos
            .expect_search_music()
            .with(function(|q: &MusicSearchQuery| q.relevance_language.is_none()))
            .times(1)
            .returning(|_| Ok(hits(&["t1"])));

        let recommender = MusicRecommender::new(Arc::new(videos), catalog());
        let (store, id) = session().await;

        let rec = recommender
            .recommend(&store, id, Mood::Happy, 30, Language::Tamil)
            .await
            .unwrap();

        assert_eq!(rec.video_id, "t1");
        assert_eq!(rec.query.as_deref(), Some("tamil kuthu songs"));
        assert_eq!(rec.watch_url, "https://www.youtube.com/watch?v=t1");
    }

    #[tokio::test]
    async fn test_api_failure_uses_fallback_with_warning() {
        let mut videos = MockVideoSearch::new();
        videos
            .expect_search_music()
            .returning(|_| Err(AppError::ExternalApi("quota exceeded".to_string())));

        let recommender = MusicRecommender::new(Arc::new(videos), catalog());
        let (store, id) = session().await;

        let rec = recommender
            .recommend(&store, id, Mood::Happy, 40, Language::English)
            .await
            .unwrap();

        assert_eq!(rec.source, VideoSource::Fallback);
        assert_eq!(rec.video_id, "ZbZSe6N_BXs");
        assert_eq!(rec.warning.as_deref(), Some(SEARCH_FAILED_WARNING));
        assert_eq!(rec.query, None);
    }

    #[tokio::test]
    async fn test_empty_search_uses_fallback_without_warning() {
        let mut videos = MockVideoSearch::new();
        videos.expect_search_music().returning(|_| Ok(vec![]));

        let recommender = MusicRecommender::new(Arc::new(videos), catalog());
        let (store, id) = session().await;

        let rec = recommender
            .recommend(&store, id, Mood::Happy, 40, Language::English)
            .await
            .unwrap();

        assert_eq!(rec.source, VideoSource::Fallback);
        assert_eq!(rec.warning, None);
    }

    #[tokio::test]
    async fn test_no_topics_and_no_fallback_is_not_found() {
        let mut videos = MockVideoSearch::new();
        videos.expect_search_music().never();

        let recommender = MusicRecommender::new(Arc::new(videos), catalog());
        let (store, id) = session().await;

        let result = recommender
            .recommend(&store, id, Mood::Happy, 8, Language::English)
            .await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, NO_MUSIC_FOUND),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_age_is_rejected() {
        let recommender = MusicRecommender::new(Arc::new(MockVideoSearch::new()), catalog());
        let (store, id) = session().await;

        let result = recommender
            .recommend(&store, id, Mood::Happy, 0, Language::English)
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let recommender = MusicRecommender::new(Arc::new(MockVideoSearch::new()), catalog());
        let store = SessionStore::new();

        let result = recommender
            .recommend(&store, Uuid::new_v4(), Mood::Happy, 30, Language::English)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_rotation_key() {
        assert_eq!(
            rotation_key(Mood::Sad, AgeGroup::Teens, Language::Malayalam),
            "Sad-teens-Malayalam"
        );
    }
}
