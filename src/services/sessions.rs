use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::rotation::{RotationTracker, ShownSet, TOPIC_SWITCH_CHANCE};

/// Discover page cursor and shown movies for one session
#[derive(Debug, Clone)]
pub struct MovieCursor {
    pub page: u32,
    pub shown: ShownSet<u64>,
}

impl Default for MovieCursor {
    fn default() -> Self {
        Self {
            page: 1,
            shown: ShownSet::new(),
        }
    }
}

/// Per-query page cursors and shown anime for one session
#[derive(Debug, Clone, Default)]
pub struct AnimeCursor {
    pub pages: HashMap<String, u32>,
    pub shown: ShownSet<i64>,
}

impl AnimeCursor {
    pub fn page_for(&self, cursor_key: &str) -> u32 {
        self.pages.get(cursor_key).copied().unwrap_or(1)
    }
}

/// Everything remembered between requests of one user
#[derive(Debug)]
pub struct SessionState {
    pub music: RotationTracker,
    pub movies: MovieCursor,
    pub anime: AnimeCursor,
    /// Set when the movie catalog failed its availability check
    pub service_unavailable: bool,
    pub last_seen: DateTime<Utc>,
}

impl SessionState {
    fn new(music: RotationTracker) -> Self {
        Self {
            music,
            movies: MovieCursor::default(),
            anime: AnimeCursor::default(),
            service_unavailable: false,
            last_seen: Utc::now(),
        }
    }

    /// Clears rotation, shown items, page cursors and the unavailable flag
    pub fn reset(&mut self) {
        self.music.reset();
        self.movies = MovieCursor::default();
        self.anime = AnimeCursor::default();
        self.service_unavailable = false;
    }
}

/// In-memory session registry shared by all handlers
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionState>>>,
    topic_switch_chance: f64,
    rng_seed: Option<u64>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            topic_switch_chance: TOPIC_SWITCH_CHANCE,
            rng_seed: None,
        }
    }

    /// Makes music rotation reproducible: fixed seed and early-switch chance
    pub fn with_deterministic_rotation(mut self, seed: u64, switch_chance: f64) -> Self {
        self.rng_seed = Some(seed);
        self.topic_switch_chance = switch_chance;
        self
    }

    fn new_tracker(&self) -> RotationTracker {
        let tracker = match self.rng_seed {
            Some(seed) => RotationTracker::with_rng(StdRng::seed_from_u64(seed)),
            None => RotationTracker::new(),
        };
        tracker.with_switch_chance(self.topic_switch_chance)
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let state = SessionState::new(self.new_tracker());

        let mut inner = self.inner.write().await;
        inner.insert(id, state);

        tracing::info!(session_id = %id, sessions = inner.len(), "Session created");
        id
    }

    /// Runs `f` against the session and marks it as used
    ///
    /// The lock is held only while `f` runs, so `f` must not perform I/O.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> AppResult<R> {
        let mut inner = self.inner.write().await;
        let state = inner
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;

        state.last_seen = Utc::now();
        Ok(f(state))
    }

    pub async fn reset(&self, id: Uuid) -> AppResult<()> {
        self.with_session(id, SessionState::reset).await?;
        tracing::info!(session_id = %id, "Session reset");
        Ok(())
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.inner.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Drops sessions unused for longer than `max_idle`, returns how many were dropped
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut inner = self.inner.write().await;
        let before = inner.len();
        inner.retain(|_, state| state.last_seen >= cutoff);
        let pruned = before - inner.len();

        if pruned > 0 {
            tracing::info!(pruned, remaining = inner.len(), "Pruned idle sessions");
        }
        pruned
    }

    /// Prunes idle sessions every `interval` until the task is aborted
    pub fn spawn_idle_sweeper(
        &self,
        max_idle: Duration,
        interval: std::time::Duration,
    ) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                store.prune_idle(max_idle).await;
            }
        })
    }
}
