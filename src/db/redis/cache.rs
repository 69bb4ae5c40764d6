use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieDetails(u64),
    AlternativeTitles(u64),
    WatchProviders(u64),
    Certification(u64),
    OmdbDetails(String),
    SeasonalAnime(i32, String),
    TopAnime(u32),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetails(id) => write!(f, "tmdb:movie:{}", id),
            CacheKey::AlternativeTitles(id) => write!(f, "tmdb:alt:{}", id),
            CacheKey::WatchProviders(id) => write!(f, "tmdb:providers:{}", id),
            CacheKey::Certification(id) => write!(f, "tmdb:cert:{}", id),
            CacheKey::OmdbDetails(imdb_id) => write!(f, "omdb:{}", imdb_id.to_lowercase()),
            CacheKey::SeasonalAnime(year, season) => {
                write!(f, "jikan:season:{}:{}", year, season.to_lowercase())
            }
            CacheKey::TopAnime(page) => write!(f, "jikan:top:{}", page),
        }
    }
}

/// Creates a Redis client for caching
///
/// Establishes a connection to Redis for fast data caching.
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving catalog lookups in Redis
///
/// A disabled cache (no Redis configured) misses on every read and drops
/// every write.
#[derive(Clone)]
pub struct Cache {
    redis_client: Option<Client>,
    write_tx: Option<mpsc::UnboundedSender<CacheWriteMessage>>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Gracefully shuts down the cache writer
    ///
    /// Signals the writer task and waits until it has flushed all pending
    /// writes to Redis and exited.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task failed during shutdown");
        }
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// This spawns a background task that processes cache writes asynchronously,
    /// preventing cache operations from blocking API responses.
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client: Some(redis_client),
            write_tx: Some(write_tx),
        };

        let handle = CacheWriterHandle {
            shutdown_tx,
            writer,
        };

        (cache, handle)
    }

    /// Creates a cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            redis_client: None,
            write_tx: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.redis_client.is_some()
    }

    /// Background task that processes cache write messages
    ///
    /// On shutdown signal the channel is closed and the remaining buffered
    /// messages are flushed before the task exits.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    write_rx.close();
                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    /// Writes a single message to Redis
    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` on a miss, when caching is disabled, or when Redis cannot
    /// be reached. A stored value that no longer deserializes is an error.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let Some(client) = &self.redis_client else {
            return Ok(None);
        };

        let cached: Option<String> = match Self::read_from_redis(client, key).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Redis read failed, treating as cache miss");
                None
            }
        };

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                tracing::debug!(key = %key, "Cache hit");
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    async fn read_from_redis(client: &Client, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(format!("{}", key)).await?;
        Ok(cached)
    }

    /// Stores a value in the cache asynchronously without blocking
    ///
    /// The value is serialized and handed to the background writer; this
    /// method returns immediately without waiting for the write to complete.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let Some(write_tx) = &self.write_tx else {
            return;
        };

        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if let Err(e) = write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}
