use std::sync::Arc;
use std::time::Duration;

use retro_api::{
    config::Config,
    db::{create_redis_client, Cache, CacheWriterHandle},
    routes::{create_router, AppState},
    services::{
        providers::{JikanProvider, OmdbProvider, TmdbProvider, YouTubeProvider},
        AnimeRecommender, MovieRecommender, MusicCatalog, MusicRecommender, SessionStore,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How often idle sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("retro_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    config.warn_missing_credentials();

    let (cache, cache_handle) = connect_cache(&config).await?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let catalog = MusicCatalog::load(
        config.music_queries_path.as_deref(),
        config.music_fallback_path.as_deref(),
    )?;

    let tmdb = TmdbProvider::new(
        http_client.clone(),
        cache.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_access_token.clone(),
        config.tmdb_api_url.clone(),
    );
    let omdb = OmdbProvider::new(
        http_client.clone(),
        cache.clone(),
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
    );
    let youtube = YouTubeProvider::new(
        http_client.clone(),
        config.youtube_api_key.clone(),
        config.youtube_api_url.clone(),
    );
    let jikan = JikanProvider::new(http_client, cache, config.jikan_api_url.clone());

    let sessions = SessionStore::new();
    let sweeper = sessions.spawn_idle_sweeper(
        chrono::Duration::seconds(config.session_idle_secs as i64),
        SESSION_SWEEP_INTERVAL,
    );

    let state = AppState {
        sessions,
        music: MusicRecommender::new(Arc::new(youtube), Arc::new(catalog)),
        movies: MovieRecommender::new(Arc::new(tmdb), Arc::new(omdb)),
        anime: AnimeRecommender::new(Arc::new(jikan)),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Redis-backed cache when `REDIS_URL` is set, a disabled cache otherwise
async fn connect_cache(config: &Config) -> anyhow::Result<(Cache, Option<CacheWriterHandle>)> {
    match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            let (cache, handle) = Cache::new(client).await;
            tracing::info!("Redis cache enabled");
            Ok((cache, Some(handle)))
        }
        None => {
            tracing::info!("REDIS_URL not set, caching disabled");
            Ok((Cache::disabled(), None))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
