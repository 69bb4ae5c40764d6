/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`,
/// hands the computed value to the background writer with `$ttl` seconds to
/// live, and returns it. Errors from either step propagate with `?`, so the
/// enclosing function must return an `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let details: TmdbMovieDetails = cached!(
///     self.cache,
///     CacheKey::MovieDetails(tmdb_id),
///     DETAILS_CACHE_TTL,
///     async move { self.fetch_details(tmdb_id).await }
/// )?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}

/// Read-through caching for lookups that may legitimately find nothing.
///
/// Like [`cached!`], but `$block` yields an `Option` and only `Some` values are
/// written, so a miss upstream is never pinned in Redis for `$ttl` seconds.
#[macro_export]
macro_rules! cached_some {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(Some(cached))
        } else {
            let value = $block.await?;
            if let Some(found) = &value {
                $cache.set_in_background(&$key, found, $ttl);
            }
            Ok(value)
        }
    }};
}
