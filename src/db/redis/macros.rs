/// Read-through caching on top of [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`
/// (a future yielding `AppResult<T>`), queues the value for writing with
/// `$ttl` seconds to live, and returns it. A cache read failure is logged and
/// treated as a miss, so an unavailable Redis only costs latency.
///
/// Expands to an `AppResult<T>` expression; errors from `$block` are returned
/// unchanged and nothing is cached for them.
///
/// # Example
/// ```rust,ignore
/// let entries: Vec<ForecastEntry> = cached!(cache, CacheKey::forecast(lat, lon), 1800, async {
///     fetch_forecast(lat, lon).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                None
            }
        };

        match hit {
            Some(cached) => Ok(cached),
            None => match $block.await {
                Ok(value) => {
                    $cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
