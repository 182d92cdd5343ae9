//! Redis cache keys and freshness rules for Places API payloads.
//!
//! Nearby-search keys round coordinates to a two-decimal grid (~1.1 km)
//! so queries from the same neighborhood share a bucket. Payloads carry
//! their own `cached_at` timestamp: the Redis TTL already evicts stale
//! entries, but the freshness guard also protects against a TTL being
//! lengthened in config after entries were written.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use paws_shared::clients::redis::RedisClient;
use paws_shared::types::geo::round_coord;

#[derive(Debug, Serialize, Deserialize)]
pub struct CachedPayload<T> {
    pub cached_at: i64,
    pub data: T,
}

pub fn is_fresh(cached_at: i64, ttl_secs: u64, now: i64) -> bool {
    cached_at + ttl_secs as i64 > now
}

pub fn nearby_key(lat: f64, lng: f64, radius_km: f64) -> String {
    // Radius buckets are whole kilometers, rounded up
    let radius_bucket = radius_km.ceil() as u32;
    format!(
        "places:nearby:{:.2}:{:.2}:{}",
        round_coord(lat, 2),
        round_coord(lng, 2),
        radius_bucket
    )
}

pub fn details_key(place_id: &str) -> String {
    format!("places:details:{place_id}")
}

pub fn autocomplete_key(query: &str) -> String {
    let normalized = query.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("places:autocomplete:{}", hex::encode(digest))
}

/// Fetch a payload from Redis if present and still fresh. Cache errors
/// degrade to a miss; the source of truth is the Places API.
pub async fn get_fresh<T: DeserializeOwned>(
    redis: &RedisClient,
    key: &str,
    ttl_secs: u64,
) -> Option<T> {
    let raw = match redis.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "cache read failed");
            return None;
        }
    };

    let payload: CachedPayload<T> = match serde_json::from_str(&raw) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, key = %key, "cache payload corrupt, ignoring");
            return None;
        }
    };

    if is_fresh(payload.cached_at, ttl_secs, chrono::Utc::now().timestamp()) {
        Some(payload.data)
    } else {
        None
    }
}

/// Store a payload with the configured TTL. Best-effort.
pub async fn store<T: Serialize>(redis: &RedisClient, key: &str, ttl_secs: u64, data: &T) {
    let payload = CachedPayload {
        cached_at: chrono::Utc::now().timestamp(),
        data,
    };
    match serde_json::to_string(&payload) {
        Ok(raw) => {
            if let Err(e) = redis.set(key, &raw, ttl_secs).await {
                tracing::warn!(error = %e, key = %key, "cache write failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, key = %key, "cache payload serialization failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_within_ttl_stale_after() {
        let cached_at = 1_000;
        assert!(is_fresh(cached_at, 600, 1_000));
        assert!(is_fresh(cached_at, 600, 1_599));
        assert!(!is_fresh(cached_at, 600, 1_600));
        assert!(!is_fresh(cached_at, 600, 2_000));
    }

    #[test]
    fn nearby_queries_share_a_grid_bucket() {
        let a = nearby_key(48.8561, 2.3528, 5.0);
        let b = nearby_key(48.8599, 2.3541, 5.0);
        assert_eq!(a, b, "same ~1 km cell and radius map to the same key");

        let far = nearby_key(48.90, 2.35, 5.0);
        assert_ne!(a, far);

        let other_radius = nearby_key(48.8561, 2.3528, 10.0);
        assert_ne!(a, other_radius);
    }

    #[test]
    fn radius_buckets_round_up() {
        assert_eq!(nearby_key(0.0, 0.0, 4.2), nearby_key(0.0, 0.0, 5.0));
        assert_ne!(nearby_key(0.0, 0.0, 5.0), nearby_key(0.0, 0.0, 5.1));
    }

    #[test]
    fn autocomplete_key_normalizes_the_query() {
        assert_eq!(autocomplete_key("  Dog Park  "), autocomplete_key("dog park"));
        assert_ne!(autocomplete_key("dog park"), autocomplete_key("dog beach"));
    }
}
