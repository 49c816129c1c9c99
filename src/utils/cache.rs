use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use moka::future::Cache;

use crate::models::Post;

const CACHE_TTL_SECONDS: u64 = 300; // 5 minutos
const CACHE_MAX_ENTRIES: u64 = 1000;

/// Cache em memória das listagens de posts, chaveado pelo email do usuário.
///
/// Entradas só saem por expiração do TTL; create/delete não mexem no cache,
/// então uma listagem pode ficar até 5 minutos atrás do banco.
pub struct PostCache {
    entries: Cache<String, Arc<Vec<Post>>>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::with_config(CACHE_MAX_ENTRIES, Duration::from_secs(CACHE_TTL_SECONDS))
    }

    pub fn with_config(capacity: u64, ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, email: &str) -> Option<Arc<Vec<Post>>> {
        self.entries.get(email).await
    }

    pub async fn insert(&self, email: String, posts: Vec<Post>) {
        self.entries.insert(email, Arc::new(posts)).await;
    }
}

impl Default for PostCache {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    /// Instância global usada pelo serviço de posts
    pub static ref POST_CACHE: PostCache = PostCache::new();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_post(id: i32, user_id: i32, text: &str) -> Post {
        Post {
            id,
            user_id,
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = PostCache::new();

        assert!(cache.get("a@example.com").await.is_none());

        cache
            .insert(
                "a@example.com".to_string(),
                vec![sample_post(1, 1, "hello")],
            )
            .await;

        let cached = cache.get("a@example.com").await;
        assert!(cached.is_some());
        assert_eq!(cached.unwrap()[0].text, "hello");
    }

    #[tokio::test]
    async fn test_expires_after_ttl() {
        // TTL curto para o teste
        let cache = PostCache::with_config(10, Duration::from_millis(50));

        cache
            .insert("a@example.com".to_string(), vec![sample_post(1, 1, "old")])
            .await;
        assert!(cache.get("a@example.com").await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(cache.get("a@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_keys_are_isolated_per_user() {
        let cache = PostCache::new();

        cache
            .insert("a@example.com".to_string(), vec![sample_post(1, 1, "a")])
            .await;
        cache
            .insert("b@example.com".to_string(), vec![sample_post(2, 2, "b")])
            .await;

        assert_eq!(cache.get("a@example.com").await.unwrap()[0].text, "a");
        assert_eq!(cache.get("b@example.com").await.unwrap()[0].text, "b");
        assert!(cache.get("c@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_snapshot() {
        let cache = PostCache::new();

        cache
            .insert("a@example.com".to_string(), vec![sample_post(1, 1, "v1")])
            .await;
        cache
            .insert(
                "a@example.com".to_string(),
                vec![sample_post(1, 1, "v1"), sample_post(2, 1, "v2")],
            )
            .await;

        assert_eq!(cache.get("a@example.com").await.unwrap().len(), 2);
    }
}
