// ==================== POSTS ====================
// CRUD de posts do usuário autenticado + cache de listagem (TTL 5 min)

use crate::{
    database::Database,
    models::{Post, User},
    utils::cache::POST_CACHE,
    utils::error::AppError,
};
use serde::{Deserialize, Serialize};

/// Limite do texto em caracteres (1 MB)
const MAX_TEXT_CHARS: usize = 1_048_576;

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PostRequest {
    pub text: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub text: String,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            text: post.text.clone(),
        }
    }
}

// ==================== VALIDATION ====================

fn validate_text(text: &str) -> Result<(), AppError> {
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::InvalidRequest(
            "Post text must not exceed 1048576 characters".to_string(),
        ));
    }
    Ok(())
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /posts - Cria um post para o usuário autenticado
pub async fn create_post(
    db: &Database,
    user: &User,
    request: &PostRequest,
) -> Result<PostResponse, AppError> {
    // 1. Validar tamanho do texto
    validate_text(&request.text)?;

    // 2. Insert
    let post = sqlx::query_as::<_, Post>(
        "INSERT INTO posts (user_id, text) VALUES ($1, $2) \
         RETURNING id, user_id, text, created_at",
    )
    .bind(user.id)
    .bind(&request.text)
    .fetch_one(db.pool())
    .await?;

    log::info!("✅ Post {} created for {}", post.id, user.email);

    // Uma listagem em cache continua valendo até o TTL expirar
    Ok(PostResponse::from(&post))
}

/// GET /posts - Lista os posts do usuário, com cache de 5 minutos
pub async fn list_posts(db: &Database, user: &User) -> Result<Vec<PostResponse>, AppError> {
    // 1. Tenta o cache primeiro
    if let Some(cached) = POST_CACHE.get(&user.email).await {
        log::debug!(
            "📦 Returning cached posts for {} ({} posts)",
            user.email,
            cached.len()
        );
        return Ok(cached.iter().map(PostResponse::from).collect());
    }

    // 2. Cache miss: busca no banco
    let posts = sqlx::query_as::<_, Post>(
        "SELECT id, user_id, text, created_at FROM posts WHERE user_id = $1 ORDER BY id",
    )
    .bind(user.id)
    .fetch_all(db.pool())
    .await?;

    let response: Vec<PostResponse> = posts.iter().map(PostResponse::from).collect();

    // 3. Alimenta o cache para as próximas listagens
    POST_CACHE.insert(user.email.clone(), posts).await;
    log::debug!(
        "💾 Cached posts for {} ({} posts)",
        user.email,
        response.len()
    );

    Ok(response)
}

/// DELETE /posts/{post_id} - Remove um post do próprio usuário
pub async fn delete_post(db: &Database, user: &User, post_id: i32) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user.id)
        .execute(db.pool())
        .await?;

    // Post inexistente ou de outro usuário: mesma resposta
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    log::info!("🗑️ Post {} deleted by {}", post_id, user.email);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_at_limit_accepted() {
        assert!(validate_text(&"a".repeat(MAX_TEXT_CHARS)).is_ok());
    }

    #[test]
    fn test_text_over_limit_rejected() {
        match validate_text(&"a".repeat(MAX_TEXT_CHARS + 1)) {
            Err(AppError::InvalidRequest(msg)) => assert!(msg.contains("1048576")),
            other => panic!("expected invalid request, got {:?}", other),
        }
    }

    #[test]
    fn test_text_limit_counts_characters_not_bytes() {
        // "á" ocupa 2 bytes em UTF-8
        let text = "á".repeat(MAX_TEXT_CHARS);
        assert!(text.len() > MAX_TEXT_CHARS);
        assert!(validate_text(&text).is_ok());
    }

    fn unique_email(tag: &str) -> String {
        format!("{}+{}@example.com", tag, chrono::Utc::now().timestamp_micros())
    }

    async fn test_db() -> Database {
        dotenv::dotenv().ok();
        let url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("TEST_DATABASE_URL or DATABASE_URL must be set");
        Database::new(&url).await.expect("PostgreSQL must be reachable")
    }

    async fn create_test_user(db: &Database, email: &str) -> User {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, hashed_password) VALUES ($1, $2) \
             RETURNING id, email, hashed_password, created_at",
        )
        .bind(email)
        .bind("$2b$12$not.a.real.hash.for.tests")
        .fetch_one(db.pool())
        .await
        .expect("failed to insert test user")
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL to be running
    async fn test_create_list_delete_roundtrip() {
        let db = test_db().await;
        let user = create_test_user(&db, &unique_email("roundtrip")).await;

        let created = create_post(
            &db,
            &user,
            &PostRequest {
                text: "first post".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.text, "first post");

        let listed = list_posts(&db, &user).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);

        delete_post(&db, &user, created.id).await.unwrap();

        // Segunda remoção: o post já não existe
        match delete_post(&db, &user, created.id).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Post not found"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL to be running
    async fn test_cannot_delete_another_users_post() {
        let db = test_db().await;
        let owner = create_test_user(&db, &unique_email("owner")).await;
        let intruder = create_test_user(&db, &unique_email("intruder")).await;

        let post = create_post(
            &db,
            &owner,
            &PostRequest {
                text: "mine".to_string(),
            },
        )
        .await
        .unwrap();

        match delete_post(&db, &intruder, post.id).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Post not found"),
            other => panic!("expected not found, got {:?}", other),
        }

        // O post do dono continua lá
        let listed = list_posts(&db, &owner).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL to be running
    async fn test_listing_stays_stale_after_mutation() {
        let db = test_db().await;
        let user = create_test_user(&db, &unique_email("stale")).await;

        create_post(
            &db,
            &user,
            &PostRequest {
                text: "first".to_string(),
            },
        )
        .await
        .unwrap();

        // Primeira listagem alimenta o cache
        let first = list_posts(&db, &user).await.unwrap();
        assert_eq!(first.len(), 1);

        create_post(
            &db,
            &user,
            &PostRequest {
                text: "second".to_string(),
            },
        )
        .await
        .unwrap();

        // Dentro do TTL a listagem vem do cache, sem o post novo
        let second = list_posts(&db, &user).await.unwrap();
        assert_eq!(second.len(), 1);

        // Direto no banco já são 2
        let rows = sqlx::query_as::<_, Post>(
            "SELECT id, user_id, text, created_at FROM posts WHERE user_id = $1 ORDER BY id",
        )
        .bind(user.id)
        .fetch_all(db.pool())
        .await
        .unwrap();
        assert_eq!(rows.len(), 2);
    }
}
