use actix_web::{web, HttpResponse, ResponseError};

use crate::services::post_service::{self, PostRequest, PostResponse};
use crate::{database::Database, models::User};

/// POST /posts - Cria um post para o usuário autenticado
#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Post text exceeds the size limit"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_post(
    user: web::ReqData<User>,
    db: web::Data<Database>,
    request: web::Json<PostRequest>,
) -> HttpResponse {
    log::info!("📝 POST /posts - user: {}", user.email);

    match post_service::create_post(&db, &user, &request).await {
        Ok(response) => {
            log::info!("✅ Post created: {}", response.id);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Failed to create post for {}: {}", user.email, e);
            e.error_response()
        }
    }
}

/// GET /posts - Lista os posts do usuário autenticado
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    responses(
        (status = 200, description = "Posts of the authenticated user", body = [PostResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_posts(user: web::ReqData<User>, db: web::Data<Database>) -> HttpResponse {
    log::info!("📋 GET /posts - user: {}", user.email);

    match post_service::list_posts(&db, &user).await {
        Ok(response) => {
            log::info!("✅ Listed {} posts", response.len());
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::error!("❌ Error listing posts for {}: {}", user.email, e);
            e.error_response()
        }
    }
}

/// DELETE /posts/{post_id} - Remove um post do usuário autenticado
#[utoipa::path(
    delete,
    path = "/posts/{post_id}",
    tag = "Posts",
    params(
        ("post_id" = i32, Path, description = "Post identifier")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Post not found or owned by another user")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_post(
    user: web::ReqData<User>,
    db: web::Data<Database>,
    post_id: web::Path<i32>,
) -> HttpResponse {
    log::info!("🗑️ DELETE /posts/{} - user: {}", post_id, user.email);

    match post_service::delete_post(&db, &user, post_id.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            log::warn!("❌ Failed to delete post for {}: {}", user.email, e);
            e.error_response()
        }
    }
}
