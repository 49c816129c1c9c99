mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::{Logger, NormalizePath}, web, App, HttpServer};
use dotenv::dotenv;
use jsonwebtoken::Algorithm;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");
    let cors_origin = env::var("CORS_ALLOWED_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    // Fail fast on JWT configuration instead of erroring per-request
    env::var("SECRET_KEY").expect("SECRET_KEY must be set");
    let algorithm = env::var("ALGORITHM")
        .expect("ALGORITHM must be set")
        .parse::<Algorithm>()
        .expect("ALGORITHM must be a supported JWT algorithm (e.g. HS256)");

    log::info!("🚀 Starting Post Service...");
    log::info!("📊 Database: {}", database_url);
    log::info!("🔐 JWT algorithm: {:?}", algorithm);

    // Initialize PostgreSQL connection pool (runs pending migrations)
    let db = database::Database::new(&database_url)
        .await
        .expect("Failed to connect to PostgreSQL");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ PostgreSQL connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            // Um texto de 1M caracteres todo em escapes \uXXXX chega perto de
            // 6 MiB de JSON; 16 MiB garante que o limite de caracteres decide
            .app_data(web::JsonConfig::default().limit(16 * 1024 * 1024))
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            // Aceita /posts/ além de /posts
            .wrap(NormalizePath::trim())
            // Swagger UI with authentication
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // NormalizePath apara /swagger-ui/ para /swagger-ui, que o padrão
            // acima não cobre; redireciona direto para o index
            .service(web::redirect("/swagger-ui", "/swagger-ui/index.html"))
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Auth endpoints
            .route("/signup", web::post().to(api::auth::signup))
            .route("/login", web::post().to(api::auth::login))
            // Posts: owned by the authenticated user - Requires JWT
            .service(
                web::scope("/posts")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::post().to(api::posts::create_post))
                    .route("", web::get().to(api::posts::list_posts))
                    .route("/{post_id}", web::delete().to(api::posts::delete_post))
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
