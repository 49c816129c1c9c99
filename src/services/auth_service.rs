// ==================== AUTHENTICATION ====================
// Cadastro e login com senha bcrypt + emissão/validação de tokens JWT
// Claims do token: sub = email do usuário, exp = expiração

use crate::{database::Database, models::User, utils::error::AppError};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // email
    pub exp: usize,  // expiration
}

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

// ==================== JWT ====================

fn jwt_secret() -> Result<String, AppError> {
    env::var("SECRET_KEY").map_err(|_| AppError::Internal("SECRET_KEY not set".to_string()))
}

fn jwt_algorithm() -> Result<Algorithm, AppError> {
    let name = env::var("ALGORITHM").map_err(|_| AppError::Internal("ALGORITHM not set".to_string()))?;
    name.parse::<Algorithm>()
        .map_err(|_| AppError::Internal(format!("Unsupported JWT algorithm: {}", name)))
}

/// Gera o token de acesso. Sem validade explícita o token dura 1 dia.
pub fn create_access_token(email: &str, expires_in: Option<Duration>) -> Result<String, AppError> {
    let expire = Utc::now() + expires_in.unwrap_or_else(|| Duration::days(1));

    let claims = Claims {
        sub: email.to_string(),
        exp: expire.timestamp() as usize,
    };

    encode_token(&claims, &jwt_secret()?, jwt_algorithm()?)
}

/// Valida o token e devolve as claims
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    decode_token(token, &jwt_secret()?, jwt_algorithm()?)
}

fn encode_token(claims: &Claims, secret: &str, algorithm: Algorithm) -> Result<String, AppError> {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

fn decode_token(token: &str, secret: &str, algorithm: Algorithm) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(algorithm),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token has expired".to_string())
        }
        _ => AppError::Unauthorized("Invalid token claims".to_string()),
    })
}

// ==================== VALIDATION ====================

/// Validação pragmática de email (local@dominio.tld)
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && email.len() <= 254
        }
        None => false,
    }
}

// ==================== DATABASE ====================

pub async fn find_user_by_email(db: &Database, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, hashed_password, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(db.pool())
    .await?;

    Ok(user)
}

async fn insert_user(db: &Database, email: &str, hashed_password: &str) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, hashed_password) VALUES ($1, $2) \
         RETURNING id, email, hashed_password, created_at",
    )
    .bind(email)
    .bind(hashed_password)
    .fetch_one(db.pool())
    .await
    .map_err(|e| match &e {
        // Corrida entre o pre-check e o INSERT: mesmo resultado do pre-check
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::InvalidRequest("Email already registered".to_string())
        }
        _ => AppError::DatabaseError(e.to_string()),
    })
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /signup - Cria o usuário e devolve um token de 1 hora
pub async fn signup(db: &Database, request: &SignupRequest) -> Result<TokenResponse, AppError> {
    // 1. Validar entrada
    if !is_valid_email(&request.email) {
        return Err(AppError::InvalidRequest("Invalid email address".to_string()));
    }

    if request.password.chars().count() < 8 {
        return Err(AppError::InvalidRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // 2. Email precisa ser único
    if find_user_by_email(db, &request.email).await?.is_some() {
        return Err(AppError::InvalidRequest("Email already registered".to_string()));
    }

    // 3. Hash da senha e insert
    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = insert_user(db, &request.email, &hashed_password).await?;

    log::info!("✅ User registered: {}", user.email);

    // 4. Token de acesso (1 hora)
    let access_token = create_access_token(&user.email, Some(Duration::hours(1)))?;

    Ok(TokenResponse::bearer(access_token))
}

/// POST /login - Autentica e devolve um token de 1 hora
pub async fn login(db: &Database, request: &LoginRequest) -> Result<TokenResponse, AppError> {
    let user = find_user_by_email(db, &request.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&request.password, &user.hashed_password)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let access_token = create_access_token(&user.email, Some(Duration::hours(1)))?;

    Ok(TokenResponse::bearer(access_token))
}
