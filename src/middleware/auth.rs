use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::{database::Database, services::auth_service, utils::error::AppError};

/// Separa "Bearer <token>" do header Authorization: exatamente duas
/// partes em um espaço, prefixo "Bearer".
fn parse_bearer(header: &str) -> Result<&str, AppError> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(prefix), Some(token), None) => {
            if prefix != "Bearer" {
                return Err(AppError::Unauthorized("Invalid token type".to_string()));
            }
            Ok(token)
        }
        _ => Err(AppError::MalformedAuthHeader(
            "Authorization header is malformed".to_string(),
        )),
    }
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    AppError::Unauthorized("Missing authorization header".to_string())
                })?;

            let token = parse_bearer(header)?;

            // Token -> claims (sub = email)
            let claims = auth_service::verify_token(token)?;

            // O usuário do token precisa existir no banco
            let db = req
                .app_data::<web::Data<Database>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Database not configured".to_string()))?;

            let user = auth_service::find_user_by_email(db.get_ref(), &claims.sub)
                .await?
                .ok_or_else(|| {
                    log::warn!("⚠️ Token for unknown user: {}", claims.sub);
                    AppError::Unauthorized("Invalid credentials".to_string())
                })?;

            req.extensions_mut().insert(user);

            service.call(req).await
        })
    }
}
