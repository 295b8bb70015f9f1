use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};
use uuid::Uuid;

use crate::auth::{decode_token, AuthSettings};
use crate::errors::AppError;

/// Extractor that validates the bearer JWT and yields the owner identity
/// every transaction and analytics operation is scoped to.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let settings = match req.app_data::<web::Data<AuthSettings>>() {
            Some(settings) => settings,
            None => {
                return err(AppError::InternalError(
                    "Auth settings not configured".to_string(),
                ))
            }
        };

        // Extract token from Authorization header
        let token = match req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t.trim(),
            None => {
                return err(AppError::Unauthorized(
                    "Missing or invalid Authorization header".to_string(),
                ))
            }
        };

        match decode_token(token, settings.get_ref()) {
            Ok(claims) => ok(AuthenticatedUser {
                user_id: claims.sub,
                username: claims.username,
            }),
            Err(e) => err(e),
        }
    }
}
