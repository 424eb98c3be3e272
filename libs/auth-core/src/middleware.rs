//! Actix middleware enforcing a valid bearer credential.
//!
//! Wrap a scope in [`RequireAuth`] and handlers inside it can take
//! [`AuthenticatedUser`] as an extractor. Verification is stateless
//! (signature + expiry); the session store is never consulted here.

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use uuid::Uuid;

use crate::{bearer_token, TokenKeys};

/// Subject identity extracted from a verified token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

/// Middleware factory carrying the verification keys.
#[derive(Clone)]
pub struct RequireAuth {
    keys: Rc<TokenKeys>,
}

impl RequireAuth {
    pub fn new(keys: TokenKeys) -> Self {
        Self { keys: Rc::new(keys) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service: Rc::new(service),
            keys: self.keys.clone(),
        }))
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
    keys: Rc<TokenKeys>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let keys = self.keys.clone();

        Box::pin(async move {
            // Read the header into an owned String before touching
            // extensions_mut so no header borrow is still alive.
            let header = match req.headers().get("Authorization") {
                Some(value) => match value.to_str() {
                    Ok(h) => h.to_string(),
                    Err(_) => return Err(ErrorUnauthorized("Invalid Authorization header")),
                },
                None => return Err(ErrorUnauthorized("Missing Authorization header")),
            };

            let token = match bearer_token(&header) {
                Some(t) => t,
                None => {
                    return Err(ErrorUnauthorized(
                        "Invalid Authorization scheme, expected Bearer",
                    ))
                }
            };

            let user_id = match keys.verify(token).and_then(|claims| claims.subject_id()) {
                Ok(id) => id,
                Err(err) => {
                    tracing::debug!(error = %err, "token verification failed");
                    return Err(ErrorUnauthorized("Invalid or expired token"));
                }
            };

            req.extensions_mut().insert(AuthenticatedUser { id: user_id });

            service.call(req).await
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Resolve the caller's identity.
    ///
    /// Inside a [`RequireAuth`] scope the middleware has already verified
    /// the token and stashed the subject in request extensions. On routes
    /// guarded per-handler instead, fall back to verifying the bearer
    /// header directly against the app's [`TokenKeys`].
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<AuthenticatedUser>().cloned() {
            return ready(Ok(user));
        }

        let keys = match req.app_data::<actix_web::web::Data<TokenKeys>>() {
            Some(keys) => keys,
            None => return ready(Err(ErrorUnauthorized("Authentication required"))),
        };

        let verified = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .and_then(|token| keys.verify(token).ok())
            .and_then(|claims| claims.subject_id().ok());

        match verified {
            Some(id) => ready(Ok(AuthenticatedUser { id })),
            None => ready(Err(ErrorUnauthorized("Invalid or expired token"))),
        }
    }
}
