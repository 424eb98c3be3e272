//! Coarse per-IP rate limiting: a fixed INCR/EXPIRE window in redis.
//!
//! The limiter fails open. A redis outage or slow reply must never turn the
//! rate limiter itself into the platform's point of failure, so any error on
//! the counter path logs a warning and lets the request through.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures::future::{ready, Ready};

use redis_store::keys::RateLimitKey;
use redis_store::{ops, SharedConnectionManager};

#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    pub max_requests: u64,
    pub window_seconds: u64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_seconds: 900,
        }
    }
}

pub struct RateLimit {
    policy: RateLimitPolicy,
    redis: SharedConnectionManager,
}

impl RateLimit {
    pub fn new(policy: RateLimitPolicy, redis: SharedConnectionManager) -> Self {
        Self { policy, redis }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service: Rc::new(service),
            policy: self.policy.clone(),
            redis: self.redis.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    policy: RateLimitPolicy,
    redis: SharedConnectionManager,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let policy = self.policy.clone();
        let redis = self.redis.clone();

        Box::pin(async move {
            let addr = req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string();
            let key = RateLimitKey::client(&addr);

            match ops::incr_fixed_window(&redis, &key, policy.window_seconds).await {
                Ok(count) if count > policy.max_requests => {
                    return Err(actix_web::error::ErrorTooManyRequests(format!(
                        "Rate limit exceeded: {} requests per {} seconds",
                        policy.max_requests, policy.window_seconds
                    )));
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(key, error = %err, "rate limit counter failed, allowing request");
                }
            }

            service.call(req).await
        })
    }
}
