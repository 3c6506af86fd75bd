use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use goodslink_core::Actor;
use serde::Serialize;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

const API_KEYS_VAR: &str = "GOODSLINK_API_KEYS";
const ACTOR_HEADER: &str = "x-actor-id";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Clone)]
struct ApiKey {
    actor_id: i64,
    token: String,
}

/// Bearer-token to actor mapping used by [`resolve_actor`].
#[derive(Clone)]
pub struct AuthState {
    api_keys: Arc<Vec<ApiKey>>,
    pub enabled: bool,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("keys", &self.api_keys.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl AuthState {
    /// Builds auth config from `GOODSLINK_API_KEYS`.
    ///
    /// In development, empty/missing keys disable bearer auth and the actor
    /// is read from the `x-actor-id` header instead.
    /// In non-development envs, empty/missing keys fail startup.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var(API_KEYS_VAR).unwrap_or_default();
        Self::parse(&raw, is_development)
    }

    /// Parses comma-separated `actor_id:token` pairs.
    pub fn parse(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut keys = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((id, token)) = entry.split_once(':') else {
                anyhow::bail!("{API_KEYS_VAR} entries must look like actor_id:token");
            };
            let actor_id: i64 = id
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("{API_KEYS_VAR} has a non-numeric actor id"))?;
            if actor_id <= 0 {
                anyhow::bail!("{API_KEYS_VAR} actor ids must be positive");
            }
            let token = token.trim();
            if token.is_empty() {
                anyhow::bail!("{API_KEYS_VAR} has an empty token for actor {actor_id}");
            }
            keys.push(ApiKey {
                actor_id,
                token: token.to_owned(),
            });
        }

        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "{API_KEYS_VAR} not set; bearer auth disabled, actor taken from x-actor-id"
                );
                return Ok(Self {
                    api_keys: Arc::new(Vec::new()),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "{API_KEYS_VAR} is required outside development; provide comma-separated actor_id:token pairs"
            );
        }

        Ok(Self {
            api_keys: Arc::new(keys),
            enabled: true,
        })
    }

    /// Compares against every key so timing does not reveal which one matched.
    fn actor_for(&self, token: &str) -> Option<Actor> {
        let mut found = None;
        for key in self.api_keys.iter() {
            if bool::from(key.token.as_bytes().ct_eq(token.as_bytes())) {
                found = Some(Actor { id: key.actor_id });
            }
        }
        found
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Sliding fixed-window limiter for simple API protection.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

fn middleware_error(status: StatusCode, code: &'static str, message: &'static str) -> Response {
    (
        status,
        Json(MiddlewareErrorBody {
            error: MiddlewareError { code, message },
        }),
    )
        .into_response()
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware that attaches the calling [`Actor`] to request extensions.
///
/// With auth enabled, the bearer token must map to a configured actor.
/// With auth disabled, `x-actor-id` names the actor and its absence means a
/// guest, which the resolver rejects on its own.
pub async fn resolve_actor(State(auth): State<AuthState>, mut req: Request, next: Next) -> Response {
    let actor = if auth.enabled {
        let token = extract_bearer_token(req.headers().get(AUTHORIZATION));
        match token.and_then(|t| auth.actor_for(t)) {
            Some(actor) => actor,
            None => {
                return middleware_error(
                    StatusCode::UNAUTHORIZED,
                    "unauthorized",
                    "missing or invalid bearer token",
                )
            }
        }
    } else {
        actor_from_header(req.headers().get(ACTOR_HEADER))
    };

    req.extensions_mut().insert(actor);
    next.run(req).await
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;
    let elapsed = window.started_at.elapsed();

    if elapsed >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        return middleware_error(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded",
        );
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

fn actor_from_header(value: Option<&HeaderValue>) -> Actor {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map_or_else(Actor::guest, |id| Actor { id })
}
