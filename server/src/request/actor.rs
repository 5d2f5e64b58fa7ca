use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use kernel::prelude::entity::{Actor, LibraryId, Role, UserId};
use serde_json::json;

static ACTOR_ID: &str = "x-actor-id";
static ACTOR_ROLE: &str = "x-actor-role";
static LIBRARY_ID: &str = "x-library-id";

/// The caller as asserted by the authentication layer in front of this service.
pub struct Caller(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let id = header(headers, ACTOR_ID)?
            .parse::<i64>()
            .map_err(|_| Unauthenticated(ACTOR_ID))?;
        let role = header(headers, ACTOR_ROLE)?
            .parse::<Role>()
            .map_err(|_| Unauthenticated(ACTOR_ROLE))?;
        let lib_id = header(headers, LIBRARY_ID)?
            .parse::<i64>()
            .map_err(|_| Unauthenticated(LIBRARY_ID))?;
        Ok(Caller(Actor::new(
            UserId::new(id),
            role,
            LibraryId::new(lib_id),
        )))
    }
}

fn header<'a>(headers: &'a HeaderMap, key: &'static str) -> Result<&'a str, Unauthenticated> {
    headers
        .get(key)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .ok_or(Unauthenticated(key))
}

#[derive(Debug)]
pub struct Unauthenticated(&'static str);

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        tracing::debug!("rejected caller: missing or malformed {}", self.0);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthenticated" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::extract::FromRequestParts;
    use axum::http::Request;
    use kernel::prelude::entity::{LibraryId, Role, UserId};

    use crate::request::actor::{Caller, Unauthenticated};

    async fn extract(headers: &[(&str, &str)]) -> Result<Caller, Unauthenticated> {
        let mut request = Request::builder();
        for (key, value) in headers {
            request = request.header(*key, *value);
        }
        let (mut parts, _) = request.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn headers_become_an_actor() {
        let Caller(actor) = extract(&[
            ("x-actor-id", "7"),
            ("x-actor-role", "Reader"),
            ("x-library-id", "1"),
        ])
        .await
        .unwrap();
        assert_eq!(actor.id(), &UserId::new(7));
        assert_eq!(actor.role(), &Role::Reader);
        assert_eq!(actor.lib_id(), &LibraryId::new(1));
    }

    #[tokio::test]
    async fn missing_or_malformed_headers_are_rejected() {
        let missing = extract(&[("x-actor-id", "7"), ("x-actor-role", "Reader")]).await;
        assert!(matches!(missing, Err(Unauthenticated("x-library-id"))));

        let unknown_role = extract(&[
            ("x-actor-id", "7"),
            ("x-actor-role", "Janitor"),
            ("x-library-id", "1"),
        ])
        .await;
        assert!(matches!(unknown_role, Err(Unauthenticated("x-actor-role"))));

        let bad_id = extract(&[
            ("x-actor-id", "seven"),
            ("x-actor-role", "Reader"),
            ("x-library-id", "1"),
        ])
        .await;
        assert!(matches!(bad_id, Err(Unauthenticated("x-actor-id"))));
    }
}
