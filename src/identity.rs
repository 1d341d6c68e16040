use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderName, StatusCode, request::Parts},
};

use crate::db::UserId;

/// Which request header the upstream auth collaborator uses to pass on the
/// signed-in user.
#[derive(Debug, Clone)]
pub struct Identity {
    user_header: HeaderName,
}

impl Identity {
    pub fn new(user_header: HeaderName) -> Self {
        Self { user_header }
    }

    pub fn user(&self, parts: &Parts) -> Option<UserId> {
        parts
            .headers
            .get(&self.user_header)?
            .to_str()
            .ok()
            .and_then(UserId::new)
    }
}

/// The signed-in user, if any.
pub struct CurrentUser(pub Option<UserId>);

impl<S> FromRequestParts<S> for CurrentUser
where
    Identity: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(Identity::from_ref(state).user(parts)))
    }
}

/// Like [`CurrentUser`], but anonymous requests are turned away.
pub struct RequireUser(pub UserId);

impl<S> FromRequestParts<S> for RequireUser
where
    Identity: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Identity::from_ref(state)
            .user(parts)
            .map(RequireUser)
            .ok_or((StatusCode::UNAUTHORIZED, "sign in to do that"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(header: Option<&str>) -> Parts {
        let mut request = Request::builder().uri("/");
        if let Some(value) = header {
            request = request.header("x-user-id", value);
        }
        request.body(()).unwrap().into_parts().0
    }

    #[test]
    fn reads_the_configured_header() {
        let identity = Identity::new(HeaderName::from_static("x-user-id"));
        assert_eq!(identity.user(&parts(Some("u1"))), UserId::new("u1"));
        assert_eq!(identity.user(&parts(Some("  "))), None);
        assert_eq!(identity.user(&parts(None)), None);
    }
}
