use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use crate::entities::token::Claims;

/// The caller as established by the auth middleware: decoded bearer claims,
/// or anonymous when no credential was presented.
///
/// Extraction never fails; authorization decisions belong to the admin gate.
/// Usage: Add `principal: Principal` as a parameter to your handler function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Principal(pub Option<Claims>);

impl Principal {
    pub fn anonymous() -> Self {
        Principal(None)
    }

    pub fn authenticated(claims: Claims) -> Self {
        Principal(Some(claims))
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.0.as_ref()
    }

    pub fn subject(&self) -> &str {
        self.0.as_ref().map(|c| c.sub.as_str()).unwrap_or("anonymous")
    }
}

impl FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(Principal(req.extensions().get::<Claims>().cloned())))
    }
}
