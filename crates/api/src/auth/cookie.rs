//! The `token` session cookie.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::auth::jwt::JwtConfig;

pub const TOKEN_COOKIE: &str = "token";

/// HttpOnly, SameSite=Strict cookie carrying `token`, living as long as the JWT.
pub fn session_cookie(token: String, config: &JwtConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.cookie_secure)
        .max_age(Duration::minutes(config.expiry_mins))
        .build()
}

/// An expired, empty cookie that makes the browser drop the session.
pub fn removal_cookie(config: &JwtConfig) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.cookie_secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Pull the JWT from the `token` cookie, falling back to `Authorization: Bearer`.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{AUTHORIZATION, COOKIE};

    fn config(secure: bool) -> JwtConfig {
        JwtConfig {
            secret: "s".into(),
            expiry_mins: 1440,
            cookie_secure: secure,
        }
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc".into(), &config(true));
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(1)));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie(&config(false));
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn token_read_from_cookie_first() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "theme=dark; token=from-cookie".parse().unwrap());
        headers.insert(AUTHORIZATION, "Bearer from-header".parse().unwrap());
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn token_falls_back_to_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer from-header".parse().unwrap());
        assert_eq!(token_from_headers(&headers).as_deref(), Some("from-header"));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(token_from_headers(&headers), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
