use auth::IssuedToken;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use time::Duration;
use time::OffsetDateTime;

/// Name of the cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Store the refresh token in the refresh cookie.
///
/// The cookie expires at the token's own `exp`, so the two never drift.
pub fn set_refresh_cookie(jar: CookieJar, refresh_token: &IssuedToken) -> CookieJar {
    let mut cookie = refresh_cookie(refresh_token.token.clone());
    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(refresh_token.expires_at.timestamp()) {
        cookie.set_expires(expires);
    }
    jar.add(cookie)
}

/// Overwrite the refresh cookie with an already expired, empty one.
pub fn clear_refresh_cookie(jar: CookieJar) -> CookieJar {
    let mut cookie = refresh_cookie(String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
    jar.add(cookie)
}

/// Refresh token sent by the client, if any.
pub fn read_refresh_cookie(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

fn refresh_cookie(value: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use axum::http::header;
    use axum::http::HeaderValue;
    use axum::response::IntoResponse;
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn issued(expires_at: i64) -> IssuedToken {
        IssuedToken {
            token: "header.payload.signature".to_string(),
            expires_at: Utc.timestamp_opt(expires_at, 0).unwrap(),
        }
    }

    #[test]
    fn test_set_refresh_cookie_attributes() {
        let jar = set_refresh_cookie(CookieJar::new(), &issued(1_900_000_000));
        let cookie = jar.get(REFRESH_COOKIE).unwrap();

        assert_eq!(cookie.value(), "header.payload.signature");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.expires_datetime().map(|at| at.unix_timestamp()),
            Some(1_900_000_000)
        );
    }

    #[test]
    fn test_set_refresh_cookie_header() {
        let response = set_refresh_cookie(CookieJar::new(), &issued(1_900_000_000)).into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();

        assert!(set_cookie.starts_with("refresh_token=header.payload.signature"));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Secure"));
        assert!(set_cookie.contains("SameSite=Strict"));
        assert!(set_cookie.contains("Expires="));
    }

    #[test]
    fn test_clear_refresh_cookie() {
        let jar = set_refresh_cookie(CookieJar::new(), &issued(1_900_000_000));
        let jar = clear_refresh_cookie(jar);
        let cookie = jar.get(REFRESH_COOKIE).unwrap();

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.expires_datetime().unwrap() < OffsetDateTime::now_utc());
    }

    #[test]
    fn test_read_refresh_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; refresh_token=abc.def.ghi"),
        );

        assert_eq!(read_refresh_cookie(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_read_refresh_cookie_missing_or_empty() {
        assert_eq!(read_refresh_cookie(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("refresh_token="));
        assert_eq!(read_refresh_cookie(&headers), None);
    }
}
