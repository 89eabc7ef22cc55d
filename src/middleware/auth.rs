use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::SecurityConfig;
use crate::error::ApiError;

/// The single shared credential allowed to mutate blogs.
#[derive(Clone, Debug)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl From<&SecurityConfig> for AdminCredentials {
    fn from(config: &SecurityConfig) -> Self {
        Self {
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
        }
    }
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// `Basic <base64(user:password)>` header value for these credentials
    pub fn header_value(&self) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", self.username, self.password)))
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        // An unset password locks the routes instead of accepting "user:"
        !self.password.is_empty()
            && constant_time_eq(self.username.as_bytes(), username.as_bytes())
            && constant_time_eq(self.password.as_bytes(), password.as_bytes())
    }
}

/// Basic authentication middleware guarding mutating routes
pub async fn basic_auth_middleware(
    State(credentials): State<AdminCredentials>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (username, password) = extract_basic_credentials(&headers).map_err(|msg| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), msg);
        ApiError::unauthorized(msg)
    })?;

    if !credentials.matches(&username, &password) {
        tracing::warn!("Rejected credentials for user {:?} on {}", username, request.uri().path());
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    Ok(next.run(request).await)
}

/// Extract `user:password` from a `Basic` Authorization header
fn extract_basic_credentials(headers: &HeaderMap) -> Result<(String, String), String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let (scheme, encoded) = auth_str
        .trim_start()
        .split_once(' ')
        .ok_or_else(|| "Authorization header must use Basic scheme".to_string())?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return Err("Authorization header must use Basic scheme".to_string());
    }
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err("Empty Basic credentials".to_string());
    }

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| "Basic credentials are not valid base64".to_string())?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| "Basic credentials are not valid UTF-8".to_string())?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| "Basic credentials must be user:password".to_string())?;
    Ok((username.to_string(), password.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn decodes_basic_header() {
        let (user, pass) = extract_basic_credentials(&headers("Basic YWRtaW46cXdlcnR5")).unwrap();
        assert_eq!((user.as_str(), pass.as_str()), ("admin", "qwerty"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        for header in ["basic YWRtaW46cXdlcnR5", "BASIC YWRtaW46cXdlcnR5", "bAsIc  YWRtaW46cXdlcnR5"] {
            let (user, pass) = extract_basic_credentials(&headers(header)).unwrap();
            assert_eq!((user.as_str(), pass.as_str()), ("admin", "qwerty"), "header {:?}", header);
        }
        assert!(extract_basic_credentials(&headers("Basically YWRtaW46cXdlcnR5")).is_err());
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(extract_basic_credentials(&HeaderMap::new()).is_err());
        assert!(extract_basic_credentials(&headers("Bearer abc")).is_err());
        assert!(extract_basic_credentials(&headers("Basic ")).is_err());
        assert!(extract_basic_credentials(&headers("Basic !!!")).is_err());
        // "adminqwerty" without a colon
        assert!(extract_basic_credentials(&headers("Basic YWRtaW5xd2VydHk=")).is_err());
    }

    #[test]
    fn header_value_round_trips() {
        let credentials = AdminCredentials::new("admin", "qwerty");
        assert_eq!(credentials.header_value(), "Basic YWRtaW46cXdlcnR5");
        let (user, pass) = extract_basic_credentials(&headers(&credentials.header_value())).unwrap();
        assert!(credentials.matches(&user, &pass));
        assert!(!credentials.matches("admin", "qwerty1"));
        assert!(!credentials.matches("root", "qwerty"));
    }

    #[test]
    fn empty_password_matches_nothing() {
        let credentials = AdminCredentials::new("admin", "");
        assert!(!credentials.matches("admin", ""));
    }
}
