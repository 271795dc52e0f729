use parking_lot::RwLock;
use tracing::{info, warn};

/// Cookie names the web app has used for the bearer token
const TOKEN_COOKIES: [&str; 2] = ["access_token", "token"];

/// Extract the bearer token from a `Cookie` header value
pub fn token_from_cookie(cookie: &str) -> Option<String> {
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| TOKEN_COOKIES.contains(&name.trim()))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Login page URL that brings the user back to `path` afterwards
pub fn login_redirect(path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("/login?redirect={}", encoded)
}

/// Authentication state shared by every request
#[derive(Debug)]
pub struct Session {
    token: RwLock<Option<String>>,
    current_path: RwLock<String>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
            current_path: RwLock::new("/showcases".to_string()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Record the page the user is on, used for the post-login redirect
    pub fn set_current_path(&self, path: impl Into<String>) {
        *self.current_path.write() = path.into();
    }

    /// Drop the token after a 401 and return where the user must go next
    pub fn teardown(&self) -> String {
        let had_token = self.token.write().take().is_some();
        let redirect = login_redirect(&self.current_path.read());
        if had_token {
            warn!("Session rejected by backend, token cleared");
        }
        info!("Redirecting to {}", redirect);
        redirect
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}
