use super::error::AdminError;
use crate::AppState;
use axum::http::HeaderMap;
use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "admin_session";

/// Server-issued expiring session token: `email:expiry:nonce` plus an HMAC
/// signature. The email check at login is only the first factor; every write
/// re-validates this token and the registry.
pub fn create_session_token(
    secret: &str,
    email: &str,
    max_age_seconds: i64,
) -> Result<String, String> {
    use rand::{Rng, rng};

    let expires_at = chrono::Utc::now().timestamp() + max_age_seconds;
    let nonce: String = rng()
        .random::<[u8; 8]>()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();

    let value = format!("{}:{}:{}", email, expires_at, nonce);
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| "Invalid secret key")?;
    mac.update(value.as_bytes());
    let signature = general_purpose::URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}:{}", value, signature))
}

/// Returns the embedded email when the signature checks out and the token
/// has not expired.
pub fn verify_session_token(secret: &str, token: &str) -> Option<String> {
    let (value, signature_b64) = token.rsplit_once(':')?;
    let signature = general_purpose::URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(value.as_bytes());
    mac.verify_slice(&signature).ok()?;

    let mut parts = value.splitn(3, ':');
    let email = parts.next()?;
    let expires_at: i64 = parts.next()?.parse().ok()?;

    if expires_at <= chrono::Utc::now().timestamp() {
        return None;
    }

    Some(email.to_string())
}

pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age_seconds
    )
}

pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", SESSION_COOKIE)
}

pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get("cookie")?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let cookie = cookie.trim();
            let (key, value) = cookie.split_once('=')?;
            if key.trim() == name {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
}

/// Email carried by a valid, unexpired session cookie, if any.
pub fn session_email(headers: &HeaderMap, secret: &str) -> Option<String> {
    get_cookie_value(headers, SESSION_COOKIE)
        .and_then(|token| verify_session_token(secret, &token))
}

/// Gate for every write operation: a valid token whose email the registry
/// still recognizes. Anything else is Unauthorized.
pub async fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<String, AdminError> {
    let email = session_email(headers, &state.config.app.session_secret)
        .ok_or(AdminError::Unauthorized)?;

    if !state.registry.is_registered(&email).await {
        return Err(AdminError::Unauthorized);
    }

    Ok(email)
}
