//! Basic-Auth gate for the admin route.
//!
//! Authentication is a two-state policy: when either credential is missing
//! from the configuration the gate is [`AdminAuth::Disabled`] and every
//! request passes.

use axum::http::{header, HeaderMap};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

use crate::config::AdminConfig;

const BASIC_PREFIX: &str = "Basic ";

/// Standard alphabet; trailing `=` padding is optional on decode.
const BASIC_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Admin authentication policy, built once from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAuth {
    /// No credentials configured: the admin route is open.
    Disabled,
    /// Both credentials configured: Basic-Auth is mandatory.
    Required { user: String, secret: String },
}

impl AdminAuth {
    /// Build the policy from raw credential values. Both must be non-empty
    /// for authentication to be enforced.
    pub fn new(user: Option<&str>, secret: Option<&str>) -> Self {
        match (user, secret) {
            (Some(user), Some(secret)) if !user.is_empty() && !secret.is_empty() => {
                AdminAuth::Required {
                    user: user.to_string(),
                    secret: secret.to_string(),
                }
            }
            _ => AdminAuth::Disabled,
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.user.as_deref(), config.secret.as_deref())
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AdminAuth::Required { .. })
    }

    /// Returns true when the request may see the admin surface.
    pub fn check(&self, headers: &HeaderMap) -> bool {
        match self {
            AdminAuth::Disabled => true,
            AdminAuth::Required { user, secret } => parse_basic(headers)
                .map(|(u, p)| {
                    // Both fields are always compared.
                    let user_ok = constant_time_eq(u.as_bytes(), user.as_bytes());
                    let secret_ok = constant_time_eq(p.as_bytes(), secret.as_bytes());
                    user_ok & secret_ok
                })
                .unwrap_or(false),
        }
    }
}

/// Predicate form of the gate over raw configured values.
pub fn check_admin_auth(headers: &HeaderMap, user: Option<&str>, secret: Option<&str>) -> bool {
    AdminAuth::new(user, secret).check(headers)
}

/// Decode `Authorization: Basic <base64(user:secret)>`. Splits on the first `:`.
fn parse_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let payload = value.strip_prefix(BASIC_PREFIX)?;
    let decoded = BASIC_ENGINE.decode(payload.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, secret) = decoded.split_once(':')?;
    Some((user.to_string(), secret.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
