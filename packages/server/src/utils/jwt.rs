use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const KIND_ADMIN: &str = "admin";
pub const KIND_PARTICIPANT: &str = "participant";

/// Session claims. The `kind` tag separates the two independent login
/// contexts; participant fields are cached at login time and never re-synced
/// from the database.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username or participant code.
    pub sub: String,
    /// Admin or participant row id.
    pub uid: i32,
    /// `admin` or `participant`.
    pub kind: String,
    /// Participant display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Participant's college name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    /// Expiration timestamp.
    pub exp: usize,
}

fn expiry() -> usize {
    Utc::now()
        .checked_add_signed(Duration::days(7))
        .expect("valid timestamp")
        .timestamp() as usize
}

/// Sign a session token for an admin.
pub fn sign_admin(admin_id: i32, username: &str, secret: &str) -> Result<String> {
    let claims = Claims {
        sub: username.to_owned(),
        uid: admin_id,
        kind: KIND_ADMIN.to_owned(),
        name: None,
        college: None,
        exp: expiry(),
    };
    sign(&claims, secret)
}

/// Sign a session token for a participant, caching the display name and
/// college name alongside the code.
pub fn sign_participant(
    participant_id: i32,
    code: &str,
    name: &str,
    college: &str,
    secret: &str,
) -> Result<String> {
    let claims = Claims {
        sub: code.to_owned(),
        uid: participant_id,
        kind: KIND_PARTICIPANT.to_owned(),
        name: Some(name.to_owned()),
        college: Some(college.to_owned()),
        exp: expiry(),
    };
    sign(&claims, secret)
}

fn sign(claims: &Claims, secret: &str) -> Result<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify and decode a session token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
