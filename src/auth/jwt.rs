// src/auth/jwt.rs

use anyhow::{Result, anyhow};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

pub fn create_token(user_id: &str, username: &str) -> Result<String> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::days(CONFIG.token_ttl_days))
        .ok_or_else(|| anyhow!("Failed to calculate token expiration"))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    let key = EncodingKey::from_secret(CONFIG.jwt_secret.as_bytes());

    encode(&Header::default(), &claims, &key).map_err(|e| anyhow!("Failed to create token: {}", e))
}

pub fn verify_token(token: &str) -> Result<Claims> {
    let key = DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes());

    decode::<Claims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| anyhow!("Invalid token: {}", e))
}
