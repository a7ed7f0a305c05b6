// src/auth/service.rs

use anyhow::{Result, anyhow, bail};
use std::sync::Arc;

use super::jwt::create_token;
use super::models::{AuthResponse, LoginRequest, RegisterRequest};
use super::password::{hash_password, verify_password};
use crate::users::store::{NewUser, UserStore};

pub struct AuthService {
    users: Arc<UserStore>,
}

impl AuthService {
    pub fn new(users: Arc<UserStore>) -> Self {
        Self { users }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
        if req.username.trim().is_empty() {
            bail!("Username may not be blank");
        }

        if req.password.len() < 8 {
            bail!("Password must be at least 8 characters");
        }

        if self.users.username_exists(&req.username).await? {
            bail!("Username already exists");
        }

        let password_hash = hash_password(&req.password)?;

        let user = self
            .users
            .create_user(NewUser {
                username: req.username,
                email: req.email.unwrap_or_default(),
                first_name: req.first_name.unwrap_or_default(),
                last_name: req.last_name.unwrap_or_default(),
                password_hash,
            })
            .await?;

        let token = create_token(&user.id, &user.username)?;

        Ok(AuthResponse {
            user: user.summary(),
            token,
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
        let user = self
            .users
            .get_user_by_username(&req.username)
            .await?
            .ok_or_else(|| anyhow!("Invalid credentials"))?;

        if !user.is_active {
            bail!("User account is disabled");
        }

        if !verify_password(&req.password, &user.password_hash)? {
            bail!("Invalid credentials");
        }

        let token = create_token(&user.id, &user.username)?;

        Ok(AuthResponse {
            user: user.summary(),
            token,
        })
    }
}
