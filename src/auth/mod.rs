// src/auth/mod.rs

pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod models;
pub mod password;
pub mod service;

pub use extractor::CurrentUser;
pub use jwt::{Claims, create_token, verify_token};
pub use models::{AuthResponse, LoginRequest, RegisterRequest};
