use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{HeaderMap, header::AUTHORIZATION};

use crate::error::ApiError;

/// Resolves bearer tokens to user ids.
#[derive(Debug, Clone, Default)]
pub struct TokenAuth {
    users_by_token: Arc<HashMap<String, String>>,
}

impl TokenAuth {
    /// Parses `user:token` pairs separated by commas.
    pub fn from_pairs(raw: &str) -> anyhow::Result<Self> {
        let mut users_by_token = HashMap::new();

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (user, token) = entry
                .split_once(':')
                .map(|(user, token)| (user.trim(), token.trim()))
                .filter(|(user, token)| !user.is_empty() && !token.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Malformed AUTH_TOKENS entry: {}", entry))?;

            if users_by_token
                .insert(token.to_string(), user.to_string())
                .is_some()
            {
                anyhow::bail!("Token for user {} is assigned more than once", user);
            }
        }

        if users_by_token.is_empty() {
            anyhow::bail!("AUTH_TOKENS does not contain any user:token pairs");
        }

        Ok(Self {
            users_by_token: Arc::new(users_by_token),
        })
    }

    pub fn user_for_token(&self, token: &str) -> Option<&str> {
        self.users_by_token.get(token).map(String::as_str)
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        let auth_str = headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        self.user_for_token(token)
            .map(str::to_string)
            .ok_or(ApiError::Unauthorized)
    }
}
