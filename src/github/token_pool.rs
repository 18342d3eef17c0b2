use rand::Rng;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{Error, Result};

/// An API credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Shared set of interchangeable credentials. Rate-limited tokens are evicted
/// for the rest of the process lifetime.
#[derive(Clone)]
pub struct TokenPool {
    state: Arc<Mutex<Vec<Token>>>,
}

impl TokenPool {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Arc::new(Mutex::new(tokens.into_iter().map(Token::new).collect())),
        }
    }

    /// Picks a live token uniformly at random.
    pub async fn take(&self) -> Result<Token> {
        let tokens = self.state.lock().await;
        if tokens.is_empty() {
            return Err(Error::PoolExhausted);
        }
        let index = rand::thread_rng().gen_range(0..tokens.len());
        Ok(tokens[index].clone())
    }

    /// Permanently removes `token`. Fails when no credential is left afterwards.
    pub async fn evict(&self, token: &Token) -> Result<()> {
        let mut tokens = self.state.lock().await;
        if let Some(index) = tokens.iter().position(|t| t == token) {
            tokens.remove(index);
            tracing::warn!("Evicted rate-limited token, {} remaining", tokens.len());
        }
        if tokens.is_empty() {
            return Err(Error::PoolExhausted);
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.is_empty()
    }
}
