//! Menu assistant
//!
//! The text generator is a black box behind [`TextGenerator`]; this module
//! only owns the key pool and the failure policy. Quota and overload errors
//! rotate to the next key and retry, at most once per remaining key. Any
//! other failure, or running out of keys, produces a canned reply built
//! from the menu. [`Assistant::ask`] never fails.

mod fallback;

pub use fallback::fallback_reply;

use crate::catalog::Catalog;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Pause before retrying with the next key
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Error markers that mean "this key is exhausted or the model is busy"
const ROTATE_MARKERS: [&str; 5] = [
    "429",
    "exceeded your current quota",
    "503",
    "model is overloaded",
    "timeout",
];

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    Upstream(String),
}

impl GenerateError {
    /// Worth retrying with another key
    pub fn should_rotate(&self) -> bool {
        let GenerateError::Upstream(message) = self;
        ROTATE_MARKERS.iter().any(|m| message.contains(m))
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GenerateError>;
}

pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
    keys: Vec<String>,
    current: Mutex<usize>,
    catalog: Arc<Catalog>,
    retry_delay: Duration,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("keys", &self.keys.len())
            .field("current", &*self.current.lock())
            .finish_non_exhaustive()
    }
}

impl Assistant {
    pub fn new(generator: Arc<dyn TextGenerator>, keys: Vec<String>, catalog: Arc<Catalog>) -> Self {
        Self {
            generator,
            keys,
            current: Mutex::new(0),
            catalog,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Index of the key the next request uses
    pub fn current_key_index(&self) -> usize {
        *self.current.lock()
    }

    fn current_key(&self) -> Option<(usize, String)> {
        let idx = *self.current.lock();
        self.keys.get(idx).map(|k| (idx, k.clone()))
    }

    fn rotate(&self) {
        let mut current = self.current.lock();
        *current = (*current + 1) % self.keys.len().max(1);
    }

    /// Answer a guest question
    pub async fn ask(&self, question: &str) -> String {
        let max_retries = self.keys.len().saturating_sub(1);
        let mut retries = 0;

        loop {
            let Some((idx, key)) = self.current_key() else {
                tracing::warn!("Assistant has no API keys, using fallback reply");
                return fallback_reply(question, &self.catalog);
            };

            match self.generator.generate(&key, question).await {
                Ok(reply) => return reply,
                Err(e) if e.should_rotate() && retries < max_retries => {
                    self.rotate();
                    retries += 1;
                    tracing::info!(
                        failed_key = idx + 1,
                        next_key = self.current_key_index() + 1,
                        error = %e,
                        "Retrying assistant request with next key"
                    );
                    if !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, retries, "Assistant request failed, using fallback reply");
                    return fallback_reply(question, &self.catalog);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays scripted results and records the keys it was called with
    struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<String, GenerateError>>>,
        keys_seen: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<String, GenerateError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                keys_seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, api_key: &str, _prompt: &str) -> Result<String, GenerateError> {
            self.keys_seen.lock().push(api_key.to_string());
            self.script
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(GenerateError::Upstream("script exhausted".into())))
        }
    }

    fn upstream(msg: &str) -> Result<String, GenerateError> {
        Err(GenerateError::Upstream(msg.to_string()))
    }

    fn assistant(generator: Arc<ScriptedGenerator>, keys: &[&str]) -> Assistant {
        Assistant::new(
            generator,
            keys.iter().map(|k| k.to_string()).collect(),
            Arc::new(Catalog::load().unwrap()),
        )
        .with_retry_delay(Duration::ZERO)
    }

    #[test]
    fn test_should_rotate() {
        assert!(GenerateError::Upstream("[429 Too Many Requests]".into()).should_rotate());
        assert!(GenerateError::Upstream("You exceeded your current quota".into()).should_rotate());
        assert!(GenerateError::Upstream("The model is overloaded".into()).should_rotate());
        assert!(GenerateError::Upstream("request timeout".into()).should_rotate());
        assert!(!GenerateError::Upstream("400 invalid argument".into()).should_rotate());
    }

    #[tokio::test]
    async fn test_success_uses_current_key() {
        let generator = ScriptedGenerator::new(vec![Ok("Xin chào!".into())]);
        let assistant = assistant(generator.clone(), &["k1", "k2"]);

        assert_eq!(assistant.ask("hello").await, "Xin chào!");
        assert_eq!(*generator.keys_seen.lock(), vec!["k1"]);
        assert_eq!(assistant.current_key_index(), 0);
    }

    #[tokio::test]
    async fn test_rotates_on_quota_then_succeeds() {
        let generator = ScriptedGenerator::new(vec![
            upstream("429 quota"),
            upstream("503 Service Unavailable"),
            Ok("ok".into()),
        ]);
        let assistant = assistant(generator.clone(), &["k1", "k2", "k3"]);

        assert_eq!(assistant.ask("hi").await, "ok");
        assert_eq!(*generator.keys_seen.lock(), vec!["k1", "k2", "k3"]);
        assert_eq!(assistant.current_key_index(), 2);
    }

    #[tokio::test]
    async fn test_retries_bounded_by_pool_size() {
        let generator = ScriptedGenerator::new(vec![
            upstream("429"),
            upstream("429"),
            upstream("429"),
            Ok("never reached".into()),
        ]);
        let assistant = assistant(generator.clone(), &["k1", "k2", "k3"]);

        let reply = assistant.ask("xyz").await;
        assert!(reply.starts_with("Xin lỗi"));
        // first attempt plus pool_size - 1 retries
        assert_eq!(generator.keys_seen.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_other_errors_fall_back_immediately() {
        let generator = ScriptedGenerator::new(vec![upstream("400 bad request"), Ok("x".into())]);
        let assistant = assistant(generator.clone(), &["k1", "k2"]);

        let reply = assistant.ask("Có món gì cay?").await;
        assert!(reply.contains("Gà Tikka Masala"));
        assert_eq!(generator.keys_seen.lock().len(), 1);
        assert_eq!(assistant.current_key_index(), 0);
    }

    #[tokio::test]
    async fn test_no_keys_falls_back() {
        let generator = ScriptedGenerator::new(vec![Ok("unused".into())]);
        let assistant = assistant(generator.clone(), &[]);

        let reply = assistant.ask("hello").await;
        assert!(reply.starts_with("Xin lỗi"));
        assert!(generator.keys_seen.lock().is_empty());
    }
}
