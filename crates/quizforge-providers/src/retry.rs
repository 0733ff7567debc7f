//! Retrying generation calls.

use std::time::Duration;

use quizforge_core::error::ProviderError;
use quizforge_core::model::QuestionSet;
use quizforge_core::traits::{GenerationRequest, QuizGenerator};

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// How often and how patiently to retry a failed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Call `generator` until it succeeds, a permanent error occurs, or the
/// retries run out. Delays double each time, capped at a minute; a
/// rate-limit response's own retry-after wins over the backoff but is held
/// to the same cap.
pub async fn generate_with_retry(
    generator: &dyn QuizGenerator,
    request: &GenerationRequest,
    policy: RetryPolicy,
) -> anyhow::Result<QuestionSet> {
    let mut delay = policy.initial_delay;
    let mut attempt = 0;
    loop {
        match generator.generate(request).await {
            Ok(set) => return Ok(set),
            Err(err) => {
                let provider_err = err.downcast_ref::<ProviderError>();
                if provider_err.is_some_and(ProviderError::is_permanent) {
                    return Err(err);
                }
                if attempt >= policy.max_retries {
                    return Err(err);
                }
                if let Some(ms) = provider_err.and_then(ProviderError::retry_after_ms) {
                    delay = Duration::from_millis(ms).min(MAX_BACKOFF);
                }
                attempt += 1;
                tracing::warn!(
                    provider = generator.name(),
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "generation failed, retrying: {err}"
                );
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2).min(MAX_BACKOFF);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use async_trait::async_trait;
    use quizforge_core::model::QuestionType;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn request() -> GenerationRequest {
        GenerationRequest::new("Traits", 2, [QuestionType::SingleSelect]).unwrap()
    }

    struct Unauthorized(AtomicU32);

    #[async_trait]
    impl QuizGenerator for Unauthorized {
        fn name(&self) -> &str {
            "unauthorized"
        }

        async fn generate(&self, _request: &GenerationRequest) -> anyhow::Result<QuestionSet> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Err(ProviderError::AuthenticationFailed("bad key".into()).into())
        }
    }

    /// Rate limited once with an absurd retry-after, then succeeds.
    struct RateLimitedOnce(AtomicU32);

    #[async_trait]
    impl QuizGenerator for RateLimitedOnce {
        fn name(&self) -> &str {
            "rate-limited"
        }

        async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<QuestionSet> {
            if self.0.fetch_add(1, Ordering::Relaxed) == 0 {
                return Err(ProviderError::RateLimited {
                    retry_after_ms: u64::MAX,
                }
                .into());
            }
            MockProvider::new().generate(request).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_is_capped() {
        let provider = RateLimitedOnce(AtomicU32::new(0));
        let started = tokio::time::Instant::now();
        let set = generate_with_retry(&provider, &request(), RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(set.questions.len(), 2);
        assert_eq!(provider.0.load(Ordering::Relaxed), 2);
        assert!(started.elapsed() <= MAX_BACKOFF + Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_from_transient_failures() {
        let provider = MockProvider::new().failing_first(2);
        let set = generate_with_retry(&provider, &request(), RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(set.questions.len(), 2);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let provider = MockProvider::always_failing();
        let policy = RetryPolicy {
            max_retries: 2,
            initial_delay: Duration::from_millis(10),
        };
        assert!(generate_with_retry(&provider, &request(), policy).await.is_err());
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_errors_are_not_retried() {
        let provider = Unauthorized(AtomicU32::new(0));
        let err = generate_with_retry(&provider, &request(), RetryPolicy::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("authentication failed"));
        assert_eq!(provider.0.load(Ordering::Relaxed), 1);
    }
}
