//! Deadline wrapper for scorers backed by external models.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::inference::call_with_timeout;
use crate::scorer::Scorer;
use crate::scorer::types::{ScoreReport, ScoreVector, ScorerKind};

/// Bounds every call of the wrapped scorer by `timeout`.
///
/// A call that misses the deadline fails with an inference error, so the
/// engine drops that scorer for the request instead of waiting on it.
pub struct DeadlineScorer {
    inner: Arc<dyn Scorer>,
    timeout: Duration,
}

impl DeadlineScorer {
    pub fn new(inner: Arc<dyn Scorer>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Scorer for DeadlineScorer {
    fn score(&self, text: &str) -> Result<ScoreVector> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        call_with_timeout(self.inner.kind().as_str(), Some(self.timeout), move || {
            inner.score(&text)
        })
    }

    fn kind(&self) -> ScorerKind {
        self.inner.kind()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn score_detailed(&self, text: &str) -> Result<ScoreReport> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        call_with_timeout(self.inner.kind().as_str(), Some(self.timeout), move || {
            inner.score_detailed(&text)
        })
    }
}

impl std::fmt::Debug for DeadlineScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeadlineScorer")
            .field("scorer", &self.inner.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use ahash::AHashMap;

    struct SleepyScorer(Duration);

    impl Scorer for SleepyScorer {
        fn score(&self, _text: &str) -> Result<ScoreVector> {
            thread::sleep(self.0);
            Ok(AHashMap::from_iter([("😊".to_string(), 1.0)]))
        }

        fn kind(&self) -> ScorerKind {
            ScorerKind::Semantic
        }
    }

    #[test]
    fn test_fast_scorer_passes_through() {
        let scorer = DeadlineScorer::new(
            Arc::new(SleepyScorer(Duration::ZERO)),
            Duration::from_secs(5),
        );
        assert_eq!(scorer.kind(), ScorerKind::Semantic);
        assert_eq!(scorer.score("vui").unwrap().get("😊"), Some(&1.0));
    }

    #[test]
    fn test_slow_scorer_times_out() {
        let scorer = DeadlineScorer::new(
            Arc::new(SleepyScorer(Duration::from_millis(500))),
            Duration::from_millis(20),
        );
        let err = scorer.score_detailed("vui").unwrap_err();
        assert!(err.is_inference());
    }
}
