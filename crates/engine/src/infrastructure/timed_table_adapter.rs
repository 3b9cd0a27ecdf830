//! Per-step timeouts around any [`TableAdapter`].
//!
//! Automation steps can hang on a page that never finishes loading. The
//! wrapper bounds each capability call and reports an elapsed budget as
//! [`AdapterError::Timeout`]. It never retries.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tablehost_domain::{Money, TableName};

use crate::infrastructure::ports::{
    AdapterError, AdmitOutcome, CreatedSession, SessionConfig, SessionHandle, TableAdapter,
};

/// Budget for each adapter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterTimeouts {
    pub create: Duration,
    pub admit: Duration,
    pub remove: Duration,
}

impl Default for AdapterTimeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(60),
            admit: Duration::from_secs(30),
            remove: Duration::from_secs(30),
        }
    }
}

/// Wrapper that bounds every call to the inner adapter.
pub struct TimedTableAdapter {
    inner: Arc<dyn TableAdapter>,
    timeouts: AdapterTimeouts,
}

impl TimedTableAdapter {
    pub fn new(inner: Arc<dyn TableAdapter>, timeouts: AdapterTimeouts) -> Self {
        Self { inner, timeouts }
    }

    async fn bounded<T, Fut>(
        &self,
        step: &'static str,
        budget: Duration,
        call: Fut,
    ) -> Result<T, AdapterError>
    where
        Fut: Future<Output = Result<T, AdapterError>>,
    {
        match tokio::time::timeout(budget, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(step, budget_secs = budget.as_secs(), "Table adapter step timed out");
                Err(AdapterError::Timeout {
                    step,
                    after: budget,
                })
            }
        }
    }
}

#[async_trait]
impl TableAdapter for TimedTableAdapter {
    async fn create_session(&self, config: &SessionConfig) -> Result<CreatedSession, AdapterError> {
        self.bounded(
            "create_session",
            self.timeouts.create,
            self.inner.create_session(config),
        )
        .await
    }

    async fn admit_player(
        &self,
        session: &SessionHandle,
        table_name: &TableName,
        expected_stack: Money,
    ) -> Result<AdmitOutcome, AdapterError> {
        self.bounded(
            "admit_player",
            self.timeouts.admit,
            self.inner.admit_player(session, table_name, expected_stack),
        )
        .await
    }

    async fn remove_player(
        &self,
        session: &SessionHandle,
        table_name: &TableName,
    ) -> Result<Money, AdapterError> {
        self.bounded(
            "remove_player",
            self.timeouts.remove,
            self.inner.remove_player(session, table_name),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablehost_domain::SessionUrl;

    /// Adapter whose admission never finishes in time.
    struct StuckAdapter;

    #[async_trait]
    impl TableAdapter for StuckAdapter {
        async fn create_session(
            &self,
            _config: &SessionConfig,
        ) -> Result<CreatedSession, AdapterError> {
            Ok(CreatedSession {
                handle: SessionHandle::new("h1"),
                url: SessionUrl::new("https://play.example/g/1").unwrap(),
            })
        }

        async fn admit_player(
            &self,
            _session: &SessionHandle,
            _table_name: &TableName,
            _expected_stack: Money,
        ) -> Result<AdmitOutcome, AdapterError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(AdmitOutcome::NotFound)
        }

        async fn remove_player(
            &self,
            _session: &SessionHandle,
            _table_name: &TableName,
        ) -> Result<Money, AdapterError> {
            Err(AdapterError::NotFound("alice".into()))
        }
    }

    fn timed() -> TimedTableAdapter {
        TimedTableAdapter::new(
            Arc::new(StuckAdapter),
            AdapterTimeouts {
                create: Duration::from_secs(60),
                admit: Duration::from_millis(20),
                remove: Duration::from_secs(30),
            },
        )
    }

    #[tokio::test]
    async fn slow_step_maps_to_timeout() {
        let result = timed()
            .admit_player(
                &SessionHandle::new("h1"),
                &TableName::new("alice").unwrap(),
                Money::from_dollars(50.0).unwrap(),
            )
            .await;

        assert_eq!(
            result,
            Err(AdapterError::Timeout {
                step: "admit_player",
                after: Duration::from_millis(20),
            })
        );
    }

    #[tokio::test]
    async fn fast_results_pass_through_unchanged() {
        let adapter = timed();
        let created = adapter
            .create_session(&SessionConfig {
                game_name: "Friday".into(),
                small_blind: Money::from_dollars(0.1).unwrap(),
                big_blind: Money::from_dollars(0.2).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(created.handle.as_str(), "h1");

        let removed = adapter
            .remove_player(&SessionHandle::new("h1"), &TableName::new("alice").unwrap())
            .await;
        assert_eq!(removed, Err(AdapterError::NotFound("alice".into())));
    }
}
