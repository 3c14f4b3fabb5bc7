//! Recorded sessions for CLI tests.
//!
//! Sessions are written through the SDK with a manual clock, so week
//! directories and chat ids are known in advance.

use anyhow::Result;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

use envtrail_runtime::ManualClock;
use envtrail_sdk::Client;

use crate::TestWorld;

/// A scripted conversation: topic, exchanges and summary.
#[derive(Debug, Clone)]
pub struct SessionScript {
    pub topic: String,
    pub exchanges: Vec<(String, String)>,
    pub summary: Option<String>,
}

impl SessionScript {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            exchanges: Vec::new(),
            summary: None,
        }
    }

    pub fn exchange(mut self, user: &str, assistant: &str) -> Self {
        self.exchanges.push((user.to_string(), assistant.to_string()));
        self
    }

    /// Repeat a generated exchange `n` times.
    pub fn exchanges(mut self, n: usize) -> Self {
        for i in 0..n {
            self.exchanges
                .push((format!("question {}", i + 1), format!("answer {}", i + 1)));
        }
        self
    }

    pub fn finalize(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }
}

impl TestWorld {
    /// Record `script` into `project` starting at `at`, one minute per exchange.
    pub fn record_session(
        &self,
        project: &str,
        at: DateTime<Utc>,
        script: &SessionScript,
    ) -> Result<()> {
        let clock = Arc::new(ManualClock::new(at));
        let mut client = self.client()?.with_clock(clock.clone());

        client.start_tracking(project, &script.topic)?;
        for (user, assistant) in &script.exchanges {
            clock.advance(TimeDelta::minutes(1));
            client.add_exchange(user, assistant)?;
        }
        if let Some(summary) = &script.summary {
            client.finalize(summary)?;
        }
        Ok(())
    }
}
