//! Spending advice: a short text-generation comment attached to a confirmed
//! transaction.
//!
//! Best-effort. Any failure (transport, HTTP status, bad body, empty
//! completion, timeout, disabled) yields [`FALLBACK_ADVICE`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use buddy_core::Transaction;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const FALLBACK_ADVICE: &str = "Keep tracking your expenses to build better financial habits!";

/// Number of prior transactions included as context.
pub const HISTORY_LIMIT: usize = 10;

const SYSTEM_PROMPT: &str = "You are a helpful financial advisor. Provide brief, actionable advice about spending habits. Keep responses under 50 words and be encouraging but honest.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// The external text-generation collaborator.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String>;
}

/// POSTs `{"messages": [...]}` and reads `{"completion": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpAdviceProvider {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
}

impl HttpAdviceProvider {
    pub fn new(endpoint: impl Into<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.filter(|m| !m.trim().is_empty()),
        }
    }
}

#[async_trait]
impl AdviceProvider for HttpAdviceProvider {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
        #[derive(Serialize)]
        struct Req<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            model: Option<&'a str>,
            messages: &'a [ChatTurn],
        }

        #[derive(Deserialize)]
        struct Resp {
            completion: Option<String>,
        }

        let body = Req {
            model: self.model.as_deref(),
            messages,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("advice request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("advice error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse advice response")?;
        Ok(out.completion.unwrap_or_default().trim().to_string())
    }
}

/// Build the system + user turns for one transaction.
pub fn build_messages(transaction: &Transaction, history: &[Transaction]) -> Vec<ChatTurn> {
    let recent = history
        .iter()
        .take(HISTORY_LIMIT)
        .map(describe)
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "New transaction: {}\n\nRecent transactions:\n{}\n\nGive me brief advice about this spending pattern.",
        describe(transaction),
        recent
    );

    vec![ChatTurn::new("system", SYSTEM_PROMPT), ChatTurn::new("user", user)]
}

fn describe(t: &Transaction) -> String {
    format!(
        "{}: ${:.2} - {} - {}",
        t.kind,
        t.amount.abs(),
        t.category,
        t.description
    )
}

/// Wraps a provider with a deadline and the fallback policy.
#[derive(Clone)]
pub struct Advisor {
    provider: Option<Arc<dyn AdviceProvider>>,
    timeout: Duration,
}

impl Advisor {
    pub fn new(provider: Arc<dyn AdviceProvider>, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            timeout,
        }
    }

    /// An advisor that always returns the fallback.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            timeout: Duration::ZERO,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Never fails; see the module docs for the fallback rules.
    pub async fn advise(&self, transaction: &Transaction, history: &[Transaction]) -> String {
        let Some(provider) = &self.provider else {
            return FALLBACK_ADVICE.to_string();
        };

        let messages = build_messages(transaction, history);
        match tokio::time::timeout(self.timeout, provider.complete(&messages)).await {
            Ok(Ok(text)) if !text.is_empty() => {
                debug!(id = %transaction.id, len = text.len(), "Advice generated");
                text
            }
            Ok(Ok(_)) => {
                warn!(id = %transaction.id, "Advice provider returned an empty completion");
                FALLBACK_ADVICE.to_string()
            }
            Ok(Err(e)) => {
                warn!(id = %transaction.id, error = %e, "Failed to generate advice");
                FALLBACK_ADVICE.to_string()
            }
            Err(_) => {
                warn!(id = %transaction.id, timeout_ms = self.timeout.as_millis() as u64, "Advice timed out");
                FALLBACK_ADVICE.to_string()
            }
        }
    }
}
