//! Background advice worker.
//!
//! Confirmation never waits on advice: the caller appends the transaction,
//! then queues an [`AdviceRequest`]. Each request runs as its own task and the
//! result comes back as an [`AdviceEvent`] for the state owner to attach.
//! A second request for the same transaction aborts the one in flight.

use std::collections::HashMap;

use buddy_core::{BudgetState, Transaction};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::advice::{Advisor, FALLBACK_ADVICE, HISTORY_LIMIT};

#[derive(Debug, Clone)]
pub struct AdviceRequest {
    pub transaction: Transaction,
    /// Prior transactions, most recent first
    pub history: Vec<Transaction>,
}

impl AdviceRequest {
    /// Snapshot a confirmed transaction and the history before it.
    pub fn from_state(state: &BudgetState, transaction_id: &str) -> Option<Self> {
        let ledger = state.ledger();
        let transaction = ledger.get(transaction_id)?.clone();
        let history = ledger
            .transactions()
            .iter()
            .filter(|t| t.id != transaction_id)
            .take(HISTORY_LIMIT)
            .cloned()
            .collect();
        Some(Self {
            transaction,
            history,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdviceEvent {
    pub transaction_id: String,
    pub advice: String,
}

impl AdviceEvent {
    pub fn is_fallback(&self) -> bool {
        self.advice == FALLBACK_ADVICE
    }

    /// Attach to the state; false if the transaction is gone.
    pub fn apply(&self, state: &mut BudgetState) -> bool {
        state.attach_advice(&self.transaction_id, self.advice.clone())
    }
}

/// Runs until `rx` closes, then waits for the tasks still in flight.
pub async fn run_worker(
    advisor: Advisor,
    mut rx: mpsc::UnboundedReceiver<AdviceRequest>,
    tx: mpsc::UnboundedSender<AdviceEvent>,
) {
    let mut in_flight: HashMap<String, JoinHandle<()>> = HashMap::new();

    while let Some(req) = rx.recv().await {
        in_flight.retain(|_, h| !h.is_finished());

        let id = req.transaction.id.clone();
        if let Some(prev) = in_flight.remove(&id) {
            debug!(id = %id, "Cancelling in-flight advice");
            prev.abort();
        }

        let advisor = advisor.clone();
        let tx2 = tx.clone();
        in_flight.insert(
            id,
            tokio::spawn(async move {
                let advice = advisor.advise(&req.transaction, &req.history).await;
                let _ = tx2.send(AdviceEvent {
                    transaction_id: req.transaction.id,
                    advice,
                });
            }),
        );
    }

    for (_, h) in in_flight {
        let _ = h.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{AdviceProvider, ChatTurn};
    use anyhow::Result;
    use async_trait::async_trait;
    use buddy_core::{Category, NewTransaction, TransactionType};
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::sync::Arc;
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl AdviceProvider for Echo {
        async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
            let history = messages[1].content.lines().filter(|l| l.starts_with("expense")).count();
            Ok(format!("seen {history}"))
        }
    }

    fn state_with(n: usize) -> (BudgetState, Vec<String>) {
        let mut state = BudgetState::new();
        let now = Utc.with_ymd_and_hms(2026, 2, 18, 9, 0, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
        let ids = (0..n)
            .map(|i| {
                let t = NewTransaction::new(1.0 + i as f64, "Snack", Category::FoodDining, TransactionType::Expense, day)
                    .unwrap();
                state.confirm_transaction(t, now).transaction_id
            })
            .collect();
        (state, ids)
    }

    #[test]
    fn test_request_excludes_the_transaction_itself() {
        let (state, ids) = state_with(3);
        let req = AdviceRequest::from_state(&state, &ids[2]).unwrap();
        assert_eq!(req.transaction.id, ids[2]);
        assert_eq!(req.history.len(), 2);
        assert!(req.history.iter().all(|t| t.id != ids[2]));
        assert!(AdviceRequest::from_state(&state, "missing").is_none());
    }

    #[tokio::test]
    async fn test_worker_delivers_advice_after_confirmation() {
        let (mut state, ids) = state_with(2);
        let advisor = Advisor::new(Arc::new(Echo), Duration::from_secs(5));

        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(advisor, req_rx, ev_tx));

        // Confirmed and visible before any advice exists.
        assert!(state.ledger().get(&ids[1]).unwrap().advice.is_none());

        req_tx.send(AdviceRequest::from_state(&state, &ids[1]).unwrap()).unwrap();
        drop(req_tx);

        let ev = ev_rx.recv().await.unwrap();
        assert_eq!(ev.transaction_id, ids[1]);
        assert_eq!(ev.advice, "seen 1");
        assert!(!ev.is_fallback());
        assert!(ev.apply(&mut state));
        assert_eq!(state.ledger().get(&ids[1]).unwrap().advice.as_deref(), Some("seen 1"));

        worker.await.unwrap();
        assert!(ev_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_disabled_advisor_yields_fallback_event() {
        let (state, ids) = state_with(1);
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(Advisor::disabled(), req_rx, ev_tx));

        req_tx.send(AdviceRequest::from_state(&state, &ids[0]).unwrap()).unwrap();
        drop(req_tx);

        let ev = ev_rx.recv().await.unwrap();
        assert!(ev.is_fallback());
        worker.await.unwrap();
    }
}
