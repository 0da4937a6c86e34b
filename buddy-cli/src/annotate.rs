use buddy_core::BudgetState;
use buddy_finance::{AdviceEvent, AdviceRequest, Advisor, run_worker};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Ask for advice on freshly confirmed transactions and attach whatever comes
/// back. The transactions are already in the ledger (and on disk) when this
/// runs; nothing here can undo that.
pub async fn annotate(advisor: &Advisor, state: &mut BudgetState, ids: &[String]) -> Vec<AdviceEvent> {
    let (req_tx, req_rx) = mpsc::unbounded_channel();
    let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(run_worker(advisor.clone(), req_rx, ev_tx));

    for id in ids {
        match AdviceRequest::from_state(state, id) {
            Some(req) => {
                let _ = req_tx.send(req);
            }
            None => debug!(id = %id, "Transaction gone before advice was requested"),
        }
    }
    drop(req_tx);

    let mut events = Vec::new();
    while let Some(ev) = ev_rx.recv().await {
        if !ev.apply(state) {
            debug!(id = %ev.transaction_id, "Dropping advice for a missing transaction");
            continue;
        }
        events.push(ev);
    }

    if let Err(e) = worker.await {
        warn!(error = %e, "Advice worker stopped early");
    }
    events
}
