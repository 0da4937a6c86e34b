//! buddy-finance: best-effort spending advice for confirmed transactions and
//! the background worker that delivers it.

pub mod advice;
pub mod worker;

pub use advice::{
    AdviceProvider, Advisor, ChatTurn, FALLBACK_ADVICE, HttpAdviceProvider, build_messages,
};
pub use worker::{AdviceEvent, AdviceRequest, run_worker};
