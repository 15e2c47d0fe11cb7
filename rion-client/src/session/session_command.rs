use crate::engine::{LocalStream, NegotiationEngine};
use rion_core::Result;
use tokio::sync::oneshot;

/// Requests from [`Session`](super::Session) handles to the session task.
pub(crate) enum SessionCommand<E: NegotiationEngine> {
    Publish {
        stream: LocalStream<E::LocalTrack>,
        reply: oneshot::Sender<Result<()>>,
    },

    Subscribe {
        reply: oneshot::Sender<Result<()>>,
    },

    Close {
        reply: oneshot::Sender<()>,
    },
}

/// Completion of an async negotiation step spawned by the session task.
#[derive(Debug)]
pub(crate) enum StepOutcome {
    /// Local offer created and applied; gathering is under way.
    OfferApplied(Result<()>),

    /// Offer exchanged with the room server and its answer applied.
    Exchanged(Result<()>),

    /// Answer to a pushed offer created, applied and sent back.
    Renegotiated(Result<()>),
}
