//! Bounded, cancellable fan-out with a single aggregator.
//!
//! Work items are turned into tokio tasks, at most `limit` at a time. Every
//! finished task hands its output back through its join handle to the
//! calling task, which is the only place results are folded into the
//! accumulator. No locks are involved and the accumulator is never observed
//! half-written.

use std::future::Future;

use netbelt_common::warn;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// How a fan-out ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every dispatched task reported.
    Complete,
    /// The caller cancelled; the accumulator holds a partial result.
    Interrupted,
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        matches!(self, Completion::Complete)
    }
}

/// Dispatches `task(item)` for every item and feeds each output to `sink`.
///
/// Returns once every task finished, or as soon as `cancel` fires. On
/// cancellation nothing new is dispatched and the tasks still in flight are
/// aborted when the join set is dropped. Tasks that finished before the
/// cancellation was seen are still recorded, and if that leaves nothing in
/// flight the run counts as complete.
pub async fn fan_out<I, F, Fut, T, S>(
    items: I,
    limit: usize,
    cancel: &CancellationToken,
    mut task: F,
    mut sink: S,
) -> Completion
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
    S: FnMut(T),
{
    let limit: usize = limit.max(1);
    let mut in_flight: JoinSet<T> = JoinSet::new();

    for item in items {
        while in_flight.len() >= limit {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Completion::Interrupted,
                joined = in_flight.join_next() => {
                    if let Some(joined) = joined {
                        record(joined, &mut sink);
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return Completion::Interrupted;
        }
        in_flight.spawn(task(item));
    }

    loop {
        if let Some(completion) = settle(&mut in_flight, &mut sink, false) {
            return completion;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return settle(&mut in_flight, &mut sink, true).unwrap_or(Completion::Interrupted);
            }
            joined = in_flight.join_next() => {
                if let Some(joined) = joined {
                    record(joined, &mut sink);
                }
            }
        }
    }
}

/// Records every task that already finished.
///
/// `Complete` once nothing is left in flight. Otherwise `Interrupted` when
/// `cancelled`, or `None` to keep waiting.
fn settle<T: 'static, S: FnMut(T)>(
    in_flight: &mut JoinSet<T>,
    sink: &mut S,
    cancelled: bool,
) -> Option<Completion> {
    while let Some(joined) = in_flight.try_join_next() {
        record(joined, sink);
    }
    if in_flight.is_empty() {
        Some(Completion::Complete)
    } else if cancelled {
        Some(Completion::Interrupted)
    } else {
        None
    }
}

fn record<T, S: FnMut(T)>(joined: Result<T, JoinError>, sink: &mut S) {
    match joined {
        Ok(output) => sink(output),
        Err(e) => warn!("probe task ended abnormally: {e}"),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
