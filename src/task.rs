//! Tagged fetch-task polling.
//!
//! Every cascade fetch is spawned on the tokio runtime and polled from the
//! UI loop. The task carries the selection value it was issued for, so a
//! response that arrives after the user has moved on can be recognized and
//! discarded instead of overwriting a newer selection's list.

use std::future::Future;

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

/// An in-flight fetch tagged with the selection it was issued for
pub struct TaggedTask<K, T> {
    tag: K,
    handle: JoinHandle<T>,
}

/// Result of polling a tagged task slot
pub enum PollResult<K, T> {
    /// No task to poll (slot was None)
    NoTask,
    /// Task is still running
    Pending,
    /// Task finished; `result` is Err on panic or abort
    Complete { tag: K, result: Result<T, JoinError> },
}

impl<K, T> TaggedTask<K, T>
where
    T: Send + 'static,
{
    /// Spawn `fut` on the tokio runtime, remembering `tag` for the poll
    pub fn spawn<F>(tag: K, fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            tag,
            handle: tokio::spawn(fut),
        }
    }

    /// Cancel the underlying task. The abort surfaces as a cancelled
    /// `JoinError` if the slot is still polled afterwards.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Poll an optional tagged task and take its result if finished.
///
/// Encapsulates the frame-loop pattern: check the slot, check completion,
/// then extract the output with `now_or_never()` and hand back the tag so
/// the caller can decide whether the result still applies.
pub fn poll_tagged<K, T>(slot: &mut Option<TaggedTask<K, T>>) -> PollResult<K, T> {
    let Some(task) = slot else {
        return PollResult::NoTask;
    };

    if !task.handle.is_finished() {
        return PollResult::Pending;
    }

    let Some(task) = slot.take() else {
        return PollResult::NoTask;
    };
    match task.handle.now_or_never() {
        Some(result) => PollResult::Complete {
            tag: task.tag,
            result,
        },
        None => {
            // Shouldn't happen since we checked is_finished()
            tracing::warn!("Task not ready despite is_finished()");
            PollResult::Pending
        }
    }
}
