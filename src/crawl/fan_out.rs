// Bounded fan-out over spawned tasks.
//
// Tasks are dispatched in input order, at most `limit` at a time, and each
// result lands in an arena slot indexed by its input position, so callers get
// results back in input order whatever order the workers finish in.
//
// The first failure stops further dispatch. Tasks already running are still
// joined before returning; the failure reports how many tasks had succeeded
// when it was observed.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

#[derive(Debug)]
pub enum TaskFailure<E> {
    Failed(E),
    Panicked(String),
}

#[derive(Debug)]
pub struct FanOutFailure<E> {
    /// Input position of the failed task
    pub index: usize,
    pub failure: TaskFailure<E>,
    /// Successes at the moment the failure was observed
    pub completed: usize,
    pub total: usize,
}

impl<E> FanOutFailure<E> {
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

/// Run `task` on every input with at most `limit` tasks in flight.
///
/// `on_complete(completed, total)` is called after every success.
pub async fn fan_out<I, T, E, F, Fut>(
    inputs: Vec<I>,
    limit: usize,
    mut on_complete: impl FnMut(usize, usize),
    task: F,
) -> Result<Vec<T>, FanOutFailure<E>>
where
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let total = inputs.len();
    let limit = limit.max(1);

    let mut arena: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut pending = inputs.into_iter().enumerate();
    let mut running = FuturesUnordered::new();
    let mut completed = 0;
    let mut failure: Option<FanOutFailure<E>> = None;

    let dispatch = |index: usize, input: I| {
        let handle = tokio::spawn(task(input));
        async move { (index, handle.await) }
    };

    for (index, input) in pending.by_ref().take(limit) {
        running.push(dispatch(index, input));
    }

    while let Some((index, joined)) = running.next().await {
        let outcome = match joined {
            Ok(result) => result.map_err(TaskFailure::Failed),
            Err(join_error) => Err(TaskFailure::Panicked(join_error.to_string())),
        };

        match outcome {
            Ok(value) => {
                arena[index] = Some(value);
                completed += 1;
                on_complete(completed, total);
            }
            Err(task_failure) => {
                if failure.is_none() {
                    failure = Some(FanOutFailure {
                        index,
                        failure: task_failure,
                        completed,
                        total,
                    });
                }
            }
        }

        if failure.is_none() {
            if let Some((next_index, input)) = pending.next() {
                running.push(dispatch(next_index, input));
            }
        }
    }

    if let Some(failure) = failure {
        return Err(failure);
    }

    Ok(arena.into_iter().flatten().collect())
}
