//! Shared handles to values computed by spawned tasks.
//!
//! A [`Deferred`] is started eagerly and can be cloned and awaited any
//! number of times; every reader observes the same `Arc`ed value, or the
//! same error.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::Arc;

use crate::error::{RenderError, Result};

pub type Deferred<T> = Shared<BoxFuture<'static, Result<Arc<T>>>>;

/// Spawn `future` on the current Tokio runtime.
///
/// Panics inside the task surface as [`RenderError::TaskFailed`].
pub fn spawn<T, F>(task: &str, future: F) -> Deferred<T>
where
    T: Send + Sync + 'static,
    F: Future<Output = Result<T>> + Send + 'static,
{
    let task = task.to_string();
    let handle = tokio::spawn(future);
    async move {
        match handle.await {
            Ok(result) => result.map(Arc::new),
            Err(e) => Err(RenderError::TaskFailed {
                task,
                reason: e.to_string(),
            }),
        }
    }
    .boxed()
    .shared()
}

/// Derive a value from one prerequisite once it is ready.
pub fn map<A, T, F>(task: &str, input: &Deferred<A>, derive: F) -> Deferred<T>
where
    A: Send + Sync + 'static,
    T: Send + Sync + 'static,
    F: FnOnce(&A) -> Result<T> + Send + 'static,
{
    let input = input.clone();
    spawn(task, async move {
        let a = input.await?;
        derive(&a)
    })
}

pub fn map2<A, B, T, F>(task: &str, a: &Deferred<A>, b: &Deferred<B>, derive: F) -> Deferred<T>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    T: Send + Sync + 'static,
    F: FnOnce(&A, &B) -> Result<T> + Send + 'static,
{
    let (a, b) = (a.clone(), b.clone());
    spawn(task, async move {
        let a = a.await?;
        let b = b.await?;
        derive(&a, &b)
    })
}

pub fn map3<A, B, C, T, F>(
    task: &str,
    a: &Deferred<A>,
    b: &Deferred<B>,
    c: &Deferred<C>,
    derive: F,
) -> Deferred<T>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    C: Send + Sync + 'static,
    T: Send + Sync + 'static,
    F: FnOnce(&A, &B, &C) -> Result<T> + Send + 'static,
{
    let (a, b, c) = (a.clone(), b.clone(), c.clone());
    spawn(task, async move {
        let a = a.await?;
        let b = b.await?;
        let c = c.await?;
        derive(&a, &b, &c)
    })
}

/// A value that is already known.
pub fn resolved<T>(value: T) -> Deferred<T>
where
    T: Send + Sync + 'static,
{
    futures::future::ready(Ok(Arc::new(value))).boxed().shared()
}

/// Run blocking, CPU-heavy work off the async worker threads.
pub async fn blocking<T, F>(task: &str, work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| RenderError::TaskFailed {
            task: task.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_value_is_computed_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let deferred: Deferred<usize> = spawn("count", async move {
            Ok(counter.fetch_add(1, Ordering::SeqCst) + 41)
        });
        let first = deferred.clone().await.unwrap();
        let second = deferred.await.unwrap();
        assert_eq!(*first, 41);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_errors_reach_every_reader() {
        let failing: Deferred<()> = spawn("fail", async {
            Err(RenderError::UnknownPackage("x".to_string()))
        });
        let dependent: Deferred<()> = {
            let failing = failing.clone();
            spawn("dependent", async move {
                failing.await?;
                Ok::<(), RenderError>(())
            })
        };
        assert_eq!(
            dependent.await.unwrap_err(),
            RenderError::UnknownPackage("x".to_string())
        );
        assert!(failing.await.is_err());
    }

    #[tokio::test]
    async fn test_panic_becomes_task_failure() {
        let deferred: Deferred<()> = spawn("explode", async {
            Option::<()>::None.expect("boom");
            Ok(())
        });
        assert!(matches!(
            deferred.await,
            Err(RenderError::TaskFailed { task, .. }) if task == "explode"
        ));
    }

    #[tokio::test]
    async fn test_resolved_value() {
        assert_eq!(*resolved(7u8).await.unwrap(), 7);
    }
}
