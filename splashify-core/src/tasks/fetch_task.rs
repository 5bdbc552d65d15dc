//! ``src/tasks/fetch_task.rs``
//! ============================================================================
//! # Background Fetch Cycle Task
//!
//! Runs one fetch cycle on the runtime and reports it to the event loop. The
//! loading guard is released before the report is sent, so by the time the
//! event loop sees the result the in-flight count already excludes it.

use std::sync::Arc;
use std::time::Instant;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    api::client::PhotoApi,
    controller::{
        event_loop::TaskResult,
        feed_controller::{FetchParams, run_fetch_cycle},
    },
    model::query_state::{FetchRequest, LoadingGuard},
};

/// Spawn a fetch cycle for `request`. `guard` must have been acquired before
/// the call.
pub fn spawn_fetch_cycle(
    api: Arc<dyn PhotoApi>,
    request: FetchRequest,
    params: FetchParams,
    guard: LoadingGuard,
    task_tx: mpsc::UnboundedSender<TaskResult>,
) -> JoinHandle<()> {
    info!(
        query = request.query.term(),
        page = request.page,
        mode = ?request.mode,
        "Starting fetch cycle"
    );

    tokio::spawn(async move {
        let started = Instant::now();
        let result = run_fetch_cycle(api.as_ref(), &request, &params).await;
        drop(guard);

        let elapsed = started.elapsed();
        debug!(ok = result.is_ok(), ?elapsed, "Fetch cycle finished");

        if task_tx
            .send(TaskResult::FetchCycle {
                request,
                result,
                elapsed,
            })
            .is_err()
        {
            debug!("Event loop gone, fetch result dropped");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::scripted::{Reply, ScriptedApi};
    use crate::model::query_state::{LoadingFlag, QueryState};

    #[tokio::test]
    async fn reports_and_releases_loading() {
        let api: Arc<dyn PhotoApi> = Arc::new(ScriptedApi::pages_of(15));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let flag = LoadingFlag::default();
        let request = QueryState::new().initial_request();

        let handle = spawn_fetch_cycle(
            api,
            request.clone(),
            FetchParams::default(),
            flag.acquire(),
            tx,
        );
        assert!(flag.is_loading());

        match rx.recv().await {
            Some(TaskResult::FetchCycle {
                request: got,
                result,
                ..
            }) => {
                assert_eq!(got, request);
                assert_eq!(result.unwrap().photos.len(), 30);
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(!flag.is_loading());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn failure_still_releases_loading() {
        let api: Arc<dyn PhotoApi> = Arc::new(ScriptedApi::new([Reply::Fail(500), Reply::Fail(500)]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let flag = LoadingFlag::default();

        spawn_fetch_cycle(
            api,
            QueryState::new().initial_request(),
            FetchParams::default(),
            flag.acquire(),
            tx,
        );

        let Some(TaskResult::FetchCycle { result, .. }) = rx.recv().await else {
            panic!("no fetch result");
        };
        assert!(result.is_err());
        assert!(!flag.is_loading());
    }

    #[tokio::test]
    async fn aborted_cycle_releases_loading() {
        let api: Arc<dyn PhotoApi> = Arc::new(ScriptedApi::pages_of(15));
        let (tx, _rx) = mpsc::unbounded_channel();
        let flag = LoadingFlag::default();

        let handle = spawn_fetch_cycle(
            api,
            QueryState::new().initial_request(),
            FetchParams::default(),
            flag.acquire(),
            tx,
        );
        handle.abort();
        let _ = handle.await;
        assert!(!flag.is_loading());
    }
}
