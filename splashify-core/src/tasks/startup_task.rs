//! ``src/tasks/startup_task.rs``
//! Header content fetched once at startup: the logo photo and trending topics.
//! Both are decorative; failures are reported and otherwise ignored.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::{api::client::PhotoApi, controller::event_loop::TaskResult};

pub fn spawn_header_fetch(api: Arc<dyn PhotoApi>, task_tx: mpsc::UnboundedSender<TaskResult>) {
    tokio::spawn(async move {
        debug!("Loading header content");
        let (logo, topics) = tokio::join!(api.random_photo(), api.trending_topics());

        let _ = task_tx.send(TaskResult::Logo(logo));
        let _ = task_tx.send(TaskResult::Topics(topics));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{MAX_TRENDING_TOPICS, scripted::ScriptedApi};

    #[tokio::test]
    async fn sends_logo_then_topics() {
        let api: Arc<dyn PhotoApi> = Arc::new(ScriptedApi::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_header_fetch(api, tx);

        assert!(matches!(rx.recv().await, Some(TaskResult::Logo(Ok(_)))));
        match rx.recv().await {
            Some(TaskResult::Topics(Ok(topics))) => {
                assert_eq!(topics.len(), MAX_TRENDING_TOPICS);
                assert_eq!(topics[0], "Wallpapers");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
