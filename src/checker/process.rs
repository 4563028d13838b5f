use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{Instrument, Span};

use crate::checker::event::PrIssueEvent;
use crate::checker::{handle_pr_issue_event, RepositoryClientLoader};

pub struct CheckProcess {
    pub tx: mpsc::Sender<PrIssueEvent>,
    pub process: Pin<Box<dyn Future<Output = ()> + Send>>,
}

/// Creates a future with a process that continuously receives webhook events and reacts to
/// them. Every event is handled in its own task, so events do not wait for each other.
///
/// The process ends once all senders are dropped and all in-flight events have been handled.
pub fn create_check_process<Loader>(loader: Loader) -> CheckProcess
where
    Loader: RepositoryClientLoader + 'static,
{
    let (tx, mut rx) = mpsc::channel::<PrIssueEvent>(1024);

    let service = async move {
        let loader = Arc::new(loader);
        let mut tasks = JoinSet::new();

        while let Some(event) = rx.recv().await {
            let loader = Arc::clone(&loader);
            let span = tracing::info_span!("Event", repo = event.repository().to_string());
            tracing::debug!("Received event: {event:#?}");

            tasks.spawn(
                async move {
                    if let Err(error) = handle_pr_issue_event(event, loader.as_ref()).await {
                        handle_root_error(Span::current(), error);
                    }
                }
                .instrument(span),
            );
            // Reap tasks that have already finished
            while let Some(result) = tasks.try_join_next() {
                log_join_result(result);
            }
        }
        while let Some(result) = tasks.join_next().await {
            log_join_result(result);
        }
    };

    CheckProcess {
        tx,
        process: Box::pin(service),
    }
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(error) = result {
        tracing::error!("Event handling task has failed: {error:?}");
    }
}

fn handle_root_error(span: Span, error: Error) {
    span.in_scope(|| {
        tracing::error!("Error: {error:?}");
    });
}
