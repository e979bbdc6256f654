//! Single background worker thread executing sync commands in FIFO order.

use super::command::{SyncCommand, SyncKind};
use super::{MutationId, SyncError};
use crate::repo::BoardRepository;
use log::{error, info, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const WORKER_THREAD_NAME: &str = "selfmap-sync";

struct SyncRequest {
    mutation_id: MutationId,
    command: SyncCommand,
}

/// Completion report for one submitted command.
#[derive(Debug)]
pub struct SyncOutcome {
    pub mutation_id: MutationId,
    pub kind: SyncKind,
    pub result: Result<(), SyncError>,
}

/// Owner-side handle of the sync worker.
///
/// Dropping the handle closes the queue; the worker finishes the commands
/// already queued and exits.
pub struct SyncHandle {
    requests: Option<Sender<SyncRequest>>,
    outcomes: Receiver<SyncOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl SyncHandle {
    /// Moves `repo` onto a new worker thread.
    ///
    /// # Errors
    /// - Returns an error when the OS refuses to spawn the thread.
    pub fn spawn<R>(repo: R) -> std::io::Result<Self>
    where
        R: BoardRepository + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<SyncRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<SyncOutcome>();

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(repo, request_rx, outcome_tx))?;

        info!("event=sync_worker_start module=sync status=ok");
        Ok(Self {
            requests: Some(request_tx),
            outcomes: outcome_rx,
            worker: Some(worker),
        })
    }

    /// Queues one command without waiting for it.
    ///
    /// # Errors
    /// - Returns `SyncError::WorkerStopped` when the worker has exited.
    pub fn submit(&self, mutation_id: MutationId, command: SyncCommand) -> Result<(), SyncError> {
        let sender = self.requests.as_ref().ok_or(SyncError::WorkerStopped)?;
        sender
            .send(SyncRequest {
                mutation_id,
                command,
            })
            .map_err(|_| SyncError::WorkerStopped)
    }

    /// Drains outcomes that are already available, never blocking.
    pub fn try_outcomes(&self) -> Vec<SyncOutcome> {
        self.outcomes.try_iter().collect()
    }

    /// Waits up to `timeout` for the next outcome.
    pub fn next_outcome(&self, timeout: Duration) -> Option<SyncOutcome> {
        match self.outcomes.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("event=sync_worker_stop module=sync status=error error_code=worker_panicked");
            }
        }
    }
}

fn run_worker<R: BoardRepository>(
    repo: R,
    requests: Receiver<SyncRequest>,
    outcomes: Sender<SyncOutcome>,
) {
    for request in requests {
        let kind = request.command.kind();
        let started_at = Instant::now();
        let result = request.command.execute(&repo).map_err(SyncError::from);

        match &result {
            Ok(()) => info!(
                "event=sync_command module=sync status=ok kind={} mutation_id={} duration_ms={}",
                kind.as_str(),
                request.mutation_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=sync_command module=sync status=error kind={} mutation_id={} duration_ms={} error={}",
                kind.as_str(),
                request.mutation_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        // The owner may already be gone; remaining commands still run.
        let _ = outcomes.send(SyncOutcome {
            mutation_id: request.mutation_id,
            kind,
            result,
        });
    }
    info!("event=sync_worker_stop module=sync status=ok");
}

#[cfg(test)]
mod tests {
    use super::SyncHandle;
    use crate::db::open_db_in_memory;
    use crate::model::evidence::EvidencePatch;
    use crate::model::traits::TraitRecord;
    use crate::repo::SqliteBoardRepository;
    use crate::sync::{SyncCommand, SyncError, SyncKind};
    use std::time::Duration;

    fn spawn_memory_worker() -> SyncHandle {
        let conn = open_db_in_memory().unwrap();
        SyncHandle::spawn(SqliteBoardRepository::try_new(conn).unwrap()).unwrap()
    }

    #[test]
    fn outcomes_come_back_in_order_with_their_command_kind() {
        let sync = spawn_memory_worker();
        sync.submit(
            1,
            SyncCommand::UpsertTrait(TraitRecord {
                id: "t1".to_string(),
                name: "Calm".to_string(),
            }),
        )
        .unwrap();
        sync.submit(
            2,
            SyncCommand::UpdateEvidence {
                id: "missing".to_string(),
                patch: EvidencePatch::content("x"),
            },
        )
        .unwrap();

        let first = sync.next_outcome(Duration::from_secs(5)).unwrap();
        assert_eq!(first.mutation_id, 1);
        assert_eq!(first.kind, SyncKind::UpsertTrait);
        assert!(first.result.is_ok());

        let second = sync.next_outcome(Duration::from_secs(5)).unwrap();
        assert_eq!(second.mutation_id, 2);
        assert_eq!(second.kind, SyncKind::UpdateEvidence);
        assert!(matches!(second.result, Err(SyncError::Repo(_))));
    }
}
