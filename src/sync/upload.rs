// SPDX-License-Identifier: MPL-2.0
//! Upload coordinator.
//!
//! [`UploadQueue`] is the in-session list of upload tasks and the progress of
//! the current run. [`run_batch`] performs a run against a [`MediaHost`]:
//! every file is retried on its own up to the attempt ceiling, with a fixed
//! pause between attempts, and a file that exhausts its attempts never aborts
//! the others. Progress flows back as [`UploadEvent`]s that the queue applies.

use crate::application::port::{HostError, MediaHost, ProgressFn, UploadFile};
use crate::domain::gallery::{
    FileKey, MaxAttempts, RetryDelay, UploadConcurrency, UploadStatus, UploadTask,
};
use futures_util::StreamExt;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Retry and scheduling policy of an upload run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UploadPolicy {
    pub max_attempts: MaxAttempts,
    pub retry_delay: RetryDelay,
    pub concurrency: UploadConcurrency,
}

/// A local file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub key: FileKey,
    pub path: PathBuf,
}

impl SelectedFile {
    /// Reads name and size of a file on disk.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            key: FileKey::new(name, metadata.len()),
            path: path.to_path_buf(),
        })
    }
}

/// One file of an upload run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub key: FileKey,
    pub source: PathBuf,
}

/// Progress reported by a running batch.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    AttemptStarted {
        key: FileKey,
        attempt: u32,
    },
    BytesSent {
        key: FileKey,
        sent: u64,
        total: u64,
    },
    AttemptFailed {
        key: FileKey,
        attempt: u32,
        error: HostError,
    },
    Succeeded {
        key: FileKey,
        url: String,
        attempts: u32,
    },
    Failed {
        key: FileKey,
        attempts: u32,
    },
    BatchFinished(BatchSummary),
}

/// Final tally of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Outcome of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded { url: String, attempts: u32 },
    Failed { attempts: u32 },
}

// =============================================================================
// Coordinator
// =============================================================================

/// Uploads one file, retrying until it succeeds or the ceiling is reached.
///
/// Network failures, non-2xx responses and unreadable files are all treated
/// as a failed attempt; only the log tells them apart.
pub async fn upload_with_retry(
    host: &dyn MediaHost,
    job: &UploadJob,
    policy: UploadPolicy,
    events: &UnboundedSender<UploadEvent>,
) -> UploadOutcome {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let _ = events.send(UploadEvent::AttemptStarted {
            key: job.key.clone(),
            attempt,
        });

        let result = match tokio::fs::read(&job.source).await {
            Ok(bytes) => {
                let file = UploadFile {
                    name: job.key.name.clone(),
                    bytes: Arc::new(bytes),
                };
                host.upload(file, byte_progress(&job.key, events)).await
            }
            Err(err) => Err(HostError::Io(err.to_string())),
        };

        match result {
            Ok(url) => {
                tracing::info!(file = %job.key, attempt, %url, "upload succeeded");
                let _ = events.send(UploadEvent::Succeeded {
                    key: job.key.clone(),
                    url: url.clone(),
                    attempts: attempt,
                });
                return UploadOutcome::Succeeded {
                    url,
                    attempts: attempt,
                };
            }
            Err(error) => {
                tracing::warn!(file = %job.key, attempt, %error, "upload attempt failed");
                let _ = events.send(UploadEvent::AttemptFailed {
                    key: job.key.clone(),
                    attempt,
                    error,
                });

                if policy.max_attempts.is_exhausted_by(attempt) {
                    tracing::error!(file = %job.key, attempts = attempt, "upload gave up");
                    let _ = events.send(UploadEvent::Failed {
                        key: job.key.clone(),
                        attempts: attempt,
                    });
                    return UploadOutcome::Failed { attempts: attempt };
                }

                tokio::time::sleep(policy.retry_delay.as_duration()).await;
            }
        }
    }
}

/// Runs every job of a batch, at most `policy.concurrency` at a time, and
/// finishes with [`UploadEvent::BatchFinished`].
pub async fn run_batch(
    host: Arc<dyn MediaHost>,
    jobs: Vec<UploadJob>,
    policy: UploadPolicy,
    events: UnboundedSender<UploadEvent>,
) -> BatchSummary {
    tracing::info!(
        files = jobs.len(),
        concurrency = policy.concurrency.value(),
        "upload batch started"
    );

    let outcomes: Vec<UploadOutcome> = futures_util::stream::iter(jobs)
        .map(|job| {
            let host = Arc::clone(&host);
            let events = events.clone();
            async move { upload_with_retry(host.as_ref(), &job, policy, &events).await }
        })
        .buffer_unordered(policy.concurrency.value())
        .collect()
        .await;

    let summary = outcomes
        .iter()
        .fold(BatchSummary::default(), |mut summary, outcome| {
            match outcome {
                UploadOutcome::Succeeded { .. } => summary.succeeded += 1,
                UploadOutcome::Failed { .. } => summary.failed += 1,
            }
            summary
        });

    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "upload batch finished"
    );
    let _ = events.send(UploadEvent::BatchFinished(summary));
    summary
}

fn byte_progress(key: &FileKey, events: &UnboundedSender<UploadEvent>) -> ProgressFn {
    let key = key.clone();
    let events = events.clone();
    Arc::new(move |sent, total| {
        let _ = events.send(UploadEvent::BytesSent {
            key: key.clone(),
            sent,
            total,
        });
    })
}

// =============================================================================
// UploadQueue
// =============================================================================

/// What the upload status line shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    /// The user asked to upload without any uploadable file.
    NothingSelected,
    Uploading {
        completed: usize,
        total: usize,
    },
    Finished(BatchSummary),
}

/// Byte progress of the file most recently reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct FileProgress {
    pub key: FileKey,
    pub sent: u64,
    pub total: u64,
}

impl FileProgress {
    /// Fraction of the file sent, in `0.0..=1.0`. An empty file counts as sent.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            (self.sent as f64 / self.total as f64).clamp(0.0, 1.0) as f32
        }
    }
}

#[derive(Debug, Default)]
struct RunState {
    total: usize,
    outstanding: HashSet<FileKey>,
}

/// Append-only list of upload tasks plus the progress of the current run.
#[derive(Debug, Default)]
pub struct UploadQueue {
    tasks: Vec<UploadTask>,
    run: Option<RunState>,
    phase: UploadPhase,
    file_progress: Option<FileProgress>,
}

impl UploadQueue {
    /// Creates a queue from restored tasks (typically the persisted snapshot).
    #[must_use]
    pub fn with_tasks(tasks: Vec<UploadTask>) -> Self {
        let mut queue = Self::default();
        for task in tasks {
            if queue.position(&task.key).is_none() {
                queue.tasks.push(task);
            }
        }
        queue
    }

    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn file_progress(&self) -> Option<&FileProgress> {
        self.file_progress.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Completed files over total files of the current or last run.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        match self.phase {
            UploadPhase::Uploading { completed, total } if total > 0 => {
                completed as f32 / total as f32
            }
            UploadPhase::Finished(_) => 1.0,
            _ => 0.0,
        }
    }

    fn position(&self, key: &FileKey) -> Option<usize> {
        self.tasks.iter().position(|task| &task.key == key)
    }

    /// Adds the selected files, skipping any `(name, size)` already queued.
    ///
    /// A queued task restored without its local file gets the new path
    /// attached, which makes it uploadable again. Returns the number of
    /// tasks that changed.
    pub fn enqueue(&mut self, files: impl IntoIterator<Item = SelectedFile>) -> usize {
        let mut changed = 0;
        for file in files {
            match self.position(&file.key) {
                Some(index) => {
                    let task = &mut self.tasks[index];
                    if task.source.is_none() {
                        task.source = Some(file.path);
                        changed += 1;
                    }
                }
                None => {
                    self.tasks.push(UploadTask::new(file.key, file.path));
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Starts a run over every uploadable task.
    ///
    /// Returns `None` when a run is already in progress or nothing can be
    /// uploaded; in the latter case the phase becomes `NothingSelected`.
    pub fn start_run(&mut self) -> Option<Vec<UploadJob>> {
        if self.is_running() {
            return None;
        }

        let mut jobs = Vec::new();
        for task in self.tasks.iter_mut().filter(|task| task.is_uploadable()) {
            let Some(source) = task.source.clone() else {
                continue;
            };
            task.status = UploadStatus::Pending;
            task.attempts = 0;
            jobs.push(UploadJob {
                key: task.key.clone(),
                source,
            });
        }

        if jobs.is_empty() {
            self.phase = UploadPhase::NothingSelected;
            return None;
        }

        self.run = Some(RunState {
            total: jobs.len(),
            outstanding: jobs.iter().map(|job| job.key.clone()).collect(),
        });
        self.phase = UploadPhase::Uploading {
            completed: 0,
            total: jobs.len(),
        };
        self.file_progress = None;
        Some(jobs)
    }

    /// Applies a progress event. Returns true when the persisted snapshot
    /// is out of date.
    pub fn apply(&mut self, event: &UploadEvent) -> bool {
        match event {
            UploadEvent::AttemptStarted { key, attempt } => {
                if let Some(index) = self.position(key) {
                    self.tasks[index].attempts = *attempt;
                }
                self.file_progress = Some(FileProgress {
                    key: key.clone(),
                    sent: 0,
                    total: key.size,
                });
                false
            }
            UploadEvent::BytesSent { key, sent, total } => {
                self.file_progress = Some(FileProgress {
                    key: key.clone(),
                    sent: *sent,
                    total: *total,
                });
                false
            }
            UploadEvent::AttemptFailed { key, attempt, .. } => {
                if let Some(index) = self.position(key) {
                    self.tasks[index].attempts = *attempt;
                }
                true
            }
            UploadEvent::Succeeded { key, url, attempts } => {
                if let Some(index) = self.position(key) {
                    let task = &mut self.tasks[index];
                    task.status = UploadStatus::Success;
                    task.url = Some(url.clone());
                    task.attempts = *attempts;
                }
                self.complete(key);
                true
            }
            UploadEvent::Failed { key, attempts } => {
                if let Some(index) = self.position(key) {
                    let task = &mut self.tasks[index];
                    task.status = UploadStatus::Failed;
                    task.attempts = *attempts;
                }
                self.complete(key);
                true
            }
            UploadEvent::BatchFinished(summary) => {
                self.run = None;
                self.phase = UploadPhase::Finished(*summary);
                self.file_progress = None;
                true
            }
        }
    }

    fn complete(&mut self, key: &FileKey) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if run.outstanding.remove(key) {
            self.phase = UploadPhase::Uploading {
                completed: run.total - run.outstanding.len(),
                total: run.total,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::FakeMediaHost;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    fn selected(name: &str, size: u64) -> SelectedFile {
        SelectedFile {
            key: FileKey::new(name, size),
            path: PathBuf::from(format!("/photos/{name}")),
        }
    }

    fn fast_policy() -> UploadPolicy {
        UploadPolicy {
            retry_delay: RetryDelay::from_millis(0),
            ..UploadPolicy::default()
        }
    }

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> UploadJob {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write fixture");
        UploadJob {
            key: FileKey::new(name, content.len() as u64),
            source: path,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<UploadEvent>) -> Vec<UploadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn enqueue_skips_duplicate_name_and_size() {
        let mut queue = UploadQueue::default();
        assert_eq!(queue.enqueue([selected("a.jpg", 10), selected("b.jpg", 20)]), 2);
        assert_eq!(queue.enqueue([selected("a.jpg", 10)]), 0);
        assert_eq!(queue.enqueue([selected("a.jpg", 10), selected("a.jpg", 10)]), 0);
        assert_eq!(queue.tasks().len(), 2);
    }

    #[test]
    fn same_name_with_other_size_is_a_new_task() {
        let mut queue = UploadQueue::default();
        queue.enqueue([selected("a.jpg", 10), selected("a.jpg", 11)]);
        assert_eq!(queue.tasks().len(), 2);
    }

    #[test]
    fn reselecting_restored_task_reattaches_source() {
        let mut restored = UploadTask::new(FileKey::new("a.jpg", 10), PathBuf::new());
        restored.source = None;
        let mut queue = UploadQueue::with_tasks(vec![restored]);
        assert!(queue.start_run().is_none());

        assert_eq!(queue.enqueue([selected("a.jpg", 10)]), 1);
        assert_eq!(queue.tasks().len(), 1);
        assert_eq!(queue.start_run().map(|jobs| jobs.len()), Some(1));
    }

    #[test]
    fn start_run_without_files_reports_nothing_selected() {
        let mut queue = UploadQueue::default();
        assert!(queue.start_run().is_none());
        assert_eq!(queue.phase(), UploadPhase::NothingSelected);
    }

    #[test]
    fn start_run_is_a_noop_while_running() {
        let mut queue = UploadQueue::default();
        queue.enqueue([selected("a.jpg", 10)]);
        assert!(queue.start_run().is_some());
        assert!(queue.start_run().is_none());
        assert!(queue.is_running());
    }

    #[test]
    fn start_run_skips_successful_tasks_and_resets_attempts() {
        let mut queue = UploadQueue::default();
        queue.enqueue([selected("a.jpg", 10), selected("b.jpg", 20)]);
        let jobs = queue.start_run().expect("jobs");
        queue.apply(&UploadEvent::Succeeded {
            key: jobs[0].key.clone(),
            url: "https://cdn.test/a.jpg".into(),
            attempts: 1,
        });
        queue.apply(&UploadEvent::Failed {
            key: jobs[1].key.clone(),
            attempts: 5,
        });
        queue.apply(&UploadEvent::BatchFinished(BatchSummary {
            succeeded: 1,
            failed: 1,
        }));

        let rerun = queue.start_run().expect("failed task is retried");
        assert_eq!(rerun.len(), 1);
        assert_eq!(rerun[0].key.name, "b.jpg");
        assert_eq!(queue.tasks()[1].attempts, 0);
        assert_eq!(queue.tasks()[1].status, UploadStatus::Pending);
    }

    #[test]
    fn completed_counter_is_monotonic_and_ignores_repeats() {
        let mut queue = UploadQueue::default();
        queue.enqueue([selected("a.jpg", 1), selected("b.jpg", 2), selected("c.jpg", 3)]);
        let jobs = queue.start_run().expect("jobs");

        let mut last = 0;
        let events = [
            UploadEvent::Failed {
                key: jobs[1].key.clone(),
                attempts: 5,
            },
            UploadEvent::Succeeded {
                key: jobs[0].key.clone(),
                url: "u".into(),
                attempts: 1,
            },
            UploadEvent::Succeeded {
                key: jobs[0].key.clone(),
                url: "u".into(),
                attempts: 1,
            },
            UploadEvent::Succeeded {
                key: jobs[2].key.clone(),
                url: "u".into(),
                attempts: 2,
            },
        ];
        for event in &events {
            queue.apply(event);
            let UploadPhase::Uploading { completed, total } = queue.phase() else {
                panic!("expected uploading phase");
            };
            assert!(completed >= last);
            assert!(completed <= total);
            last = completed;
        }
        assert_eq!(last, 3);
        assert!((queue.ratio() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn file_progress_ratio_handles_empty_files() {
        let progress = FileProgress {
            key: FileKey::new("a", 0),
            sent: 0,
            total: 0,
        };
        assert!((progress.ratio() - 1.0).abs() < f32::EPSILON);

        let half = FileProgress {
            key: FileKey::new("a", 10),
            sent: 5,
            total: 10,
        };
        assert!((half.ratio() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn new_attempt_starts_at_zero_percent() {
        let mut queue = UploadQueue::default();
        queue.enqueue([selected("big.jpg", 10 * 1024 * 1024)]);
        let jobs = queue.start_run().expect("jobs");

        queue.apply(&UploadEvent::AttemptStarted {
            key: jobs[0].key.clone(),
            attempt: 1,
        });

        let progress = queue.file_progress().expect("file progress");
        assert_eq!(progress.total, 10 * 1024 * 1024);
        assert!(progress.ratio().abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn retry_stops_at_first_success() {
        let dir = tempdir().expect("temp dir");
        let job = write_file(dir.path(), "a.jpg", b"abc");
        let host = FakeMediaHost::new().fail_uploads("a.jpg", 2);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let outcome = upload_with_retry(&host, &job, fast_policy(), &tx).await;

        assert_eq!(
            outcome,
            UploadOutcome::Succeeded {
                url: "https://cdn.test/upload/a.jpg".into(),
                attempts: 3
            }
        );
        let failures = drain(&mut rx)
            .into_iter()
            .filter(|event| matches!(event, UploadEvent::AttemptFailed { .. }))
            .count();
        assert_eq!(failures, 2);
    }

    #[tokio::test]
    async fn retry_gives_up_after_ceiling() {
        let dir = tempdir().expect("temp dir");
        let job = write_file(dir.path(), "a.jpg", b"abc");
        let host = FakeMediaHost::new().fail_uploads("a.jpg", u32::MAX);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let outcome = upload_with_retry(&host, &job, fast_policy(), &tx).await;

        assert_eq!(outcome, UploadOutcome::Failed { attempts: 5 });
        assert_eq!(host.upload_calls("a.jpg"), 5);
        assert!(matches!(
            drain(&mut rx).last(),
            Some(UploadEvent::Failed { attempts: 5, .. })
        ));
    }

    #[tokio::test]
    async fn unreadable_file_counts_as_failed_attempt() {
        let job = UploadJob {
            key: FileKey::new("missing.jpg", 1),
            source: PathBuf::from("/definitely/not/here/missing.jpg"),
        };
        let host = FakeMediaHost::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let policy = UploadPolicy {
            max_attempts: MaxAttempts::new(2),
            ..fast_policy()
        };

        let outcome = upload_with_retry(&host, &job, policy, &tx).await;

        assert_eq!(outcome, UploadOutcome::Failed { attempts: 2 });
        assert_eq!(host.upload_calls("missing.jpg"), 0);
        assert!(drain(&mut rx).iter().any(|event| matches!(
            event,
            UploadEvent::AttemptFailed {
                error: HostError::Io(_),
                ..
            }
        )));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_waits_between_attempts() {
        let dir = tempdir().expect("temp dir");
        let job = write_file(dir.path(), "a.jpg", b"abc");
        let host = FakeMediaHost::new().fail_uploads("a.jpg", 2);
        let (tx, _rx) = mpsc::unbounded_channel();
        let started = tokio::time::Instant::now();

        let _ = upload_with_retry(&host, &job, UploadPolicy::default(), &tx).await;

        assert!(started.elapsed() >= std::time::Duration::from_secs(2));
    }

    #[tokio::test]
    async fn batch_isolates_failures_and_reports_summary() {
        let dir = tempdir().expect("temp dir");
        let ok = write_file(dir.path(), "ok.jpg", b"good");
        let bad = write_file(dir.path(), "bad.jpg", b"broken");
        let host = FakeMediaHost::new().fail_uploads("bad.jpg", u32::MAX);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let summary = run_batch(Arc::new(host), vec![bad, ok], fast_policy(), tx).await;

        assert_eq!(
            summary,
            BatchSummary {
                succeeded: 1,
                failed: 1
            }
        );
        let events = drain(&mut rx);
        assert!(matches!(
            events.last(),
            Some(UploadEvent::BatchFinished(BatchSummary {
                succeeded: 1,
                failed: 1
            }))
        ));
        assert!(events
            .iter()
            .any(|event| matches!(event, UploadEvent::BytesSent { sent: 4, total: 4, .. })));
    }

    #[tokio::test]
    async fn concurrent_batch_uploads_every_file() {
        let dir = tempdir().expect("temp dir");
        let jobs: Vec<UploadJob> = (0..6)
            .map(|i| write_file(dir.path(), &format!("{i}.jpg"), b"x"))
            .collect();
        let host = Arc::new(FakeMediaHost::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let policy = UploadPolicy {
            concurrency: UploadConcurrency::new(3),
            ..fast_policy()
        };

        let summary = run_batch(host.clone(), jobs, policy, tx).await;

        assert_eq!(summary.succeeded, 6);
        assert_eq!(host.total_upload_calls(), 6);
    }
}
