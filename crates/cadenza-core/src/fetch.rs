//! Impulse-response fetchers.

use crate::platform::{FetchCallback, ImpulseFetcher};
use crate::{Error, Result};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::thread::JoinHandle;

type FetchJob = (String, FetchCallback);

/// Reads impulse responses from the local filesystem on a worker thread.
///
/// Locators are paths, optionally prefixed with `file://`, resolved against
/// the fetcher's root directory when relative.
pub struct FileFetcher {
    jobs: Option<Sender<FetchJob>>,
    worker: Option<JoinHandle<()>>,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let (jobs, job_rx) = crossbeam_channel::unbounded::<FetchJob>();

        let worker = std::thread::Builder::new()
            .name("cadenza-fetch".into())
            .spawn(move || {
                for (url, done) in job_rx {
                    let path = root.join(url.strip_prefix("file://").unwrap_or(&url));
                    let result = std::fs::read(&path).map_err(|e| Error::Fetch {
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                    tracing::debug!(?path, ok = result.is_ok(), "Fetched impulse response");
                    done(result);
                }
            })
            .map_err(|e| Error::Spawn(e.to_string()))?;

        Ok(Self {
            jobs: Some(jobs),
            worker: Some(worker),
        })
    }
}

impl ImpulseFetcher for FileFetcher {
    fn fetch(&self, url: &str, done: FetchCallback) {
        let Some(jobs) = &self.jobs else {
            return;
        };
        if let Err(err) = jobs.send((url.to_string(), done)) {
            let (url, done) = err.into_inner();
            done(Err(Error::Fetch {
                url,
                reason: "fetch worker has stopped".into(),
            }));
        }
    }
}

impl Drop for FileFetcher {
    fn drop(&mut self) {
        // Closing the channel lets the worker finish queued jobs and exit.
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.thread().id() != std::thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}

/// Serves bytes from memory. Requests queue until the host resolves them,
/// which makes load ordering explicit in tests.
#[derive(Default)]
pub struct MemoryFetcher {
    resources: Mutex<HashMap<String, Vec<u8>>>,
    pending: Mutex<Vec<FetchJob>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) -> &Self {
        self.resources.lock().insert(url.into(), bytes);
        self
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Complete every queued request. Unknown locators fail with
    /// [`Error::Fetch`]. Returns how many requests completed.
    pub fn resolve_pending(&self) -> usize {
        let due: Vec<FetchJob> = self.pending.lock().drain(..).collect();
        let count = due.len();
        for (url, done) in due {
            let bytes = self.resources.lock().get(&url).cloned();
            match bytes {
                Some(bytes) => done(Ok(bytes)),
                None => done(Err(Error::Fetch {
                    url,
                    reason: "not found".into(),
                })),
            }
        }
        count
    }
}

impl ImpulseFetcher for MemoryFetcher {
    fn fetch(&self, url: &str, done: FetchCallback) {
        self.pending.lock().push((url.to_string(), done));
    }
}

impl std::fmt::Debug for MemoryFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut urls: Vec<String> = self.resources.lock().keys().cloned().collect();
        urls.sort();
        f.debug_struct("MemoryFetcher")
            .field("resources", &urls)
            .field("pending", &self.pending())
            .finish()
    }
}
