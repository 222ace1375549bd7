//! Saving and loading the fixture layout together with its item map.
//!
//! The on-disk shape is a single JSON document:
//! `{ "fixtureLayout": { "<id>": Fixture, .. }, "itemMap": { "<edge>": [[[Item]]] } }`.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Fixture, ItemMap, Layout};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save worker is not running")]
    WorkerGone,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    #[serde(default)]
    fixture_layout: BTreeMap<String, Fixture>,
    #[serde(default)]
    item_map: ItemMap,
}

impl From<&Layout> for LayoutFile {
    fn from(layout: &Layout) -> Self {
        Self {
            fixture_layout: layout
                .fixtures
                .iter()
                .map(|f| (f.id.clone(), f.clone()))
                .collect(),
            item_map: layout.item_map.clone(),
        }
    }
}

impl From<LayoutFile> for Layout {
    fn from(file: LayoutFile) -> Self {
        Self {
            fixtures: file
                .fixture_layout
                .into_iter()
                .map(|(id, mut fixture)| {
                    fixture.id = id;
                    fixture
                })
                .collect(),
            item_map: file.item_map,
        }
    }
}

pub fn to_json(layout: &Layout) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&LayoutFile::from(layout))?)
}

/// Parses a saved document. Missing sections default to empty.
pub fn from_json(s: &str) -> Result<Layout, PersistError> {
    if s.trim().is_empty() {
        return Ok(Layout::default());
    }
    let file: LayoutFile = serde_json::from_str(s)?;
    Ok(file.into())
}

/// Where layouts are saved to and loaded from.
pub trait LayoutRepository: Send {
    fn save(&self, layout: &Layout) -> Result<(), PersistError>;

    /// Returns an empty layout if nothing has been saved yet.
    fn load(&self) -> Result<Layout, PersistError>;

    fn describe(&self) -> String;
}

#[derive(Clone, Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl LayoutRepository for JsonFileRepository {
    fn save(&self, layout: &Layout) -> Result<(), PersistError> {
        let json = to_json(layout)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn load(&self) -> Result<Layout, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => from_json(&s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No saved layout at {}, starting empty", self.path.display());
                Ok(Layout::default())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug)]
pub struct SaveOutcome {
    pub target: String,
    pub result: Result<(), PersistError>,
}

enum WorkerMessage {
    Save {
        repo: Box<dyn LayoutRepository>,
        layout: Layout,
    },
    Shutdown,
}

/// Runs saves on a background thread so the canvas keeps responding.
///
/// Requests are handled in order; dropping the worker finishes queued saves
/// before the thread exits.
pub struct SaveWorker {
    request_tx: Sender<WorkerMessage>,
    result_rx: Receiver<SaveOutcome>,
    thread_handle: Option<JoinHandle<()>>,
    pending: usize,
}

impl SaveWorker {
    pub fn spawn() -> Result<Self, PersistError> {
        let (request_tx, request_rx) = mpsc::channel::<WorkerMessage>();
        let (result_tx, result_rx) = mpsc::channel::<SaveOutcome>();

        let thread_handle = thread::Builder::new()
            .name("layout-saver".to_string())
            .spawn(move || {
                log::debug!("Save worker started");
                Self::thread_loop(request_rx, result_tx);
                log::debug!("Save worker exiting");
            })
            .map_err(|source| PersistError::Io {
                path: PathBuf::new(),
                source,
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            pending: 0,
        })
    }

    fn thread_loop(request_rx: Receiver<WorkerMessage>, result_tx: Sender<SaveOutcome>) {
        while let Ok(message) = request_rx.recv() {
            match message {
                WorkerMessage::Save { repo, layout } => {
                    let target = repo.describe();
                    let result = repo.save(&layout);
                    match &result {
                        Ok(()) => log::info!("Saved layout to {target}"),
                        Err(e) => log::error!("Saving layout to {target} failed: {e}"),
                    }
                    if result_tx.send(SaveOutcome { target, result }).is_err() {
                        break;
                    }
                }
                WorkerMessage::Shutdown => break,
            }
        }
    }

    /// Queues a save of a snapshot. The caller keeps editing meanwhile.
    pub fn request_save(
        &mut self,
        repo: Box<dyn LayoutRepository>,
        layout: Layout,
    ) -> Result<(), PersistError> {
        self.request_tx
            .send(WorkerMessage::Save { repo, layout })
            .map_err(|_| PersistError::WorkerGone)?;
        self.pending += 1;
        Ok(())
    }

    /// Finished saves since the last poll.
    pub fn poll(&mut self) -> Vec<SaveOutcome> {
        let mut done = Vec::new();
        loop {
            match self.result_rx.try_recv() {
                Ok(outcome) => {
                    self.pending = self.pending.saturating_sub(1);
                    done.push(outcome);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.pending = 0;
                    break;
                }
            }
        }
        done
    }

    pub fn is_saving(&self) -> bool {
        self.pending > 0
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        let _ = self.request_tx.send(WorkerMessage::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use std::time::{Duration, Instant};

    fn sample_layout() -> Layout {
        let mut fixtures = crate::editor::fixtures::FixtureStore::new();
        fixtures.add_fixture();
        fixtures.add_fixture();
        let mut item_map = ItemMap::new();
        item_map.insert(
            "f1-edge-0".to_string(),
            vec![vec![vec![Item::new("P001", "Coffee")]], vec![vec![]]],
        );
        Layout {
            fixtures: fixtures.fixtures().to_vec(),
            item_map,
        }
    }

    #[test]
    fn json_uses_keyed_fixture_layout() {
        let json = to_json(&sample_layout()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["fixtureLayout"]["f2"]["points"].is_array());
        assert_eq!(value["itemMap"]["f1-edge-0"][0][0][0]["id"], "P001");
    }

    #[test]
    fn empty_or_partial_documents_load_as_empty() {
        assert!(from_json("").unwrap().is_empty());
        assert!(from_json("{}").unwrap().is_empty());
        let only_items = from_json(r#"{"itemMap":{"e":[[[]]]}}"#).unwrap();
        assert!(only_items.fixtures.is_empty());
        assert_eq!(only_items.item_map.len(), 1);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(from_json("{ nope"), Err(PersistError::Json(_))));
    }

    #[test]
    fn file_repository_saves_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested").join("layout.json"));
        let layout = sample_layout();
        repo.save(&layout).unwrap();
        assert_eq!(repo.load().unwrap(), layout);
    }

    #[test]
    fn missing_file_loads_empty_layout() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("never-saved.json"));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn worker_reports_each_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        let mut worker = SaveWorker::spawn().unwrap();
        worker
            .request_save(Box::new(JsonFileRepository::new(&path)), sample_layout())
            .unwrap();
        assert!(worker.is_saving());

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = Vec::new();
        while outcomes.is_empty() && Instant::now() < deadline {
            outcomes = worker.poll();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].result.is_ok());
        assert!(!worker.is_saving());
        assert!(path.exists());
    }

    #[test]
    fn worker_surfaces_failures() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be written as a file
        let mut worker = SaveWorker::spawn().unwrap();
        worker
            .request_save(Box::new(JsonFileRepository::new(dir.path())), Layout::default())
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = Vec::new();
        while outcomes.is_empty() && Instant::now() < deadline {
            outcomes = worker.poll();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(matches!(outcomes[0].result, Err(PersistError::Io { .. })));
    }
}
