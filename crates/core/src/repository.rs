//! Persistence of the saved deck collection.
//!
//! The collection is a single JSON blob under one well-known key, loaded and
//! saved wholesale. Loading never fails: missing or corrupt data degrades to
//! an empty collection. Saving is last-writer-wins.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Deck;

/// Key the collection is stored under.
pub const COLLECTION_KEY: &str = "saved_presentations";

/// Storage capability for the saved deck collection.
pub trait DeckRepository {
    /// Load the whole collection. Absent or unreadable data yields an empty list.
    fn load(&self) -> Vec<Deck>;

    /// Replace the whole stored collection.
    fn save(&self, decks: &[Deck]) -> Result<()>;
}

/// Decode a stored collection blob, substituting an empty list if corrupt.
pub fn decode_collection(blob: &str) -> Vec<Deck> {
    if blob.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<Deck>>(blob) {
        Ok(mut decks) => {
            for deck in &mut decks {
                deck.reindex();
            }
            decks
        }
        Err(e) => {
            log::warn!("Saved presentations are corrupt, starting empty: {}", e);
            Vec::new()
        }
    }
}

/// Encode a collection for storage.
pub fn encode_collection(decks: &[Deck]) -> Result<String> {
    Ok(serde_json::to_string(decks)?)
}

/// Collection stored as `saved_presentations.json` in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Store the collection under the well-known key inside `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", COLLECTION_KEY)),
        }
    }

    /// Store the collection at an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the collection file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeckRepository for JsonFileRepository {
    fn load(&self) -> Vec<Deck> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => decode_collection(&blob),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!(
                    "Failed to read {}, starting empty: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn save(&self, decks: &[Deck]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, encode_collection(decks)?)?;
        log::debug!("Saved {} decks to {}", decks.len(), self.path.display());
        Ok(())
    }
}

/// Collection held as an in-memory blob, the way browser storage holds it.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    blob: RefCell<Option<String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing (possibly corrupt) blob.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(blob.into())),
        }
    }

    /// The currently stored blob.
    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl DeckRepository for MemoryRepository {
    fn load(&self) -> Vec<Deck> {
        self.blob
            .borrow()
            .as_deref()
            .map(decode_collection)
            .unwrap_or_default()
    }

    fn save(&self, decks: &[Deck]) -> Result<()> {
        let encoded = encode_collection(decks)?;
        *self.blob.borrow_mut() = Some(encoded);
        Ok(())
    }
}

/// Deck collection operations on top of a repository.
///
/// Every mutation is a full read-modify-write. Decks are matched by id only.
#[derive(Debug)]
pub struct DeckStore<R> {
    repository: R,
}

impl<R: DeckRepository> DeckStore<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// All saved decks in stored order.
    pub fn list(&self) -> Vec<Deck> {
        self.repository.load()
    }

    /// Look up a saved deck by id.
    pub fn get(&self, id: &str) -> Option<Deck> {
        self.repository.load().into_iter().find(|d| d.id() == id)
    }

    /// Replace the saved deck with the same id, or append it.
    pub fn upsert(&self, deck: &Deck) -> Result<()> {
        let mut decks = self.repository.load();

        match decks.iter_mut().find(|d| d.id() == deck.id()) {
            Some(existing) => *existing = deck.clone(),
            None => decks.push(deck.clone()),
        }

        self.repository.save(&decks)
    }

    /// Remove the deck with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut decks = self.repository.load();
        let before = decks.len();
        decks.retain(|d| d.id() != id);

        if decks.len() == before {
            return Ok(false);
        }

        self.repository.save(&decks)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DeckBuilder;
    use crate::types::SlideEdit;

    fn deck(title: &str) -> Deck {
        DeckBuilder::new()
            .build(title, "Slide 1: Intro\nhello\n\nSlide 2: End\nbye")
            .unwrap()
    }

    #[test]
    fn test_absent_collection_is_empty() {
        let store = DeckStore::new(MemoryRepository::new());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_corrupt_collection_is_empty() {
        let store = DeckStore::new(MemoryRepository::with_blob("{not json"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_upsert_appends_then_replaces() {
        let store = DeckStore::new(MemoryRepository::new());
        let mut first = deck("First");
        let second = deck("Second");

        store.upsert(&first).unwrap();
        store.upsert(&second).unwrap();

        first.edit_slide(0, SlideEdit::title("Opening")).unwrap();
        store.upsert(&first).unwrap();

        let decks = store.list();
        assert_eq!(decks.len(), 2);
        assert_eq!(decks[0].id(), first.id());
        assert_eq!(decks[0].slides[0].title, "Opening");
        assert_eq!(decks[1].title, "Second");
    }

    #[test]
    fn test_upsert_over_corrupt_collection_recovers() {
        let store = DeckStore::new(MemoryRepository::with_blob("garbage"));
        let d = deck("Fresh");
        store.upsert(&d).unwrap();

        assert_eq!(store.list(), vec![d]);
    }

    #[test]
    fn test_get_and_delete() {
        let store = DeckStore::new(MemoryRepository::new());
        let a = deck("A");
        let b = deck("B");
        store.upsert(&a).unwrap();
        store.upsert(&b).unwrap();

        assert_eq!(store.get(b.id()).map(|d| d.title), Some("B".to_string()));
        assert!(store.delete(a.id()).unwrap());
        assert!(!store.delete(a.id()).unwrap());
        assert!(store.get(a.id()).is_none());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_round_trip_preserves_raw_text() {
        let store = DeckStore::new(MemoryRepository::new());
        let raw = "**Slide 1: A**\r\n\r\n**Content:**\r\nalpha  ";
        let d = DeckBuilder::new().build("Raw", raw).unwrap();
        store.upsert(&d).unwrap();

        let loaded = store.get(d.id()).unwrap();
        assert_eq!(loaded.raw_text(), raw);
        assert_eq!(loaded.created_at(), d.created_at());
    }

    #[test]
    fn test_file_repository_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested"));
        assert!(repo.path().ends_with("saved_presentations.json"));

        let store = DeckStore::new(repo);
        assert!(store.list().is_empty());

        let d = deck("On disk");
        store.upsert(&d).unwrap();

        let reopened = DeckStore::new(JsonFileRepository::new(dir.path().join("nested")));
        assert_eq!(reopened.list(), vec![d]);
    }

    #[test]
    fn test_file_repository_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        fs::write(repo.path(), "[{\"id\": 5}]").unwrap();

        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_loaded_decks_are_reindexed() {
        let blob = r#"[{
            "id": "x",
            "title": "Legacy",
            "createdAt": "2024-01-01T00:00:00Z",
            "slides": [{"title": "A", "content": ""}, {"title": "B", "content": ""}],
            "result": ""
        }]"#;
        let decks = decode_collection(blob);
        assert_eq!(decks[0].slides[1].order, 1);
    }
}
