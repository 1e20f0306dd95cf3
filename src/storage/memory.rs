//! In-process document store.
//!
//! Selected with the `memory://` URI. Keeps every collection as an ordered
//! `Vec<Document>` keyed by `<database>.<collection>`, assigns `ObjectId`s on
//! insert and understands the subset of MongoDB the data-access helpers emit:
//! match-all finds, top-level equality filters and `$set` updates.
//!
//! Clones share state, so a caller can keep a handle to flip reachability and
//! observe how the helpers behave when pings fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use crate::error_handling::StoreError;
use crate::storage::query::UpdateSummary;

struct MemoryState {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    reachable: AtomicBool,
}

/// Client handle for the in-process store.
#[derive(Clone)]
pub struct MemoryClient {
    state: Arc<MemoryState>,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClient {
    /// Creates an empty, reachable store.
    pub fn new() -> Self {
        MemoryClient {
            state: Arc::new(MemoryState {
                collections: Mutex::new(HashMap::new()),
                reachable: AtomicBool::new(true),
            }),
        }
    }

    /// Simulates the server going away (or coming back). Pings fail while unreachable.
    pub fn set_reachable(&self, reachable: bool) {
        self.state.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Binds a database handle. Databases exist implicitly, like in MongoDB.
    pub fn database(&self, name: &str) -> MemoryDatabase {
        MemoryDatabase {
            name: name.to_string(),
            client: self.clone(),
        }
    }

    /// Client-level liveness check.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.check_reachable(crate::config::ADMIN_DATABASE)
    }

    /// Drops all stored data for this client and every clone of it.
    pub async fn shutdown(self) {
        self.collections().clear();
    }

    fn check_reachable(&self, database: &str) -> Result<(), StoreError> {
        if self.state.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Ping {
                database: database.to_string(),
                message: "server unreachable".to_string(),
            })
        }
    }

    fn collections(&self) -> MutexGuard<'_, HashMap<String, Vec<Document>>> {
        // A poisoned lock only means another test thread panicked mid-write
        self.state
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Database handle for the in-process store.
#[derive(Clone)]
pub struct MemoryDatabase {
    name: String,
    client: MemoryClient,
}

impl MemoryDatabase {
    /// Database name this handle is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Liveness check through this database.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.client.check_reachable(&self.name)
    }

    /// Stores one document, assigning `_id` when it is absent.
    pub async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson, StoreError> {
        let namespace = StoreError::namespace(&self.name, collection);
        let mut collections = self.client.collections();
        let stored = collections.entry(namespace.clone()).or_default();
        let (id, document) = with_object_id(document);
        if stored.iter().any(|existing| existing.get("_id") == Some(&id)) {
            return Err(StoreError::Insert {
                namespace,
                message: format!("duplicate key: _id {id}"),
            });
        }
        stored.push(document);
        debug!("stored 1 document in '{namespace}'");
        Ok(id)
    }

    /// Stores a batch. Ordered semantics: stops at the first duplicate, keeping
    /// everything stored before it.
    pub async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Bson>, StoreError> {
        let mut ids = Vec::with_capacity(documents.len());
        for document in documents {
            ids.push(self.insert_one(collection, document).await?);
        }
        Ok(ids)
    }

    /// Returns a copy of every document in the collection, in insertion order.
    pub async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let namespace = StoreError::namespace(&self.name, collection);
        Ok(self
            .client
            .collections()
            .get(&namespace)
            .cloned()
            .unwrap_or_default())
    }

    /// Applies `update` to the first document matching `filter`.
    pub async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError> {
        self.apply_update(collection, &filter, &update, false)
    }

    /// Applies `update` to every document matching `filter`.
    pub async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError> {
        self.apply_update(collection, &filter, &update, true)
    }

    fn apply_update(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        multi: bool,
    ) -> Result<UpdateSummary, StoreError> {
        let set = set_fields(update)?;
        let namespace = StoreError::namespace(&self.name, collection);
        let mut collections = self.client.collections();
        let mut summary = UpdateSummary::default();
        let Some(stored) = collections.get_mut(&namespace) else {
            return Ok(summary);
        };

        for document in stored.iter_mut().filter(|doc| matches_filter(doc, filter)) {
            summary.matched += 1;
            let mut changed = false;
            for (field, value) in set {
                if document.get(field) != Some(value) {
                    document.insert(field.clone(), value.clone());
                    changed = true;
                }
            }
            if changed {
                summary.modified += 1;
            }
            if !multi {
                break;
            }
        }
        Ok(summary)
    }
}

/// Puts `_id` first, generating one when missing, and returns it alongside the document.
fn with_object_id(document: Document) -> (Bson, Document) {
    let id = document
        .get("_id")
        .cloned()
        .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
    let mut stored = Document::new();
    stored.insert("_id", id.clone());
    for (key, value) in document {
        if key != "_id" {
            stored.insert(key, value);
        }
    }
    (id, stored)
}

/// Extracts the `$set` body; any other operator is rejected.
fn set_fields(update: &Document) -> Result<&Document, StoreError> {
    if let Some(operator) = update.keys().find(|key| key.as_str() != "$set") {
        return Err(StoreError::UnsupportedUpdate(operator.clone()));
    }
    update
        .get_document("$set")
        .map_err(|_| StoreError::UnsupportedUpdate("$set without a document body".to_string()))
}

/// Top-level field equality; an empty filter matches everything.
fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, expected)| {
        document
            .get(field)
            .is_some_and(|actual| values_equal(actual, expected))
    })
}

/// Equality with MongoDB's numeric semantics (an int32 10 matches an int64 10).
fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}
