//! Store backend selection.
//!
//! `StoreClient` and `DatabaseHandle` dispatch to the MongoDB driver or to the
//! in-process store depending on the URI scheme.

use mongodb::bson::{Bson, Document};

use crate::config::{uri_scheme, MEMORY_SCHEME};
use crate::error_handling::StoreError;
use crate::storage::connection::Credentials;
use crate::storage::memory::{MemoryClient, MemoryDatabase};
use crate::storage::mongo::{MongoClient, MongoDatabase};
use crate::storage::query::UpdateSummary;

/// An open client session.
#[derive(Clone)]
pub enum StoreClient {
    Mongo(MongoClient),
    Memory(MemoryClient),
}

impl From<MemoryClient> for StoreClient {
    fn from(client: MemoryClient) -> Self {
        StoreClient::Memory(client)
    }
}

impl From<MongoClient> for StoreClient {
    fn from(client: MongoClient) -> Self {
        StoreClient::Mongo(client)
    }
}

impl StoreClient {
    /// Creates a client for `uri` without contacting the server.
    pub async fn open(uri: &str, credentials: Option<&Credentials>) -> Result<Self, StoreError> {
        if uri_scheme(uri) == Some(MEMORY_SCHEME) {
            return Ok(MemoryClient::new().into());
        }
        Ok(MongoClient::connect(uri, credentials).await?.into())
    }

    pub fn database(&self, name: &str) -> DatabaseHandle {
        match self {
            StoreClient::Mongo(client) => DatabaseHandle::Mongo(client.database(name)),
            StoreClient::Memory(client) => DatabaseHandle::Memory(client.database(name)),
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            StoreClient::Mongo(client) => client.ping().await,
            StoreClient::Memory(client) => client.ping().await,
        }
    }

    pub async fn shutdown(self) {
        match self {
            StoreClient::Mongo(client) => client.shutdown().await,
            StoreClient::Memory(client) => client.shutdown().await,
        }
    }
}

/// A database bound under a `StoreClient`.
#[derive(Clone)]
pub enum DatabaseHandle {
    Mongo(MongoDatabase),
    Memory(MemoryDatabase),
}

impl DatabaseHandle {
    pub fn name(&self) -> &str {
        match self {
            DatabaseHandle::Mongo(db) => db.name(),
            DatabaseHandle::Memory(db) => db.name(),
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            DatabaseHandle::Mongo(db) => db.ping().await,
            DatabaseHandle::Memory(db) => db.ping().await,
        }
    }

    pub async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson, StoreError> {
        match self {
            DatabaseHandle::Mongo(db) => db.insert_one(collection, document).await,
            DatabaseHandle::Memory(db) => db.insert_one(collection, document).await,
        }
    }

    pub async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Bson>, StoreError> {
        match self {
            DatabaseHandle::Mongo(db) => db.insert_many(collection, documents).await,
            DatabaseHandle::Memory(db) => db.insert_many(collection, documents).await,
        }
    }

    pub async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        match self {
            DatabaseHandle::Mongo(db) => db.find_all(collection).await,
            DatabaseHandle::Memory(db) => db.find_all(collection).await,
        }
    }

    pub async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError> {
        match self {
            DatabaseHandle::Mongo(db) => db.update_one(collection, filter, update).await,
            DatabaseHandle::Memory(db) => db.update_one(collection, filter, update).await,
        }
    }

    pub async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError> {
        match self {
            DatabaseHandle::Mongo(db) => db.update_many(collection, filter, update).await,
            DatabaseHandle::Memory(db) => db.update_many(collection, filter, update).await,
        }
    }
}
