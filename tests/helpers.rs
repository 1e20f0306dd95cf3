// Shared test helpers for store setup and test data creation.
//
// Every helper uses the in-process store, so tests run without a MongoDB server.

use bullet_trains::storage::MemoryClient;
use bullet_trains::{BulletTrain, ConnectionManager};

/// Creates a connected manager with `databases` bound.
/// Returns the client too so tests can simulate outages.
#[allow(dead_code)] // Used by other test files
pub async fn connected_manager(databases: &[&str]) -> (ConnectionManager, MemoryClient) {
    let client = MemoryClient::new();
    let mut manager = ConnectionManager::new("memory://", None);
    manager
        .connect_with(client.clone())
        .await
        .expect("Failed to connect to in-process store");
    manager
        .connect_all(databases)
        .await
        .expect("Failed to bind databases");
    (manager, client)
}

/// Creates a record without an identifier.
#[allow(dead_code)] // Used by other test files
pub fn bullet_train(velocity: i64, capacity: i64) -> BulletTrain {
    BulletTrain {
        id: None,
        velocity,
        capacity,
        altitude: 5,
        last_lat: 7.0,
        last_long: 3.0,
    }
}

/// Strips identifiers so records can be compared with what was inserted.
#[allow(dead_code)] // Used by other test files
pub fn without_ids(records: &[BulletTrain]) -> Vec<BulletTrain> {
    records
        .iter()
        .map(|r| BulletTrain { id: None, ..r.clone() })
        .collect()
}
