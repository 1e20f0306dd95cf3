//! Configuration constants.
//!
//! Defaults used by the CLI and by `Config::default()` for library callers.

/// Default MongoDB connection string.
/// The database is not part of the connect string; it is bound separately.
pub const DEFAULT_URI: &str = "mongodb://localhost:27017";

/// Default database to write the demo records into.
pub const DEFAULT_DATABASE: &str = "bullet_trains";

/// Default collection (one collection per route).
pub const DEFAULT_COLLECTION: &str = "chicago_to_florida";

/// Number of synthetic records generated per run.
pub const DEFAULT_RECORD_COUNT: usize = 10;

/// URI schemes that address a real MongoDB deployment and require credentials.
pub const MONGODB_SCHEMES: &[&str] = &["mongodb", "mongodb+srv"];

/// URI scheme selecting the in-process store (no server, no credentials).
pub const MEMORY_SCHEME: &str = "memory";

/// Database used for client-level liveness checks.
pub const ADMIN_DATABASE: &str = "admin";

/// Environment variables consulted by the CLI (also loaded from `.env`).
pub const ENV_URI: &str = "MONGO_URI";
pub const ENV_USERNAME: &str = "MONGO_USERNAME";
pub const ENV_PASSWORD: &str = "MONGO_PASSWORD";
