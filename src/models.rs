//! Bullet train record, staging by route, and flattening for display.

use std::collections::HashMap;
use std::fmt;

use mongodb::bson::oid::ObjectId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// One synthetic telemetry sample.
///
/// `id` is assigned by the store on insert and omitted when absent so the
/// store can generate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletTrain {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub velocity: i64,
    pub capacity: i64,
    pub altitude: i64,
    pub last_lat: f64,
    pub last_long: f64,
}

impl BulletTrain {
    /// Builds a record from five random bytes, each widened into one field (0-255).
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let bytes: [u8; 5] = rng.random();
        BulletTrain {
            id: None,
            velocity: i64::from(bytes[0]),
            capacity: i64::from(bytes[1]),
            altitude: i64::from(bytes[2]),
            last_lat: f64::from(bytes[3]),
            last_long: f64::from(bytes[4]),
        }
    }

    /// Identifier as 24 lowercase hex characters, or empty when not yet assigned.
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn field(&self, field: BulletTrainField) -> Cell {
        match field {
            BulletTrainField::Id => Cell::Text(self.id_hex()),
            BulletTrainField::Velocity => self.velocity.into(),
            BulletTrainField::Capacity => self.capacity.into(),
            BulletTrainField::Altitude => self.altitude.into(),
            BulletTrainField::LastLat => self.last_lat.into(),
            BulletTrainField::LastLong => self.last_long.into(),
        }
    }

    /// Projects the record into display cells, in header order.
    pub fn flatten(&self) -> Vec<Cell> {
        BulletTrainField::iter().map(|f| self.field(f)).collect()
    }
}

/// Generates `count` random records.
pub fn generate_bullet_trains<R: Rng>(count: usize, rng: &mut R) -> Vec<BulletTrain> {
    (0..count).map(|_| BulletTrain::random(rng)).collect()
}

/// Report columns. `Display` yields the header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum BulletTrainField {
    #[strum(serialize = "ID")]
    Id,
    Velocity,
    Capacity,
    Altitude,
    LastLat,
    LastLong,
}

/// Header row matching [`BulletTrain::flatten`].
pub fn bullet_train_headers() -> Vec<String> {
    BulletTrainField::iter().map(|f| f.to_string()).collect()
}

/// A single display value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Cell::Text(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(n) => write!(f, "{n}"),
            Cell::Float(x) => write!(f, "{x:.1}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Float(x)
    }
}

/// Records staged per route (collection name) for tabulation.
#[derive(Debug, Default)]
pub struct Routes {
    route: HashMap<String, Vec<BulletTrain>>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `records` to the route, keeping their order.
    pub fn stage(&mut self, collection: &str, records: impl IntoIterator<Item = BulletTrain>) {
        self.route
            .entry(collection.to_string())
            .or_default()
            .extend(records);
    }

    pub fn records(&self, collection: &str) -> &[BulletTrain] {
        self.route.get(collection).map(Vec::as_slice).unwrap_or(&[])
    }

    /// One flattened row per staged record, in insertion order. Unknown routes yield no rows.
    pub fn tabulate(&self, collection: &str) -> Vec<Vec<Cell>> {
        self.records(collection)
            .iter()
            .map(BulletTrain::flatten)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const KNOWN_ID: &str = "65a1b2c3d4e5f60718293a4b";

    fn sample(velocity: i64) -> BulletTrain {
        BulletTrain {
            id: None,
            velocity,
            capacity: 10,
            altitude: 5,
            last_lat: 7.0,
            last_long: 3.0,
        }
    }

    #[test]
    fn test_flatten_is_header_ordered() {
        let train = BulletTrain {
            id: Some(ObjectId::parse_str(KNOWN_ID).expect("valid hex")),
            ..sample(200)
        };
        assert_eq!(
            train.flatten(),
            vec![
                Cell::from(KNOWN_ID),
                Cell::Int(200),
                Cell::Int(10),
                Cell::Int(5),
                Cell::Float(7.0),
                Cell::Float(3.0),
            ]
        );
    }

    #[test]
    fn test_flatten_without_id_renders_empty_text() {
        assert_eq!(sample(1).flatten()[0], Cell::Text(String::new()));
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            bullet_train_headers(),
            vec!["ID", "Velocity", "Capacity", "Altitude", "LastLat", "LastLong"]
        );
        assert_eq!(bullet_train_headers().len(), sample(1).flatten().len());
    }

    #[test]
    fn test_tabulate_unknown_route_is_empty() {
        let routes = Routes::new();
        assert!(routes.tabulate("chicago_to_florida").is_empty());
    }

    #[test]
    fn test_tabulate_empty_staging_is_empty() {
        let mut routes = Routes::new();
        routes.stage("chicago_to_florida", Vec::new());
        assert!(routes.tabulate("chicago_to_florida").is_empty());
    }

    #[test]
    fn test_tabulate_preserves_insertion_order() {
        let mut routes = Routes::new();
        routes.stage("r", vec![sample(3), sample(1)]);
        routes.stage("r", vec![sample(2)]);
        routes.stage("other", vec![sample(99)]);

        let velocities: Vec<Cell> = routes
            .tabulate("r")
            .into_iter()
            .map(|row| row[1].clone())
            .collect();
        assert_eq!(velocities, vec![Cell::Int(3), Cell::Int(1), Cell::Int(2)]);
    }

    #[test]
    fn test_random_fields_stay_within_byte_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for train in generate_bullet_trains(50, &mut rng) {
            assert!(train.id.is_none());
            for value in [train.velocity, train.capacity, train.altitude] {
                assert!((0..=255).contains(&value));
            }
            for value in [train.last_lat, train.last_long] {
                assert!((0.0..=255.0).contains(&value));
                assert_eq!(value.fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_serialization_omits_missing_id() {
        let document = mongodb::bson::to_document(&sample(4)).expect("encode");
        assert!(!document.contains_key("_id"));
        assert!(matches!(document.get_i64("velocity"), Ok(4)));
        assert!(matches!(document.get_f64("last_lat"), Ok(lat) if lat == 7.0));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Int(200).to_string(), "200");
        assert_eq!(Cell::Float(7.0).to_string(), "7.0");
        assert_eq!(Cell::from("abc").to_string(), "abc");
        assert!(Cell::Float(1.0).is_numeric());
        assert!(!Cell::from("x").is_numeric());
    }
}
