//! In-memory navigation database loaded from CSV files.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::NavDataProvider;
use super::error::NavError;
use super::types::{AirportRecord, NavRecord};

/// The multi-record tables of a [`NavDatabase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavTable {
    Navaids,
    Fixes,
    LowAirways,
    HighAirways,
}

impl NavTable {
    pub const ALL: [NavTable; 4] = [
        NavTable::Navaids,
        NavTable::Fixes,
        NavTable::LowAirways,
        NavTable::HighAirways,
    ];

    /// CSV file name inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            NavTable::Navaids => "navaids.csv",
            NavTable::Fixes => "waypoints.csv",
            NavTable::LowAirways => "airways.csv",
            NavTable::HighAirways => "high_airways.csv",
        }
    }
}

/// Airport CSV file name inside the data directory.
pub const AIRPORTS_FILE: &str = "airports.csv";

/// Read-only navigation tables held in memory.
///
/// Lookups are exact, case-sensitive identifier matches. Records sharing an
/// identifier are kept in file order.
#[derive(Debug, Clone, Default)]
pub struct NavDatabase {
    airports: HashMap<String, AirportRecord>,
    tables: HashMap<NavTable, HashMap<String, Vec<NavRecord>>>,
}

impl NavDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all tables from CSV files in `dir`.
    ///
    /// Files that do not exist leave their table empty; files that exist but
    /// cannot be parsed are an error.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, NavError> {
        let dir = dir.as_ref();
        let mut db = Self::new();

        for airport in read_csv::<AirportRecord>(&dir.join(AIRPORTS_FILE))? {
            db.insert_airport(airport);
        }

        for table in NavTable::ALL {
            for record in read_csv::<NavRecord>(&dir.join(table.file_name()))? {
                db.insert(table, record);
            }
        }

        info!(
            dir = %dir.display(),
            airports = db.airports.len(),
            navaids = db.count(NavTable::Navaids),
            fixes = db.count(NavTable::Fixes),
            low_airways = db.count(NavTable::LowAirways),
            high_airways = db.count(NavTable::HighAirways),
            "loaded navigation data"
        );

        Ok(db)
    }

    /// Add an airport, replacing any with the same identifier.
    pub fn insert_airport(&mut self, airport: AirportRecord) {
        self.airports.insert(airport.ident.clone(), airport);
    }

    /// Append a record to a table.
    pub fn insert(&mut self, table: NavTable, record: NavRecord) {
        self.tables
            .entry(table)
            .or_default()
            .entry(record.ident.clone())
            .or_default()
            .push(record);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, table: NavTable, record: NavRecord) -> Self {
        self.insert(table, record);
        self
    }

    /// Builder form of [`insert_airport`](Self::insert_airport).
    pub fn with_airport(mut self, airport: AirportRecord) -> Self {
        self.insert_airport(airport);
        self
    }

    /// Number of distinct identifiers in a table.
    pub fn count(&self, table: NavTable) -> usize {
        self.tables.get(&table).map_or(0, HashMap::len)
    }

    pub fn get_airport(&self, ident: &str) -> Option<&AirportRecord> {
        self.airports.get(ident)
    }

    /// All records with `ident` in `table`.
    pub fn lookup(&self, table: NavTable, ident: &str) -> &[NavRecord] {
        self.tables
            .get(&table)
            .and_then(|t| t.get(ident))
            .map_or(&[], Vec::as_slice)
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, NavError> {
    if !path.is_file() {
        debug!(path = %path.display(), "navigation data file absent, table left empty");
        return Ok(Vec::new());
    }

    let csv_error = |source| NavError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_error)
}

impl NavDataProvider for NavDatabase {
    async fn airport(&self, ident: &str) -> Result<Option<AirportRecord>, NavError> {
        Ok(self.get_airport(ident).cloned())
    }

    async fn navaid(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        Ok(self.lookup(NavTable::Navaids, ident).to_vec())
    }

    async fn fix_or_waypoint(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        Ok(self.lookup(NavTable::Fixes, ident).to_vec())
    }

    async fn low_airway(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        Ok(self.lookup(NavTable::LowAirways, ident).to_vec())
    }

    async fn high_airway(&self, ident: &str) -> Result<Vec<NavRecord>, NavError> {
        Ok(self.lookup(NavTable::HighAirways, ident).to_vec())
    }
}
