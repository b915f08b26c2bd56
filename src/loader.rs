//! JSON snapshot loading
//!
//! A snapshot carries the location reference data, the level catalog and the
//! active participants handed over by the surrounding system:
//!
//! ```json
//! {
//!   "counties": [{"id": 1, "name": "Nairobi"}],
//!   "constituencies": [{"id": 10, "name": "Westlands", "county": 1}],
//!   "wards": [{"id": 100, "name": "Parklands", "constituency": 10}],
//!   "levels": [{"id": 1, "name": "Primary", "code": "PRI"}],
//!   "registered": [],
//!   "anonymous": []
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::level::{Level, LevelCatalog};
use crate::models::location::{Constituency, County, LocationHierarchy, Ward};
use crate::models::participant::{AnonymousEntry, Participant, Registered};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Raw snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub counties: Vec<County>,
    #[serde(default)]
    pub constituencies: Vec<Constituency>,
    #[serde(default)]
    pub wards: Vec<Ward>,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub registered: Vec<Registered>,
    #[serde(default)]
    pub anonymous: Vec<AnonymousEntry>,
}

/// A snapshot split into reference data and population
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub hierarchy: LocationHierarchy,
    pub levels: LevelCatalog,
    /// Registered teachers first, then fast entries, each in file order
    pub participants: Vec<Participant>,
}

impl Snapshot {
    /// Decode a snapshot from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Decode a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a snapshot file
    pub fn from_path(path: &Path) -> Result<Self> {
        let start = Instant::now();
        log_operation_start("Reading snapshot", path);
        let snapshot = Self::from_reader(BufReader::new(File::open(path)?))?;
        log_operation_complete(
            "read",
            path,
            snapshot.registered.len() + snapshot.anonymous.len(),
            start.elapsed(),
        );
        Ok(snapshot)
    }

    /// Build the hierarchy and level catalog, and gather the participants
    pub fn into_parts(self) -> Result<LoadedSnapshot> {
        let hierarchy = LocationHierarchy::builder()
            .extend(self.counties, self.constituencies, self.wards)?
            .build();
        let levels = LevelCatalog::from_levels(self.levels)?;
        let participants = self
            .registered
            .into_iter()
            .map(Participant::from)
            .chain(self.anonymous.into_iter().map(Participant::from))
            .collect();

        Ok(LoadedSnapshot {
            hierarchy,
            levels,
            participants,
        })
    }
}
