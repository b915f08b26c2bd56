//! Administrative location hierarchy
//!
//! Locations form a three-level tree: County → Constituency → Ward. Names are
//! only unique within their parent, so every lookup goes through the stable
//! integer ids. Parent links are optional because the reference data is not
//! guaranteed to be complete; a broken chain resolves to `None` instead of
//! failing.

use std::fmt;
use std::sync::OnceLock;

use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SwapEngineError};

macro_rules! location_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

location_id!(
    /// Identifier of a county (root of the hierarchy)
    CountyId
);
location_id!(
    /// Identifier of a constituency
    ConstituencyId
);
location_id!(
    /// Identifier of a ward (leaf of the hierarchy)
    WardId
);

/// A county record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
    pub id: CountyId,
    pub name: String,
}

/// A constituency record with its (possibly missing) parent county
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constituency {
    pub id: ConstituencyId,
    pub name: String,
    #[serde(default)]
    pub county: Option<CountyId>,
}

/// A ward record with its (possibly missing) parent constituency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    pub id: WardId,
    pub name: String,
    #[serde(default)]
    pub constituency: Option<ConstituencyId>,
}

/// A resolved current location, as precise as the source data allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPath {
    pub county: CountyId,
    pub constituency: Option<ConstituencyId>,
    pub ward: Option<WardId>,
}

impl LocationPath {
    /// A path known only down to the county
    #[must_use]
    pub const fn county_only(county: CountyId) -> Self {
        Self {
            county,
            constituency: None,
            ward: None,
        }
    }
}

static GLOBAL_HIERARCHY: OnceLock<LocationHierarchy> = OnceLock::new();

/// Read-only County → Constituency → Ward tree
#[derive(Debug, Clone, Default)]
pub struct LocationHierarchy {
    counties: FxHashMap<CountyId, County>,
    constituencies: FxHashMap<ConstituencyId, Constituency>,
    wards: FxHashMap<WardId, Ward>,
}

impl LocationHierarchy {
    /// Create a new builder for constructing a hierarchy
    #[must_use]
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::default()
    }

    /// Install the process-wide hierarchy. This can only happen once.
    pub fn install_global(hierarchy: Self) -> Result<&'static Self> {
        GLOBAL_HIERARCHY
            .set(hierarchy)
            .map_err(|_| SwapEngineError::HierarchyAlreadyLoaded)?;
        Self::global()
    }

    /// The process-wide hierarchy installed with [`Self::install_global`]
    pub fn global() -> Result<&'static Self> {
        GLOBAL_HIERARCHY
            .get()
            .ok_or(SwapEngineError::HierarchyNotLoaded)
    }

    #[must_use]
    pub fn county(&self, id: CountyId) -> Option<&County> {
        self.counties.get(&id)
    }

    #[must_use]
    pub fn constituency(&self, id: ConstituencyId) -> Option<&Constituency> {
        self.constituencies.get(&id)
    }

    #[must_use]
    pub fn ward(&self, id: WardId) -> Option<&Ward> {
        self.wards.get(&id)
    }

    /// Parent county of a constituency, if the chain is intact
    #[must_use]
    pub fn constituency_county(&self, id: ConstituencyId) -> Option<CountyId> {
        self.constituencies
            .get(&id)?
            .county
            .filter(|county| self.counties.contains_key(county))
    }

    /// County a ward ultimately belongs to
    ///
    /// Returns `None` when the ward is unknown, has no constituency, or its
    /// constituency has no county.
    #[must_use]
    pub fn ancestor_county(&self, ward: WardId) -> Option<CountyId> {
        let constituency = self.wards.get(&ward)?.constituency?;
        self.constituency_county(constituency)
    }

    /// Resolve a ward to the full path above it
    #[must_use]
    pub fn resolve_ward(&self, ward: WardId) -> Option<LocationPath> {
        let constituency = self.wards.get(&ward)?.constituency?;
        let county = self.constituency_county(constituency)?;
        Some(LocationPath {
            county,
            constituency: Some(constituency),
            ward: Some(ward),
        })
    }

    /// County name for display, falling back to the id
    #[must_use]
    pub fn county_name(&self, id: CountyId) -> String {
        self.counties
            .get(&id)
            .map_or_else(|| format!("county #{id}"), |c| c.name.clone())
    }

    #[must_use]
    pub fn county_count(&self) -> usize {
        self.counties.len()
    }

    #[must_use]
    pub fn ward_count(&self) -> usize {
        self.wards.len()
    }
}

/// Builder for [`LocationHierarchy`]
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    hierarchy: LocationHierarchy,
}

impl HierarchyBuilder {
    /// Add a county
    pub fn county(mut self, id: u32, name: impl Into<String>) -> Result<Self> {
        let id = CountyId(id);
        if self.hierarchy.counties.contains_key(&id) {
            return Err(SwapEngineError::DuplicateLocation { kind: "county", id: id.0 });
        }
        self.hierarchy.counties.insert(
            id,
            County {
                id,
                name: name.into(),
            },
        );
        Ok(self)
    }

    /// Add a constituency under an optional county
    pub fn constituency(
        mut self,
        id: u32,
        name: impl Into<String>,
        county: Option<u32>,
    ) -> Result<Self> {
        let id = ConstituencyId(id);
        if self.hierarchy.constituencies.contains_key(&id) {
            return Err(SwapEngineError::DuplicateLocation {
                kind: "constituency",
                id: id.0,
            });
        }
        self.hierarchy.constituencies.insert(
            id,
            Constituency {
                id,
                name: name.into(),
                county: county.map(CountyId),
            },
        );
        Ok(self)
    }

    /// Add a ward under an optional constituency
    pub fn ward(
        mut self,
        id: u32,
        name: impl Into<String>,
        constituency: Option<u32>,
    ) -> Result<Self> {
        let id = WardId(id);
        if self.hierarchy.wards.contains_key(&id) {
            return Err(SwapEngineError::DuplicateLocation { kind: "ward", id: id.0 });
        }
        self.hierarchy.wards.insert(
            id,
            Ward {
                id,
                name: name.into(),
                constituency: constituency.map(ConstituencyId),
            },
        );
        Ok(self)
    }

    /// Add already-decoded records, as loaded from a snapshot
    pub fn extend(
        mut self,
        counties: Vec<County>,
        constituencies: Vec<Constituency>,
        wards: Vec<Ward>,
    ) -> Result<Self> {
        for c in counties {
            self = self.county(c.id.0, c.name)?;
        }
        for c in constituencies {
            self = self.constituency(c.id.0, c.name, c.county.map(|id| id.0))?;
        }
        for w in wards {
            self = self.ward(w.id.0, w.name, w.constituency.map(|id| id.0))?;
        }
        Ok(self)
    }

    /// Finish the hierarchy. Dangling parent ids are kept but logged; they
    /// resolve to `None` at lookup time.
    #[must_use]
    pub fn build(self) -> LocationHierarchy {
        let h = self.hierarchy;
        for c in h.constituencies.values() {
            if let Some(county) = c.county {
                if !h.counties.contains_key(&county) {
                    warn!("Constituency {} references unknown county {}", c.id, county);
                }
            }
        }
        for w in h.wards.values() {
            if let Some(constituency) = w.constituency {
                if !h.constituencies.contains_key(&constituency) {
                    warn!(
                        "Ward {} references unknown constituency {}",
                        w.id, constituency
                    );
                }
            }
        }
        h
    }
}
