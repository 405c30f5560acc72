use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::Deserialize;

use crate::error::CatalogError;

static CATALOG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/catalogs");

const BUILTIN_CATALOG: &str = "invoker.json";

/// Number of orbs in every combo
pub const COMBO_LEN: usize = 3;

/// One of the three input tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orb {
    Quas,
    Wex,
    Exort,
}

impl Orb {
    /// Case-insensitive; anything outside q/w/e is not an orb
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(Orb::Quas),
            'w' => Some(Orb::Wex),
            'e' => Some(Orb::Exort),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Orb::Quas => 'q',
            Orb::Wex => 'w',
            Orb::Exort => 'e',
        }
    }
}

/// The fixed-length answer for one ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combo([Orb; COMBO_LEN]);

impl Combo {
    pub fn new(orbs: [Orb; COMBO_LEN]) -> Self {
        Self(orbs)
    }

    pub fn parse(s: &str) -> Option<Self> {
        let orbs = s.chars().map(Orb::from_char).collect::<Option<Vec<_>>>()?;
        let orbs: [Orb; COMBO_LEN] = orbs.try_into().ok()?;
        Some(Self(orbs))
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.0
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|orb| write!(f, "{}", orb.as_char()))
    }
}

#[derive(Deserialize, Debug)]
struct CatalogFile {
    name: String,
    abilities: Vec<AbilityEntry>,
}

#[derive(Deserialize, Debug)]
struct AbilityEntry {
    name: String,
    combo: String,
}

/// Read-only question bank: ability name -> combo
#[derive(Debug, Clone)]
pub struct Catalog {
    pub name: String,
    names: Vec<String>,
    combos: HashMap<String, Combo>,
}

impl Catalog {
    /// The Invoker catalog embedded in the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        let contents = CATALOG_DIR
            .get_file(BUILTIN_CATALOG)
            .and_then(|file| file.contents_utf8())
            .ok_or_else(|| CatalogError::NotFound(BUILTIN_CATALOG.to_string()))?;
        Self::from_json_str(contents)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_entries(
            file.name,
            file.abilities.into_iter().map(|a| (a.name, a.combo)),
        )
    }

    /// Builds a catalog, keeping entry order; names must be unique and combos valid
    pub fn from_entries<I, N, C>(name: impl Into<String>, entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(n, c)| {
                let n = n.into();
                match Combo::parse(c.as_ref()) {
                    Some(combo) => Ok((n, combo)),
                    None => Err(CatalogError::InvalidCombo {
                        name: n,
                        combo: c.as_ref().to_string(),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        if let Some(dup) = entries.iter().map(|(n, _)| n).duplicates().next() {
            return Err(CatalogError::DuplicateName(dup.clone()));
        }

        let names = entries.iter().map(|(n, _)| n.clone()).collect();
        let combos = entries.into_iter().collect();

        Ok(Self {
            name: name.into(),
            names,
            combos,
        })
    }

    /// Stable for the lifetime of the catalog
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn combo_for(&self, name: &str) -> Result<&Combo, CatalogError> {
        self.combos
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries in catalog order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Combo)> {
        self.names
            .iter()
            .filter_map(|n| self.combos.get(n).map(|c| (n.as_str(), c)))
    }
}
