use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::country::CountryTable;
use crate::member::Member;

pub const MEMBERS_FILE_NAME: &str = "alumni.json";
pub const COUNTRIES_FILE_NAME: &str = "countries.json";

#[derive(Debug, Serialize, Deserialize)]
struct MembersDocument {
    alumni: Vec<Member>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CountriesDocument {
    countries: CountryTable,
}

#[derive(Debug)]
pub enum DatasetError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            DatasetError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io { source, .. } => Some(source),
            DatasetError::Parse { source, .. } => Some(source),
        }
    }
}

/// Parsed member list plus the country reference table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub members: Vec<Member>,
    pub countries: CountryTable,
}

impl Dataset {
    /// Load `alumni.json` and `countries.json` from `root`.
    pub fn load_dir(root: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let root = root.as_ref();
        let members_path = root.join(MEMBERS_FILE_NAME);
        let countries_path = root.join(COUNTRIES_FILE_NAME);

        let members = read_json::<MembersDocument>(&members_path)?.alumni;
        let countries = read_json::<CountriesDocument>(&countries_path)?.countries;

        let dataset = Self { members, countries };
        dataset.log_summary(root);
        Ok(dataset)
    }

    pub fn from_json_strs(members: &str, countries: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            members: members_from_json_str(members)?,
            countries: countries_from_json_str(countries)?,
        })
    }

    fn log_summary(&self, root: &Path) {
        let without_position = self
            .members
            .iter()
            .filter(|m| m.position().is_none())
            .count();
        info!(
            root = %root.display(),
            members = self.members.len(),
            countries = self.countries.len(),
            "dataset loaded"
        );
        if without_position > 0 {
            warn!(
                count = without_position,
                "members without valid coordinates will not appear in directional counts"
            );
        }
    }
}

pub fn members_from_json_str(payload: &str) -> Result<Vec<Member>, serde_json::Error> {
    serde_json::from_str::<MembersDocument>(payload).map(|d| d.alumni)
}

pub fn countries_from_json_str(payload: &str) -> Result<CountryTable, serde_json::Error> {
    serde_json::from_str::<CountriesDocument>(payload).map(|d| d.countries)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let payload = fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&payload).map_err(|e| DatasetError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
