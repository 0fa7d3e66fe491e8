use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::error::{AnalysisError, Result};

const CATALOG_FILE_NAME: &str = "cities.toml";

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub fn name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Name safe to use in output file names.
    pub fn slug(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new_york_city",
            City::Washington => "washington",
        }
    }

    fn default_file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" => Ok(City::NewYorkCity),
            "washington" => Ok(City::Washington),
            // Accept the file-name style spelling too
            "new_york_city" => Ok(City::NewYorkCity),
            _ => Err(AnalysisError::UnknownSource(s.to_string())),
        }
    }
}

/// File names of each city's trip log, relative to the data directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCatalog {
    chicago: String,
    new_york_city: String,
    washington: String,
}

/// Optional overrides read from `cities.toml`. Only the three known cities
/// may appear, e.g.
///
/// ```toml
/// chicago = "chicago_2017.csv"
/// new_york_city = "nyc.csv"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogOverrides {
    chicago: Option<String>,
    new_york_city: Option<String>,
    washington: Option<String>,
}

impl Default for SourceCatalog {
    fn default() -> Self {
        SourceCatalog {
            chicago: City::Chicago.default_file_name().to_string(),
            new_york_city: City::NewYorkCity.default_file_name().to_string(),
            washington: City::Washington.default_file_name().to_string(),
        }
    }
}

impl SourceCatalog {
    pub fn file_name(&self, city: City) -> &str {
        match city {
            City::Chicago => &self.chicago,
            City::NewYorkCity => &self.new_york_city,
            City::Washington => &self.washington,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let overrides: CatalogOverrides = toml::from_str(text)?;
        let defaults = SourceCatalog::default();
        Ok(SourceCatalog {
            chicago: overrides.chicago.unwrap_or(defaults.chicago),
            new_york_city: overrides.new_york_city.unwrap_or(defaults.new_york_city),
            washington: overrides.washington.unwrap_or(defaults.washington),
        })
    }
}

/// Loads the source catalog from `{config_dir}/cities.toml`, falling back to
/// the default file names when the file does not exist.
pub fn read_catalog(config_dir: &Path) -> Result<SourceCatalog> {
    let path = config_dir.join(CATALOG_FILE_NAME);
    if !path.exists() {
        debug!("No {} found, using default source files", path.display());
        return Ok(SourceCatalog::default());
    }
    info!("Reading source catalog from {}", path.display());
    let text = fs_err::read_to_string(&path)?;
    SourceCatalog::from_toml_str(&text)
}
