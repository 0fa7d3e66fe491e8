use log::info;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::city::{City, SourceCatalog};
use super::error::Result;
use super::filters::FilterSpec;
use super::records::{self, RecordSet};

/// Reads city trip logs from a data directory.
#[derive(Debug, Clone)]
pub struct Loader {
    data_dir: PathBuf,
    catalog: SourceCatalog,
}

impl Loader {
    pub fn new(data_dir: impl Into<PathBuf>, catalog: SourceCatalog) -> Self {
        Loader {
            data_dir: data_dir.into(),
            catalog,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolves a city name to its trip log. Unknown names fail with
    /// `UnknownSource` before anything is read.
    pub fn resolve(&self, source_id: &str) -> Result<(City, PathBuf)> {
        let city: City = source_id.parse()?;
        Ok((city, self.data_dir.join(self.catalog.file_name(city))))
    }

    /// Loads every trip of `source_id` and keeps those matching `filter`.
    pub fn load(&self, source_id: &str, filter: &FilterSpec) -> Result<RecordSet> {
        let (city, path) = self.resolve(source_id)?;
        info!("Loading {city} trips from {}", path.display());
        let file = fs_err::File::open(&path)?;
        let trips = records::parse(BufReader::new(file))?;
        let total = trips.len();

        let trips = trips.filter(filter);
        info!(
            "{} of {} {city} trips match ({filter})",
            trips.len(),
            total
        );
        Ok(trips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Month;
    use crate::error::AnalysisError;
    use crate::records::OptionalColumn;

    const NYC_SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
5688089,2017-06-11 14:55:05,2017-06-11 15:08:21,795,Suffolk St & Stanton St,W Broadway & Spring St,Subscriber,Male,1998.0
4096714,2017-05-11 15:30:11,2017-05-11 15:41:43,692,Lexington Ave & E 63 St,1 Ave & E 78 St,Subscriber,Male,1981.0
2173887,2017-03-29 13:26:26,2017-03-29 13:48:31,1325,1 Pl & Clinton St,Henry St & Degraw St,Subscriber,Male,1987.0
";

    fn data_dir_with(test_name: &str, file_name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bikeshare-stats-{test_name}-{}",
            std::process::id()
        ));
        fs_err::create_dir_all(&dir).unwrap();
        fs_err::write(dir.join(file_name), contents).unwrap();
        dir
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let loader = Loader::new("/nonexistent", SourceCatalog::default());
        let err = loader.load("metropolis", &FilterSpec::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownSource(_)));
    }

    #[test]
    fn test_load_reads_and_filters_city_file() {
        let dir = data_dir_with("load", "new_york_city.csv", NYC_SAMPLE);
        let loader = Loader::new(&dir, SourceCatalog::default());

        let all = loader.load("New York City", &FilterSpec::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.has_column(OptionalColumn::BirthYear));

        let june = loader
            .load("new york city", &FilterSpec::parse("june", "all").unwrap())
            .unwrap();
        assert_eq!(june.len(), 1);
        assert_eq!(june.records()[0].month, Month::June);
        assert_eq!(june.records()[0].start_station, "Suffolk St & Stanton St");

        fs_err::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_uses_catalog_file_names() {
        let dir = data_dir_with("catalog", "chi.csv", NYC_SAMPLE);
        let catalog = SourceCatalog::from_toml_str("chicago = \"chi.csv\"").unwrap();
        let loader = Loader::new(&dir, catalog);
        assert_eq!(loader.resolve("chicago").unwrap().1, dir.join("chi.csv"));
        assert_eq!(loader.load("chicago", &FilterSpec::default()).unwrap().len(), 3);
        fs_err::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_source_file_is_an_io_error() {
        let loader = Loader::new("/nonexistent", SourceCatalog::default());
        let err = loader.load("washington", &FilterSpec::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
