//! One pretty-printed JSON file per date: `<dir>/YYYY-MM-DD.json`.

use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::date_record::DateRecord;
use crate::error::{VenueCalError, VenueCalResult};
use crate::event::{DATE_FORMAT, parse_date};
use crate::store::RecordStore;

#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonDirStore { dir: dir.into() }
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", date.format(DATE_FORMAT)))
    }
}

impl RecordStore for JsonDirStore {
    fn load(&self, date: NaiveDate) -> Option<DateRecord> {
        let path = self.path_for(date);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("unreadable record {}, treating as empty: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_str::<DateRecord>(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("malformed record {}, treating as empty: {e}", path.display());
                None
            }
        }
    }

    fn save(&mut self, record: &DateRecord) -> VenueCalResult<()> {
        let write_err = |source| VenueCalError::Write {
            date: record.date.format(DATE_FORMAT).to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_err)?;

        let mut content = serde_json::to_string_pretty(record)
            .map_err(|e| VenueCalError::Serialization(e.to_string()))?;
        content.push('\n');

        let path = self.path_for(record.date);
        let temp = path.with_extension("json.tmp");

        std::fs::write(&temp, content).map_err(write_err)?;
        std::fs::rename(&temp, &path).map_err(write_err)?;
        Ok(())
    }

    fn list_dates(&self) -> VenueCalResult<Vec<NaiveDate>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut dates: Vec<NaiveDate> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|stem| parse_date(stem).ok())
            })
            .collect();

        dates.sort();
        Ok(dates)
    }
}
