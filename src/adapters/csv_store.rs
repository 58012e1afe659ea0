use crate::domain::model::{Session, StoreRecord};
use crate::domain::ports::RecordStore;
use crate::utils::error::{ParkingError, Result};
use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const DEFAULT_DATA_FILE: &str = "parking_data.csv";
pub const HEADER: [&str; 4] = ["license", "type", "slot", "time"];

/// Record store backed by a plain comma-separated file with a header row.
///
/// Fields are written unquoted, so a license or type containing a comma,
/// quote or line break cannot be represented. Callers validate vehicles before
/// they reach the store.
///
/// Every mutation writes a complete new file next to the target and renames it
/// into place, so an interrupted write leaves the previous file as it was.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

/// A fully written replacement file that has not yet been renamed over the
/// store. Dropping it without `commit` discards the temp file.
#[derive(Debug)]
pub struct PendingReplace {
    temp: NamedTempFile,
    target: PathBuf,
    records: usize,
}

impl PendingReplace {
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    pub fn commit(self) -> Result<()> {
        let records = self.records;
        self.temp
            .persist(&self.target)
            .map_err(|e| ParkingError::Io(e.error))?;
        tracing::debug!(
            "Replaced {} with {} record(s)",
            self.target.display(),
            records
        );
        Ok(())
    }
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every stored record except `license` into a temp file.
    pub fn stage_delete(&self, license: &str) -> Result<PendingReplace> {
        let records = self.read_records()?;
        let before = records.len();
        let kept: Vec<StoreRecord> = records
            .into_iter()
            .filter(|record| record.license != license)
            .collect();

        if kept.len() == before {
            tracing::warn!(
                "No record for {} in {}, rewriting unchanged",
                license,
                self.path.display()
            );
        }

        self.stage(&kept)
    }

    pub fn stage_save(&self, sessions: &[Session]) -> Result<PendingReplace> {
        let records: Vec<StoreRecord> = sessions.iter().map(StoreRecord::from).collect();
        self.stage(&records)
    }

    fn read_records(&self) -> Result<Vec<StoreRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if headers.iter().ne(HEADER.iter().copied()) {
            return Err(ParkingError::CorruptStore {
                message: format!(
                    "unexpected header '{}' in {}, expected '{}'",
                    headers.iter().collect::<Vec<_>>().join(","),
                    self.path.display(),
                    HEADER.join(",")
                ),
            });
        }

        let records = reader
            .deserialize::<StoreRecord>()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

        tracing::debug!("Read {} record(s) from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn stage(&self, records: &[StoreRecord]) -> Result<PendingReplace> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;

        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .quote_style(QuoteStyle::Never)
                .from_writer(temp.as_file_mut());
            writer.write_record(HEADER)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        Ok(PendingReplace {
            temp,
            target: self.path.clone(),
            records: records.len(),
        })
    }
}

impl RecordStore for CsvRecordStore {
    fn load_all(&self) -> Result<Vec<Session>> {
        Ok(self
            .read_records()?
            .into_iter()
            .map(Session::from)
            .collect())
    }

    fn save_all(&self, sessions: &[Session]) -> Result<()> {
        self.stage_save(sessions)?.commit()
    }

    fn delete_by_key(&self, license: &str) -> Result<()> {
        self.stage_delete(license)?.commit()
    }
}
