//! Date-keyed JSON file store
//!
//! One file per local calendar day, `calibration-YYYY-MM-DD.json`, inside a
//! directory owned by the store. Writes go to a temporary file that is renamed
//! over the target, so a crash mid-write leaves the previous snapshot intact.
//!
//! Old days are kept as a step history until pruned.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, info, warn};
use stepsense_core::{CalibrationRecord, CalibrationStore, StoreError};

use crate::clock::{SystemClock, WallClock};
use crate::freshness::FreshnessPolicy;
use crate::snapshot::CalibrationSnapshot;
use crate::SchemaError;

const FILE_PREFIX: &str = "calibration-";
const FILE_SUFFIX: &str = ".json";

/// Calibration store backed by daily JSON files
#[derive(Debug, Clone)]
pub struct JsonFileStore<C: WallClock = SystemClock> {
    dir: PathBuf,
    policy: FreshnessPolicy,
    clock: C,
}

impl JsonFileStore<SystemClock> {
    /// Store in `dir` using the system clock and the default policy
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, SystemClock)
    }
}

impl<C: WallClock> JsonFileStore<C> {
    /// Store in `dir` reading time from `clock`
    pub fn with_clock(dir: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            dir: dir.into(),
            policy: FreshnessPolicy::default(),
            clock,
        }
    }

    /// Replace the freshness policy
    pub fn with_policy(mut self, policy: FreshnessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Directory holding the snapshots
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The freshness policy applied on load
    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    /// Path of the snapshot for `date`
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{date}{FILE_SUFFIX}"))
    }

    /// Snapshot stored for `date`, fresh or not
    pub fn read(&self, date: NaiveDate) -> Result<Option<CalibrationSnapshot>, SchemaError> {
        match fs::read(self.path_for(date)) {
            Ok(bytes) => CalibrationSnapshot::from_json(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `record` as today's snapshot, stamped with the clock's time
    pub fn write(&self, record: &CalibrationRecord) -> Result<CalibrationSnapshot, SchemaError> {
        let saved_at = self.clock.now();
        let snapshot = CalibrationSnapshot::new(*record, self.clock.local_date(saved_at), saved_at);

        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(snapshot.date);
        let staging = self.dir.join(format!(".{FILE_PREFIX}{}{FILE_SUFFIX}.tmp", snapshot.date));
        fs::write(&staging, snapshot.to_json()?)?;
        fs::rename(&staging, &target)?;

        debug!("Wrote {} ({} steps)", target.display(), record.step_count);
        Ok(snapshot)
    }

    /// Final step count of every stored day, oldest first
    ///
    /// Files that do not parse are skipped.
    pub fn daily_totals(&self) -> Result<Vec<(NaiveDate, u64)>, SchemaError> {
        let mut totals = Vec::new();
        for date in self.stored_dates()? {
            match self.read(date) {
                Ok(Some(snapshot)) => totals.push((date, snapshot.record.step_count)),
                Ok(None) => {}
                Err(e) => warn!("Skipping snapshot for {}: {}", date, e),
            }
        }
        Ok(totals)
    }

    /// Delete snapshots for days before `cutoff`; returns how many were removed
    pub fn prune_before(&self, cutoff: NaiveDate) -> Result<usize, SchemaError> {
        let mut removed = 0;
        for date in self.stored_dates()?.into_iter().filter(|d| *d < cutoff) {
            match fs::remove_file(self.path_for(date)) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        if removed > 0 {
            info!("Pruned {} calibration snapshots before {}", removed, cutoff);
        }
        Ok(removed)
    }

    /// Days with a snapshot file, sorted
    fn stored_dates(&self) -> Result<Vec<NaiveDate>, SchemaError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut dates = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let date = name
                .to_str()
                .and_then(|n| n.strip_prefix(FILE_PREFIX))
                .and_then(|n| n.strip_suffix(FILE_SUFFIX))
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            if let Some(date) = date {
                dates.push(date);
            }
        }
        dates.sort();
        Ok(dates)
    }
}

impl<C: WallClock> CalibrationStore for JsonFileStore<C> {
    fn load(&mut self) -> Result<Option<CalibrationRecord>, StoreError> {
        let now = self.clock.now();
        let today = self.clock.local_date(now);

        let snapshot = match self.read(today) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("Cannot read calibration for {}: {}", today, e);
                return Err(e.into());
            }
        };

        if !self.policy.is_fresh(&snapshot, now, today) {
            info!("Calibration saved at {} is stale, not restoring", snapshot.saved_at);
            return Ok(None);
        }
        Ok(Some(snapshot.record))
    }

    fn save(&mut self, record: &CalibrationRecord) -> Result<(), StoreError> {
        self.write(record).map(|_| ()).map_err(|e| {
            warn!("Cannot write calibration: {}", e);
            e.into()
        })
    }
}
