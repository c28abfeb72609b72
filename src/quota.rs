use crate::Error;
use chrono::NaiveDate;
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Documents a single signer may sign per calendar day.
pub const DAILY_LIMIT: u32 = 2;

/// signer id -> day (`YYYY-MM-DD`) -> documents signed that day.
pub type ActivityLog = BTreeMap<String, BTreeMap<String, u32>>;

/// Key used for a day in the activity log.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Persistence for the activity log. `save` always replaces the whole log.
pub trait ActivityStore: Send + Sync {
    fn load(&self) -> Result<ActivityLog, Error>;

    fn save(&self, log: &ActivityLog) -> Result<(), Error>;
}

/// Activity log kept as pretty printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActivityStore for JsonFileStore {
    fn load(&self) -> Result<ActivityLog, Error> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ActivityLog::new()),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(ActivityLog::new());
        }
        serde_json::from_str(&content).map_err(Error::CorruptActivityLog)
    }

    fn save(&self, log: &ActivityLog) -> Result<(), Error> {
        let content = serde_json::to_string_pretty(log)
            .map_err(|err| Error::Other(format!("Could not serialize activity log: {}", err)))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Activity log that only lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    log: Mutex<ActivityLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: ActivityLog) -> Self {
        MemoryStore {
            log: Mutex::new(log),
        }
    }
}

impl ActivityStore for MemoryStore {
    fn load(&self) -> Result<ActivityLog, Error> {
        self.log
            .lock()
            .map(|log| log.clone())
            .map_err(|_| Error::Other("Activity log lock poisoned.".to_owned()))
    }

    fn save(&self, log: &ActivityLog) -> Result<(), Error> {
        let mut stored = self
            .log
            .lock()
            .map_err(|_| Error::Other("Activity log lock poisoned.".to_owned()))?;
        *stored = log.clone();
        Ok(())
    }
}

/// Enforces [`DAILY_LIMIT`] signed documents per signer and day.
pub struct QuotaEnforcer {
    store: Box<dyn ActivityStore>,
    /// Serializes the read-modify-write within this process.
    guard: Mutex<()>,
}

impl QuotaEnforcer {
    pub fn new<S: ActivityStore + 'static>(store: S) -> Self {
        QuotaEnforcer {
            store: Box::new(store),
            guard: Mutex::new(()),
        }
    }

    /// Count one document for `id` on `today` if the limit allows it.
    ///
    /// Returns `Ok(false)` without touching the store when the limit is reached.
    pub fn check_and_consume(&self, id: &str, today: NaiveDate) -> Result<bool, Error> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| Error::Other("Quota lock poisoned.".to_owned()))?;

        let mut log = self.store.load()?;
        let day = day_key(today);
        let count = log
            .get(id)
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(0);

        if count >= DAILY_LIMIT {
            log::info!("Signer `{}` reached the daily limit for {}.", id, day);
            return Ok(false);
        }

        log.entry(id.to_owned())
            .or_default()
            .insert(day.clone(), count + 1);
        self.store.save(&log)?;
        log::debug!("Signer `{}` signed {} document(s) on {}.", id, count + 1, day);
        Ok(true)
    }

    /// Documents counted for `id` on `day`.
    pub fn used(&self, id: &str, day: NaiveDate) -> Result<u32, Error> {
        Ok(self
            .store
            .load()?
            .get(id)
            .and_then(|days| days.get(&day_key(day)))
            .copied()
            .unwrap_or(0))
    }
}
