//! Local key/value store persisted as a JSON object file.
//!
//! Every accessor is best effort: I/O and parse failures are logged and
//! the caller sees "nothing stored".

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use gymtrack_core::RestTimerState;
use gymtrack_core::models::User;
use tracing::{debug, warn};

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const USER_KEY: &str = "user";
const REST_TIMER_KEY: &str = "workout_rest_timer";

/// Shared handle to the store file. Clones see the same entries.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl LocalStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    pub fn remove_item(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) {
        let Ok(mut entries) = self.entries.lock() else {
            warn!("local storage lock poisoned");
            return;
        };
        apply(&mut entries);
        if let Err(err) = write_entries(&self.path, &entries) {
            warn!(path = %self.path.display(), error = %err, "failed to write local storage");
        }
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no local storage yet");
            return BTreeMap::new();
        }
    };
    serde_json::from_str(&data).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "discarding unreadable local storage");
        BTreeMap::new()
    })
}

fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json)
}

/// Access/refresh tokens and the cached user.
#[derive(Debug, Clone)]
pub struct TokenStorage {
    store: LocalStorage,
}

impl TokenStorage {
    pub fn new(store: LocalStorage) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get_item(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get_item(REFRESH_TOKEN_KEY)
    }

    pub fn set_tokens(&self, access: &str, refresh: &str) {
        self.store.set_item(ACCESS_TOKEN_KEY, access);
        self.store.set_item(REFRESH_TOKEN_KEY, refresh);
    }

    pub fn set_access_token(&self, access: &str) {
        self.store.set_item(ACCESS_TOKEN_KEY, access);
    }

    pub fn user(&self) -> Option<User> {
        let json = self.store.get_item(USER_KEY)?;
        serde_json::from_str(&json)
            .inspect_err(|err| warn!(error = %err, "discarding unreadable cached user"))
            .ok()
    }

    pub fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.store.set_item(USER_KEY, &json),
            Err(err) => warn!(error = %err, "failed to serialize user"),
        }
    }

    pub fn clear(&self) {
        self.store.remove_item(ACCESS_TOKEN_KEY);
        self.store.remove_item(REFRESH_TOKEN_KEY);
        self.store.remove_item(USER_KEY);
    }
}

/// The single persisted rest timer.
#[derive(Debug, Clone)]
pub struct RestTimerStorage {
    store: LocalStorage,
}

impl RestTimerStorage {
    pub fn new(store: LocalStorage) -> Self {
        Self { store }
    }

    pub fn save(&self, timer: &RestTimerState) {
        match serde_json::to_string(timer) {
            Ok(json) => self.store.set_item(REST_TIMER_KEY, &json),
            Err(err) => warn!(error = %err, "failed to serialize rest timer"),
        }
    }

    /// Malformed or incomplete records read as `None`.
    pub fn load(&self) -> Option<RestTimerState> {
        let json = self.store.get_item(REST_TIMER_KEY)?;
        let timer: RestTimerState = serde_json::from_str(&json)
            .inspect_err(|err| warn!(error = %err, "discarding malformed rest timer"))
            .ok()?;
        if !timer.is_complete() {
            warn!(?timer, "discarding incomplete rest timer");
            return None;
        }
        Some(timer)
    }

    pub fn clear(&self) {
        self.store.remove_item(REST_TIMER_KEY);
    }
}
