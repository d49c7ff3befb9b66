use std::collections::BTreeMap;

use ratatui::crossterm::event::KeyEvent;

use crate::catalog::{Catalog, Entry, SourceChoice};

/// All possible events in the application
#[derive(Debug)]
pub enum AppEvent {
    // Input events
    Key(KeyEvent),
    Resize(u16, u16),

    // Completions of background tasks
    CatalogLoaded {
        source: SourceChoice,
        result: Result<Catalog, String>,
    },
    RegistryStatus(String),
    EntryRefreshed(Result<Entry, String>),
    EnvPreset(BTreeMap<String, String>),
    CredentialStored {
        name: String,
        result: Result<(), String>,
    },
    UrlOpened(Result<(), String>),
    /// Outcome for the target at `index`; `Ok` carries an optional sign-in hint
    TargetApplied {
        index: usize,
        result: Result<Option<String>, String>,
    },
    CredentialsRemoved(Result<usize, String>),

    // UI events
    Tick,
}
