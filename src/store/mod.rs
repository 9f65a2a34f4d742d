//! Read-only access to the user file. The file is a single JSON object:
//!   - `config`: [config::Config].
//!   - `palette` and `projectPalette`: colour per sector and per project.
//!   - `log`: persisted entries, see [EntryRecord].

pub mod config;

use std::{collections::HashMap, io::ErrorKind, path::PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use fs4::tokio::AsyncFileExt;
use serde::{Deserialize, Serialize};
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, warn};

use config::Config;

use crate::{
    layout::{colouring::Colouring, primitives::ColourRef},
    log::{entry::EntryRecord, error::LogError, EntryLog},
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserData {
    pub config: Config,
    pub palette: HashMap<String, String>,
    pub project_palette: HashMap<String, String>,
    pub log: Vec<EntryRecord>,
}

impl UserData {
    pub fn entry_log(&self) -> Result<EntryLog, LogError> {
        EntryLog::from_records(&self.log)
    }

    pub fn colouring(&self) -> Colouring {
        Colouring {
            mode: self.config.ui.colour_mode,
            sectors: self.palette.clone(),
            projects: self.project_palette.clone(),
            fallback: ColourRef::new(self.config.ui.colour.as_str()),
            accent: ColourRef::new(self.config.ui.accent.as_str()),
        }
    }
}

/// Interface for abstracting where the user data comes from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDataSource: Send + Sync {
    async fn load(&self) -> Result<UserData>;
}

/// The main realization of [UserDataSource]: a JSON file, read under a shared lock.
pub struct UserFile {
    path: PathBuf,
}

impl UserFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl UserDataSource for UserFile {
    async fn load(&self) -> Result<UserData> {
        debug!("Loading user data from {:?}", self.path);
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No user file at {:?}, starting empty", self.path);
                return Ok(UserData::default());
            }
            Err(e) => return Err(e).with_context(|| format!("Can't open {:?}", self.path)),
        };

        file.lock_shared()?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        read?;

        serde_json::from_str(&content).with_context(|| format!("Malformed user file {:?}", self.path))
    }
}
