use std::{fs, path::Path};

use engine::Period;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Preferences and bookkeeping that survive restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalState {
    pub dark_mode: bool,
    /// Last period whose pending expenses were carried forward.
    pub last_migrated: Option<Period>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Whether pending expenses still have to be moved into `current`.
    #[must_use]
    pub fn needs_migration(&self, current: Period) -> bool {
        self.last_migrated != Some(current)
    }

    pub fn mark_migrated(&mut self, period: Period) {
        self.last_migrated = Some(period);
    }
}
