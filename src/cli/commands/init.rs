//! Init command: writes a default configuration file.
//!
//! An existing file is only replaced with `--force`.
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::config::{FocusRecoverConfig, CONFIG_FILE};

pub struct InitCommand {
    pub force: bool,
}

impl InitCommand {
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    pub fn execute(&self) -> Result<()> {
        let path = self.write_in(Path::new("."))?;
        println!("✅ Wrote {}", path.display());
        println!("   Contract addresses are compiled in and not part of this file.");
        Ok(())
    }

    pub fn write_in(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() && !self.force {
            bail!(
                "{} already exists; use --force to overwrite it",
                path.display()
            );
        }

        FocusRecoverConfig::default().save_to_file(&path)?;
        tracing::info!(path = %path.display(), "configuration written");
        Ok(path)
    }
}
