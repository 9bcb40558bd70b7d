use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bornes hebdomadaires par défaut de l'entreprise (0 = lundi).
///
/// Utilisées quand un template ne fixe pas ses propres jours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_start_day")]
    pub shift_start_day: u8,
    #[serde(default = "default_end_day")]
    pub shift_end_day: u8,
}

fn default_start_day() -> u8 {
    0
}

fn default_end_day() -> u8 {
    4
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            shift_start_day: default_start_day(),
            shift_end_day: default_end_day(),
        }
    }
}

impl CompanyConfig {
    pub fn new(shift_start_day: u8, shift_end_day: u8) -> Result<Self> {
        let config = Self {
            shift_start_day,
            shift_end_day,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shift_start_day > 6 {
            bail!("shift_start_day must be within 0..=6");
        }
        if self.shift_end_day > 6 {
            bail!("shift_end_day must be within 0..=6");
        }
        Ok(())
    }

    /// Charge la configuration depuis un fichier JSON (champs absents = défauts).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        let config: CompanyConfig = serde_json::from_slice(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}
