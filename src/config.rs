// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::Path;

use ::config::{Config, File};
use serde::Deserialize;

use crate::error::TaranisError;
use crate::interval::DEFAULT_TUNING;
use crate::scan::UnterminatedNotePolicy;
use crate::synth::DEFAULT_SAMPLE_RATE;
use crate::tempo::DEFAULT_TEMPO;

/// Settings for a conversion. Every field is optional in the file.
///
/// ```yaml
/// sample_rate: 48000
/// tuning: 432
/// initial_tempo: 500000
/// unterminated_notes: close
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The output sample rate in Hz.
    pub sample_rate: u32,
    /// The frequency of A4 in Hz.
    pub tuning: f64,
    /// The tempo before the first tempo change, in microseconds per beat.
    pub initial_tempo: u32,
    /// What to do with a note that never ends.
    pub unterminated_notes: UnterminatedNotePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sample_rate: DEFAULT_SAMPLE_RATE,
            tuning: DEFAULT_TUNING,
            initial_tempo: DEFAULT_TEMPO,
            unterminated_notes: UnterminatedNotePolicy::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a file. The format is picked from the extension.
    pub fn load(path: &Path) -> Result<Settings, TaranisError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that the settings describe something we can render.
    pub fn validate(&self) -> Result<(), TaranisError> {
        if self.sample_rate == 0 {
            return Err(TaranisError::InvalidSettings(
                "sample_rate must be positive".to_string(),
            ));
        }
        if !(self.tuning.is_finite() && self.tuning > 0.0) {
            return Err(TaranisError::InvalidSettings(format!(
                "tuning must be a positive frequency, got {}",
                self.tuning
            )));
        }
        if self.initial_tempo == 0 {
            return Err(TaranisError::InvalidSettings(
                "initial_tempo must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::fs;

    use crate::error::TaranisError;
    use crate::scan::UnterminatedNotePolicy;

    use super::Settings;

    #[test]
    fn defaults() -> Result<(), Box<dyn Error>> {
        let settings = Settings::default();
        assert_eq!(44_100, settings.sample_rate);
        assert_eq!(440.0, settings.tuning);
        assert_eq!(500_000, settings.initial_tempo);
        assert_eq!(UnterminatedNotePolicy::Drop, settings.unterminated_notes);
        settings.validate()?;
        Ok(())
    }

    #[test]
    fn load_partial_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("taranis.yaml");
        fs::write(&path, "sample_rate: 48000\nunterminated_notes: close\n")?;

        let settings = Settings::load(&path)?;
        assert_eq!(48_000, settings.sample_rate);
        assert_eq!(440.0, settings.tuning);
        assert_eq!(UnterminatedNotePolicy::CloseAtEnd, settings.unterminated_notes);
        Ok(())
    }

    #[test]
    fn rejects_invalid_values() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("taranis.yaml");
        fs::write(&path, "sample_rate: 0\n")?;
        assert!(matches!(
            Settings::load(&path),
            Err(TaranisError::InvalidSettings(_))
        ));

        let settings = Settings {
            tuning: -1.0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            initial_tempo: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
        Ok(())
    }

    #[test]
    fn missing_file() {
        let result = Settings::load(std::path::Path::new("/nonexistent/taranis.yaml"));
        assert!(matches!(result, Err(TaranisError::Config(_))));
    }
}
