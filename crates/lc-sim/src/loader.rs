//! Loading location models and run settings from a config directory.
//!
//! A model settings file (JSON, see [`LocationSettings`]) names its other
//! inputs by path relative to its own directory:
//!
//! ```text
//! configs/
//!   workplace_location.json      ← LocationSettings
//!   workplace_location_sample.csv
//!   workplace_location.csv
//!   destination_choice_size_terms.csv
//!   tour_mode_choice.json        ← LogsumSettings
//!   tour_mode_choice.csv         ← named by tour_mode_choice.json
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use lc_core::{LocationSettings, RunConfig};
use lc_data::load_size_terms_csv;
use lc_utility::{LogsumModel, LogsumSettings, load_mode_spec_csv, load_spec_csv};

use crate::{LocationModel, LocationStep, SimError, SimResult};

/// Load a step's model from its settings file.
pub fn load_location_model(step: LocationStep, settings_path: &Path) -> SimResult<LocationModel> {
    let settings: LocationSettings = read_json(settings_path)?;
    let dir = parent_dir(settings_path);

    let sample_spec = load_spec_csv(&dir.join(&settings.sample_spec))?;
    let spec = load_spec_csv(&dir.join(&settings.spec))?;
    let size_terms = load_size_terms_csv(&dir.join(&settings.size_terms))?;
    let logsum = load_logsum_model(&dir.join(&settings.logsum_settings))?;

    log::info!("loaded {step} model from {}", settings_path.display());
    LocationModel::new(step, settings, sample_spec, spec, size_terms, logsum)
}

/// Load a logsum settings file and the mode spec it names.
pub fn load_logsum_model(path: &Path) -> SimResult<LogsumModel> {
    let settings: LogsumSettings = read_json(path)?;
    let modes = load_mode_spec_csv(&parent_dir(path).join(&settings.spec))?;
    Ok(LogsumModel::new(modes, settings.nests, settings.constants)?)
}

pub fn load_run_config(path: &Path) -> SimResult<RunConfig> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> SimResult<T> {
    let file = std::fs::File::open(path)?;
    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| SimError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
