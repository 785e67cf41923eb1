//! Saving and loading trained models.
//!
//! Models are written with `bincode`; configurations and statistics as
//! pretty-printed JSON so they stay readable. I/O and decoding failures are
//! returned to the caller unchanged, nothing is retried.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::TrainingConfig;
use crate::error::Result;
use crate::metrics::RunStatistics;

/// Serialize `model` to `path`, replacing any existing file.
pub fn save_model<M: Serialize + ?Sized, P: AsRef<Path>>(model: &M, path: P) -> Result<()> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    bincode::serialize_into(&mut writer, model)?;
    writer.flush()?;
    Ok(())
}

/// Load a model previously written by [`save_model`].
pub fn load_model<M: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<M> {
    let reader = BufReader::new(fs::File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

/// A directory holding everything a training run produced.
#[derive(Debug, Clone)]
pub struct Experiment {
    dir: PathBuf,
}

impl Experiment {
    pub const CONFIG_FILE: &'static str = "configurations.json";
    pub const MODEL_FILE: &'static str = "model.bin";
    pub const STATISTICS_FILE: &'static str = "statistics.json";

    /// Use `dir` as an experiment directory, creating it if needed.
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Experiment { dir: dir.as_ref().to_path_buf() })
    }

    /// Open an existing experiment directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        // surface a missing directory as an io error up front
        fs::metadata(dir)?;
        Ok(Experiment { dir: dir.to_path_buf() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_config(&self, config: &TrainingConfig) -> Result<()> {
        config.to_file(self.dir.join(Self::CONFIG_FILE))
    }

    pub fn load_config(&self) -> Result<TrainingConfig> {
        TrainingConfig::from_file(self.dir.join(Self::CONFIG_FILE))
    }

    pub fn save_model<M: Serialize + ?Sized>(&self, model: &M) -> Result<()> {
        save_model(model, self.dir.join(Self::MODEL_FILE))
    }

    pub fn load_model<M: DeserializeOwned>(&self) -> Result<M> {
        load_model(self.dir.join(Self::MODEL_FILE))
    }

    pub fn save_statistics(&self, statistics: &RunStatistics) -> Result<()> {
        statistics.save(self.dir.join(Self::STATISTICS_FILE))
    }

    pub fn load_statistics(&self) -> Result<RunStatistics> {
        RunStatistics::load(self.dir.join(Self::STATISTICS_FILE))
    }
}
