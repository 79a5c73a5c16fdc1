//! Best-effort side effects: opening a map and playing a notification sound.
//! Failures are reported and logged but never change a run's outcome.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use hhfind_core::{AppConfig, Coordinate};
use hhfind_pipeline::Notifier;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum EffectError {
    #[error("sound file '{}' not found", .0.display())]
    SoundFileMissing(PathBuf),

    #[error("no sound player command configured")]
    NoPlayer,

    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    PlayerFailed { program: String, status: ExitStatus },

    #[error("failed to open browser: {0}")]
    Browser(#[source] std::io::Error),
}

#[must_use]
pub fn maps_url(at: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        at.lat, at.lng
    )
}

/// Opens the location in the default browser without waiting for it.
pub fn open_map(at: Coordinate) {
    let url = maps_url(at);
    println!("Opening location in Google Maps: {url}");
    if let Err(e) = open::that_detached(&url).map_err(EffectError::Browser) {
        tracing::warn!(error = %e, "could not open map");
        println!("Could not open a browser. Please navigate manually to: {url}");
    }
}

/// Plays the configured sound file through an external player command.
#[derive(Debug, Clone)]
pub struct SoundPlayer {
    file: PathBuf,
    command: Vec<String>,
}

impl SoundPlayer {
    #[must_use]
    pub fn new(file: PathBuf, command: Vec<String>) -> Self {
        Self { file, command }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.sound_file.clone(), config.sound_command.clone())
    }

    fn build_command(&self) -> Result<(String, Command), EffectError> {
        if !self.file.is_file() {
            return Err(EffectError::SoundFileMissing(self.file.clone()));
        }
        let (program, args) = self.command.split_first().ok_or(EffectError::NoPlayer)?;
        let mut command = Command::new(program);
        command
            .args(args)
            .arg(&self.file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        Ok((program.clone(), command))
    }

    /// Plays the sound and waits for the player to finish.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError`] if the file is missing, the player cannot be
    /// started, or it exits unsuccessfully.
    pub async fn play(&self) -> Result<(), EffectError> {
        let (program, mut command) = self.build_command()?;
        let status = command
            .status()
            .await
            .map_err(|source| EffectError::Spawn {
                program: program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(EffectError::PlayerFailed { program, status })
        }
    }

    /// Starts the player and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EffectError`] if the file is missing or the player cannot be started.
    pub fn spawn(&self) -> Result<(), EffectError> {
        let (program, mut command) = self.build_command()?;
        command
            .spawn()
            .map(drop)
            .map_err(|source| EffectError::Spawn { program, source })
    }
}

impl Notifier for SoundPlayer {
    fn notify(&self) {
        match self.spawn() {
            Ok(()) => println!("Notification sound played."),
            Err(e) => {
                tracing::warn!(error = %e, "could not play notification sound");
                println!("Could not play sound: {e}");
            }
        }
    }
}
