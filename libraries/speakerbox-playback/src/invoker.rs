//! Playback invoker
//!
//! Handles one play request end to end: resolve the file under the audio
//! root, check the format, select a player, build the command and launch it.

use crate::{
    error::{PlaybackError, Result},
    format,
    launcher::{Launcher, ProcessLauncher},
    registry::PlayerRegistry,
    selector,
};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Volume used when none is configured
pub const DEFAULT_VOLUME: u8 = 100;

/// Result of a successful launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackOutcome {
    /// Name of the selected player
    pub player: &'static str,
    /// Base name of the requested file
    pub file: String,
    /// Absolute, canonical path handed to the player
    pub path: PathBuf,
    pub volume: u8,
}

/// Plays files from a single audio root through external players
#[derive(Clone)]
pub struct PlaybackInvoker {
    audio_root: PathBuf,
    registry: PlayerRegistry,
    launcher: Arc<dyn Launcher>,
    volume: u8,
}

impl PlaybackInvoker {
    /// Invoker with the standard registry, real process launching and
    /// [`DEFAULT_VOLUME`]
    pub fn new(audio_root: impl Into<PathBuf>) -> Self {
        Self {
            audio_root: audio_root.into(),
            registry: PlayerRegistry::standard(),
            launcher: Arc::new(ProcessLauncher),
            volume: DEFAULT_VOLUME,
        }
    }

    pub fn with_registry(mut self, registry: PlayerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Set the playback volume in percent, clamped to 100
    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = volume.min(100);
        self
    }

    pub fn audio_root(&self) -> &Path {
        &self.audio_root
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Resolve `relative_path` to a canonical, readable file inside the audio root
    ///
    /// Paths with `..`, root or prefix components are rejected outright, and
    /// the canonical target (after following symlinks) must stay inside the
    /// canonical root.
    pub async fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let requested = Path::new(relative_path);
        let candidate = self.audio_root.join(requested);

        if relative_path.is_empty() {
            return Err(PlaybackError::not_found(candidate));
        }

        for component in requested.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(PlaybackError::InvalidPath(relative_path.to_string())),
            }
        }

        let canonical = tokio::fs::canonicalize(&candidate)
            .await
            .map_err(|_| PlaybackError::not_found(&candidate))?;
        let root = tokio::fs::canonicalize(&self.audio_root)
            .await
            .map_err(|_| PlaybackError::not_found(&candidate))?;

        if !canonical.starts_with(&root) {
            return Err(PlaybackError::InvalidPath(relative_path.to_string()));
        }

        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|_| PlaybackError::not_found(&candidate))?;
        if !metadata.is_file() {
            return Err(PlaybackError::not_found(candidate));
        }

        // Existence alone is not enough, the player has to be able to read it
        tokio::fs::File::open(&canonical)
            .await
            .map_err(|_| PlaybackError::not_found(&candidate))?;

        Ok(canonical)
    }

    /// Play `relative_path` through the server's speakers
    ///
    /// Returns as soon as the player process is started. Failures of the
    /// player after that point are logged by the launcher, not returned.
    pub async fn play(&self, relative_path: &str) -> Result<PlaybackOutcome> {
        let path = self.resolve(relative_path).await?;

        let requested = Path::new(relative_path);
        let extension = match format::extension_of(requested) {
            Some(ext) if format::is_supported(&ext) => ext,
            other => return Err(PlaybackError::UnsupportedFormat { extension: other }),
        };

        let player = selector::select(&self.registry, &extension).ok_or_else(|| {
            PlaybackError::NoPlayerAvailable {
                extension: extension.clone(),
            }
        })?;

        let command = player.command(&path, self.volume);
        tracing::info!(
            player = player.name,
            file = %path.display(),
            volume = self.volume,
            "Starting playback"
        );

        self.launcher
            .launch(&command)
            .map_err(|source| PlaybackError::Spawn {
                player: player.name,
                source,
            })?;

        let file = requested
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative_path.to_string());

        Ok(PlaybackOutcome {
            player: player.name,
            file,
            path,
            volume: self.volume,
        })
    }
}

impl std::fmt::Debug for PlaybackInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackInvoker")
            .field("audio_root", &self.audio_root)
            .field("registry", &self.registry)
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}
