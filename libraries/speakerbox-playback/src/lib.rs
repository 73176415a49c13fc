//! Speakerbox - Server-side Playback
//!
//! Plays audio files through the host's own speakers by handing them to
//! whichever command-line player fits the format.
//!
//! This crate provides:
//! - An ordered registry of known players (`aplay`, `ffplay`, `paplay`, `cvlc`)
//! - Selection of the first player supporting a file extension
//! - Command construction, including volume/gain translation
//! - Fire-and-forget launching without a shell
//!
//! # Example
//!
//! ```rust,no_run
//! use speakerbox_playback::PlaybackInvoker;
//!
//! # async fn example() -> Result<(), speakerbox_playback::PlaybackError> {
//! let invoker = PlaybackInvoker::new("audio").with_volume(80);
//! let outcome = invoker.play("applause.mp3").await?;
//! println!("{} is playing {}", outcome.player, outcome.file);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod format;
pub mod invoker;
pub mod launcher;
pub mod registry;
pub mod selector;

pub use error::{PlaybackError, Result};
pub use format::SUPPORTED_EXTENSIONS;
pub use invoker::{PlaybackInvoker, PlaybackOutcome, DEFAULT_VOLUME};
pub use launcher::{Launcher, ProcessLauncher};
pub use registry::{PlayerCommand, PlayerDescriptor, PlayerRegistry, STANDARD_PLAYERS};
