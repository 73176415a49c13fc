//! Player registry
//!
//! Each known command-line player is a plain record: a name, the program to
//! execute, the extensions it can decode and a function that builds its
//! argument vector. Registry order is priority order.

use crate::format;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

/// Builds the argument vector for a player from an absolute path and a
/// volume in percent (0-100)
pub type ArgsBuilder = fn(&Path, u8) -> Vec<OsString>;

/// Static description of one external audio player
#[derive(Clone, Copy)]
pub struct PlayerDescriptor {
    /// Identifier reported back to callers
    pub name: &'static str,
    /// Program looked up on `PATH`
    pub program: &'static str,
    /// Lowercase extensions with leading dot
    pub extensions: &'static [&'static str],
    pub build_args: ArgsBuilder,
}

impl PlayerDescriptor {
    /// Whether this player handles `extension` (lowercase, with dot)
    pub fn supports(&self, extension: &str) -> bool {
        self.extensions.contains(&extension)
    }

    /// Build the invocation for `path` at `volume` percent
    ///
    /// Volumes above 100 are clamped.
    pub fn command(&self, path: &Path, volume: u8) -> PlayerCommand {
        PlayerCommand {
            program: self.program,
            args: (self.build_args)(path, volume.min(100)),
        }
    }
}

impl fmt::Debug for PlayerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerDescriptor")
            .field("name", &self.name)
            .field("program", &self.program)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

/// A ready-to-run player invocation
///
/// Executed as an argument vector, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: &'static str,
    pub args: Vec<OsString>,
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// ALSA raw player, WAV only
pub const APLAY: PlayerDescriptor = PlayerDescriptor {
    name: "aplay",
    program: "aplay",
    extensions: &[".wav"],
    build_args: path_only,
};

/// FFmpeg player, decodes everything, `-volume 0..100`
pub const FFPLAY: PlayerDescriptor = PlayerDescriptor {
    name: "ffplay",
    program: "ffplay",
    extensions: &format::SUPPORTED_EXTENSIONS,
    build_args: ffplay_args,
};

/// PulseAudio client, WAV only
pub const PAPLAY: PlayerDescriptor = PlayerDescriptor {
    name: "paplay",
    program: "paplay",
    extensions: &[".wav"],
    build_args: path_only,
};

/// VLC without interface, volume expressed as gain
pub const CVLC: PlayerDescriptor = PlayerDescriptor {
    name: "cvlc",
    program: "cvlc",
    extensions: &format::SUPPORTED_EXTENSIONS,
    build_args: cvlc_args,
};

/// Standard players in priority order
pub const STANDARD_PLAYERS: [PlayerDescriptor; 4] = [APLAY, FFPLAY, PAPLAY, CVLC];

fn path_only(path: &Path, _volume: u8) -> Vec<OsString> {
    vec![path.as_os_str().to_owned()]
}

fn ffplay_args(path: &Path, volume: u8) -> Vec<OsString> {
    vec![
        "-nodisp".into(),
        "-autoexit".into(),
        "-volume".into(),
        volume.to_string().into(),
        path.as_os_str().to_owned(),
    ]
}

fn cvlc_args(path: &Path, volume: u8) -> Vec<OsString> {
    vec![
        "--play-and-exit".into(),
        "--gain".into(),
        gain_for_volume(volume).to_string().into(),
        path.as_os_str().to_owned(),
    ]
}

/// Gain value for gain-based players: one tenth of the volume percent
pub fn gain_for_volume(volume: u8) -> f32 {
    f32::from(volume) / 10.0
}

/// Ordered, immutable set of players
#[derive(Debug, Clone)]
pub struct PlayerRegistry {
    players: Vec<PlayerDescriptor>,
}

impl PlayerRegistry {
    /// Registry with the given players, first entry has highest priority
    pub fn new(players: Vec<PlayerDescriptor>) -> Self {
        debug_assert!(
            players
                .iter()
                .all(|p| p.extensions.iter().all(|ext| format::is_normalized(ext))),
            "player extensions must be lowercase and start with a dot"
        );
        Self { players }
    }

    /// The built-in players: aplay, ffplay, paplay, cvlc
    pub fn standard() -> Self {
        Self::new(STANDARD_PLAYERS.to_vec())
    }

    /// Registry without players; every selection fails
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn players(&self) -> &[PlayerDescriptor] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether any player handles `extension`
    pub fn supports(&self, extension: &str) -> bool {
        self.players.iter().any(|p| p.supports(extension))
    }

    pub fn player_names(&self) -> Vec<&'static str> {
        self.players.iter().map(|p| p.name).collect()
    }

    /// First player handling `extension`, see [`crate::selector::select`]
    pub fn select(&self, extension: &str) -> Option<&PlayerDescriptor> {
        crate::selector::select(self, extension)
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
