//! Playback invoker integration tests
//!
//! Uses a recording launcher so no real player is started.

use speakerbox_playback::{
    registry::{APLAY, CVLC},
    Launcher, PlaybackError, PlaybackInvoker, PlayerCommand, PlayerDescriptor, PlayerRegistry,
};
use std::ffi::OsString;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingLauncher {
    commands: Mutex<Vec<PlayerCommand>>,
}

impl RecordingLauncher {
    fn commands(&self) -> Vec<PlayerCommand> {
        self.commands.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, command: &PlayerCommand) -> std::io::Result<()> {
        self.commands.lock().unwrap().push(command.clone());
        Ok(())
    }
}

struct FailingLauncher;

impl Launcher for FailingLauncher {
    fn launch(&self, _command: &PlayerCommand) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "No such file or directory",
        ))
    }
}

/// Audio root with a few files in it
fn audio_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in ["song.mp3", "beep.wav", "doc.txt", "Loud.FLAC", "noext"] {
        std::fs::write(dir.path().join(name), b"fake audio data").unwrap();
    }
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("clip.ogg"), b"ogg").unwrap();
    dir
}

fn invoker(root: &Path) -> (PlaybackInvoker, Arc<RecordingLauncher>) {
    let launcher = Arc::new(RecordingLauncher::default());
    let invoker = PlaybackInvoker::new(root).with_launcher(launcher.clone());
    (invoker, launcher)
}

#[tokio::test]
async fn test_play_mp3_selects_ffplay() {
    let root = audio_root();
    let (invoker, launcher) = invoker(root.path());

    let outcome = invoker.play("song.mp3").await.unwrap();

    assert_eq!(outcome.player, "ffplay");
    assert_eq!(outcome.file, "song.mp3");
    assert_eq!(outcome.volume, 100);
    assert!(outcome.path.is_absolute());

    let commands = launcher.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].program, "ffplay");
    assert!(commands[0].args.contains(&OsString::from("100")));
    assert_eq!(
        commands[0].args.last().unwrap(),
        outcome.path.as_os_str()
    );
}

#[tokio::test]
async fn test_play_wav_selects_first_wav_player() {
    let root = audio_root();
    let (invoker, launcher) = invoker(root.path());

    let outcome = invoker.play("beep.wav").await.unwrap();

    assert_eq!(outcome.player, "aplay");
    assert_eq!(launcher.commands()[0].args.len(), 1);
}

#[tokio::test]
async fn test_extension_is_case_insensitive() {
    let root = audio_root();
    let (invoker, _launcher) = invoker(root.path());

    let outcome = invoker.play("Loud.FLAC").await.unwrap();
    assert_eq!(outcome.player, "ffplay");
    assert_eq!(outcome.file, "Loud.FLAC");
}

#[tokio::test]
async fn test_nested_file() {
    let root = audio_root();
    let (invoker, _launcher) = invoker(root.path());

    let outcome = invoker.play("sub/clip.ogg").await.unwrap();
    assert_eq!(outcome.file, "clip.ogg");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let root = audio_root();
    let (invoker, launcher) = invoker(root.path());

    let err = invoker.play("missing.mp3").await.unwrap_err();
    assert!(matches!(err, PlaybackError::NotFound { .. }));
    assert!(launcher.commands().is_empty());
}

#[tokio::test]
async fn test_directory_is_not_found() {
    let root = audio_root();
    let (invoker, _launcher) = invoker(root.path());

    let err = invoker.play("sub").await.unwrap_err();
    assert!(matches!(err, PlaybackError::NotFound { .. }));
}

#[tokio::test]
async fn test_unsupported_format() {
    let root = audio_root();
    let (invoker, launcher) = invoker(root.path());

    let err = invoker.play("doc.txt").await.unwrap_err();
    match err {
        PlaybackError::UnsupportedFormat { extension } => {
            assert_eq!(extension.as_deref(), Some(".txt"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let err = invoker.play("noext").await.unwrap_err();
    assert!(matches!(
        err,
        PlaybackError::UnsupportedFormat { extension: None }
    ));
    assert!(launcher.commands().is_empty());
}

/// The format check runs before selection, so an empty registry still
/// reports the format problem
#[tokio::test]
async fn test_unsupported_format_rejected_before_selection() {
    let root = audio_root();
    let (invoker, _launcher) = invoker(root.path());
    let invoker = invoker.with_registry(PlayerRegistry::empty());

    let err = invoker.play("doc.txt").await.unwrap_err();
    assert!(matches!(err, PlaybackError::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn test_empty_registry_has_no_player() {
    let root = audio_root();
    let (invoker, launcher) = invoker(root.path());
    let invoker = invoker.with_registry(PlayerRegistry::empty());

    let err = invoker.play("beep.wav").await.unwrap_err();
    match err {
        PlaybackError::NoPlayerAvailable { extension } => assert_eq!(extension, ".wav"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(launcher.commands().is_empty());
}

#[tokio::test]
async fn test_registry_without_coverage() {
    let root = audio_root();
    let (invoker, _launcher) = invoker(root.path());
    let invoker = invoker.with_registry(PlayerRegistry::new(vec![APLAY]));

    assert!(invoker.play("beep.wav").await.is_ok());
    assert!(matches!(
        invoker.play("song.mp3").await.unwrap_err(),
        PlaybackError::NoPlayerAvailable { .. }
    ));
}

#[tokio::test]
async fn test_configured_volume_reaches_gain_player() {
    let root = audio_root();
    let (invoker, launcher) = invoker(root.path());
    let invoker = invoker
        .with_registry(PlayerRegistry::new(vec![CVLC]))
        .with_volume(50);

    let outcome = invoker.play("song.mp3").await.unwrap();
    assert_eq!(outcome.player, "cvlc");
    assert_eq!(outcome.volume, 50);

    let command = &launcher.commands()[0];
    assert_eq!(command.args[1], OsString::from("--gain"));
    assert_eq!(command.args[2], OsString::from("5"));
}

#[tokio::test]
async fn test_parent_dir_is_rejected() {
    let outer = TempDir::new().unwrap();
    std::fs::write(outer.path().join("secret.mp3"), b"secret").unwrap();
    let root = outer.path().join("audio");
    std::fs::create_dir(&root).unwrap();

    let (invoker, launcher) = invoker(&root);

    let err = invoker.play("../secret.mp3").await.unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidPath(_)));

    let absolute = outer.path().join("secret.mp3");
    let err = invoker
        .play(absolute.to_str().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidPath(_)));

    assert!(launcher.commands().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_rejected() {
    let outer = TempDir::new().unwrap();
    std::fs::write(outer.path().join("secret.mp3"), b"secret").unwrap();
    let root = outer.path().join("audio");
    std::fs::create_dir(&root).unwrap();
    std::os::unix::fs::symlink(outer.path().join("secret.mp3"), root.join("link.mp3")).unwrap();

    let (invoker, _launcher) = invoker(&root);

    let err = invoker.play("link.mp3").await.unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidPath(_)));
}

/// Shell metacharacters stay inside a single argument
#[tokio::test]
async fn test_shell_metacharacters_are_passed_verbatim() {
    let root = audio_root();
    let name = "a\"; touch pwned; \".mp3";
    std::fs::write(root.path().join(name), b"data").unwrap();
    let (invoker, launcher) = invoker(root.path());

    invoker.play(name).await.unwrap();

    let command = &launcher.commands()[0];
    let last = command.args.last().unwrap().to_string_lossy().into_owned();
    assert!(last.ends_with(name));
    assert!(!root.path().join("pwned").exists());
}

#[tokio::test]
async fn test_launch_failure_is_spawn_error() {
    let root = audio_root();
    let invoker = PlaybackInvoker::new(root.path()).with_launcher(Arc::new(FailingLauncher));

    let err = invoker.play("song.mp3").await.unwrap_err();
    match err {
        PlaybackError::Spawn { player, source } => {
            assert_eq!(player, "ffplay");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// Real launcher with a program that cannot exist
#[tokio::test]
async fn test_process_launcher_reports_missing_program() {
    fn args(path: &Path, _volume: u8) -> Vec<OsString> {
        vec![path.as_os_str().to_owned()]
    }

    let missing = PlayerDescriptor {
        name: "missing",
        program: "speakerbox-definitely-not-installed",
        extensions: &[".mp3"],
        build_args: args,
    };

    let root = audio_root();
    let invoker =
        PlaybackInvoker::new(root.path()).with_registry(PlayerRegistry::new(vec![missing]));

    let err = invoker.play("song.mp3").await.unwrap_err();
    assert!(matches!(err, PlaybackError::Spawn { player: "missing", .. }));
}
