/// File storage service - manages uploaded audio files on disk
use crate::error::{Result, ServerError};
use speakerbox_playback::format;
use std::path::{Component, Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
    max_upload_bytes: usize,
}

impl FileStorage {
    pub fn new(base_path: PathBuf, max_upload_bytes: usize) -> Self {
        Self {
            base_path,
            max_upload_bytes,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Initialize storage directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Store an uploaded file and return the stored file name
    ///
    /// Only the final component of `original_name` is used. When a file with
    /// that name already exists a short random suffix is added to the stem.
    pub async fn store_upload(&self, original_name: &str, data: &[u8]) -> Result<String> {
        let file_name = sanitize_file_name(original_name)?;

        let extension = format::extension_of(Path::new(&file_name))
            .filter(|ext| format::is_supported(ext))
            .ok_or_else(|| {
                ServerError::BadRequest(format!(
                    "Unsupported audio format. Supported formats: {}",
                    format::supported_list()
                ))
            })?;

        if data.is_empty() {
            return Err(ServerError::BadRequest("Uploaded file is empty".to_string()));
        }

        if data.len() > self.max_upload_bytes {
            return Err(ServerError::BadRequest(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_upload_bytes
            )));
        }

        fs::create_dir_all(&self.base_path).await?;

        let mut candidate = file_name.clone();
        loop {
            let path = self.base_path.join(&candidate);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(data).await?;
                    file.flush().await?;
                    tracing::info!("Stored upload {} ({} bytes)", candidate, data.len());
                    return Ok(candidate);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    candidate = with_suffix(&file_name, &extension);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Absolute path of a stored file
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf> {
        let relative = Path::new(file_name);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if file_name.is_empty() || !is_plain {
            return Err(ServerError::BadRequest(format!(
                "Invalid file name: {}",
                file_name
            )));
        }
        Ok(self.base_path.join(relative))
    }

    /// Delete a stored file; a missing file is not an error
    pub async fn delete(&self, file_name: &str) -> Result<()> {
        let path = self.path_for(file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Last path component of a client supplied name, without separators of
/// either platform
fn sanitize_file_name(original_name: &str) -> Result<String> {
    let name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(ServerError::BadRequest("Missing file name".to_string()));
    }

    Ok(name.to_string())
}

/// `song.mp3` -> `song_1a2b3c4d.mp3`
fn with_suffix(file_name: &str, extension: &str) -> String {
    let stem = &file_name[..file_name.len() - extension.len()];
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}{}", stem, &suffix[..8], &file_name[file_name.len() - extension.len()..])
}
