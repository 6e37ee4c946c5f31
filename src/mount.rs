use chrono::{DateTime, SecondsFormat, Utc};
use std::io;
use std::path::{Path, PathBuf};

/// Hostname used in marker file names if the system lookup fails
const UNKNOWN_HOST: &str = "unknown-host";

/// Failure to enumerate the mount directory
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read {}: {}", .0.display(), .1)]
    Unreadable(PathBuf, #[source] io::Error),
}

/// Outcome of a marker file creation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFile {
    pub path: PathBuf,
    pub created: bool,
}

/// The directory backed by the external volume
#[derive(Debug, Clone)]
pub struct MountDir {
    path: PathBuf,
}

impl MountDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// An empty `MOUNT_PATH` means no mount is configured
    pub fn is_configured(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    /// Names of the entries directly under the mount path
    ///
    /// Hidden entries are skipped and the result is sorted by name, which is
    /// what a plain `ls` of the directory shows.
    pub async fn list_entries(&self) -> Result<Vec<String>, MountError> {
        if !self.is_configured() {
            return Err(MountError::NotFound(self.path.clone()));
        }

        let mut dir = tokio::fs::read_dir(&self.path)
            .await
            .map_err(|err| self.classify(err))?;

        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|err| self.classify(err))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();

        tracing::debug!("Listed {} entries under {}", names.len(), self.path.display());
        Ok(names)
    }

    /// `{mount_path}/{hostname}_{UTC timestamp}` with millisecond precision
    ///
    /// An unconfigured mount renders as `/{hostname}_{timestamp}`, never as a
    /// path relative to the working directory.
    pub fn marker_file_path(&self, hostname: &str, now: DateTime<Utc>) -> PathBuf {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let name = format!("{}_{}", hostname, timestamp);
        if self.is_configured() {
            self.path.join(name)
        } else {
            PathBuf::from(format!("/{}", name))
        }
    }

    /// Create an empty marker file named after this host and the current time
    ///
    /// Never overwrites: if the name already exists the attempt counts as a
    /// failure. Errors are logged and reduced to `created == false`. Without
    /// a configured mount the filesystem is not touched at all.
    pub async fn create_marker_file(&self) -> MarkerFile {
        let hostname = local_hostname();
        let path = self.marker_file_path(&hostname, Utc::now());

        if !self.is_configured() {
            tracing::warn!("MOUNT_PATH is not set, not creating {}", path.display());
            return MarkerFile { path, created: false };
        }

        create_empty_file(path).await
    }

    fn classify(&self, err: io::Error) -> MountError {
        if err.kind() == io::ErrorKind::NotFound {
            MountError::NotFound(self.path.clone())
        } else {
            MountError::Unreadable(self.path.clone(), err)
        }
    }
}

async fn create_empty_file(path: PathBuf) -> MarkerFile {
    let result = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await;

    let created = match result {
        Ok(_) => {
            tracing::info!("Created marker file {}", path.display());
            true
        }
        Err(err) => {
            tracing::warn!("Failed to create marker file {}: {}", path.display(), err);
            false
        }
    };

    MarkerFile { path, created }
}

fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(err) => {
            tracing::warn!("Hostname lookup failed, using {}: {}", UNKNOWN_HOST, err);
            UNKNOWN_HOST.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;

    #[tokio::test]
    async fn test_list_entries_sorted_without_hidden() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let entries = MountDir::new(dir.path()).list_entries().await.unwrap();

        assert_eq!(entries, vec!["a.txt", "b.txt", "nested"]);
    }

    #[tokio::test]
    async fn test_list_entries_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let entries = MountDir::new(dir.path()).list_entries().await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_list_entries_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let result = MountDir::new(&missing).list_entries().await;

        assert!(matches!(result, Err(MountError::NotFound(path)) if path == missing));
    }

    #[tokio::test]
    async fn test_list_entries_on_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "").unwrap();

        let result = MountDir::new(&file).list_entries().await;

        assert!(matches!(result, Err(MountError::Unreadable(..))));
    }

    #[test]
    fn test_marker_file_path_format() {
        let mount = MountDir::new("/mnt/efs");
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let path = mount.marker_file_path("web-1", now);

        assert_eq!(path, PathBuf::from("/mnt/efs/web-1_2024-01-01T00:00:00.000Z"));
    }

    #[tokio::test]
    async fn test_create_marker_file() {
        let dir = tempfile::tempdir().unwrap();
        let mount = MountDir::new(dir.path());

        let marker = mount.create_marker_file().await;

        assert!(marker.created);
        assert_eq!(marker.path.parent(), Some(dir.path()));
        assert_eq!(fs::metadata(&marker.path).unwrap().len(), 0);

        let name = marker.path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(&format!("{}_", local_hostname())));
        assert!(name.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_repeated_markers_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mount = MountDir::new(dir.path());

        let first = mount.create_marker_file().await;
        let second = mount.create_marker_file().await;

        assert!(first.created);
        // Either the timestamps differ or the second attempt reports failure
        assert!(first.path != second.path || !second.created);
    }

    #[tokio::test]
    async fn test_existing_name_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mount = MountDir::new(dir.path());
        let path = mount.marker_file_path("web-1", Utc::now());
        fs::write(&path, "keep").unwrap();

        let marker = create_empty_file(path.clone()).await;

        assert!(!marker.created);
        assert_eq!(marker.path, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_create_marker_file_in_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mount = MountDir::new(dir.path().join("missing"));

        let marker = mount.create_marker_file().await;

        assert!(!marker.created);
        assert!(marker.path.starts_with(dir.path().join("missing")));
    }

    #[tokio::test]
    async fn test_unconfigured_mount() {
        let mount = MountDir::new("");
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert!(!mount.is_configured());
        assert_eq!(
            mount.marker_file_path("web-1", now),
            PathBuf::from("/web-1_2024-01-01T00:00:00.000Z")
        );
        assert!(matches!(
            mount.list_entries().await,
            Err(MountError::NotFound(path)) if path.as_os_str().is_empty()
        ));

        let marker = mount.create_marker_file().await;
        assert!(!marker.created);
        assert!(marker.path.is_absolute());
        assert!(!marker.path.exists());
    }

    #[test]
    fn test_error_messages() {
        let missing = MountError::NotFound(PathBuf::from("/mnt/none"));
        assert_eq!(missing.to_string(), "/mnt/none does not exist");

        let denied = MountError::Unreadable(
            PathBuf::from("/mnt/locked"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(denied.to_string(), "cannot read /mnt/locked: denied");
        assert!(std::error::Error::source(&denied).is_some());
    }
}
