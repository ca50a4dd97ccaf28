//! Session cache persisted as JSON files in one directory.
//!
//! Used by the terminal client so a returning user sees their profile
//! before the network answers. Writes are staged and renamed into place so
//! a crash never leaves a half-written entry.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::ports::{SessionCache, SessionCacheError};
use crate::domain::{AuthSession, UserProfile};

const SESSION_FILE: &str = "session.json";
const PROFILE_FILE: &str = "profile.json";

/// [`SessionCache`] backed by `session.json` and `profile.json`.
pub struct FileSessionCache {
    dir: Dir,
    path: PathBuf,
}

impl FileSessionCache {
    /// Open (creating when absent) the cache directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&path, ambient_authority())?;
        Ok(Self { dir, path })
    }

    /// Directory holding the cache files.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, file: &str, error: io::Error) -> SessionCacheError {
        SessionCacheError::io(format!("{}: {error}", self.path.join(file).display()))
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, SessionCacheError> {
        let bytes = match self.dir.read(file) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(file, error)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|error| SessionCacheError::corrupt(format!("{file}: {error}")))
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), SessionCacheError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|error| SessionCacheError::corrupt(format!("{file}: {error}")))?;
        let staged = format!(".{file}.{}", Uuid::new_v4().simple());
        self.dir
            .write(&staged, bytes)
            .map_err(|error| self.io_error(&staged, error))?;
        self.dir.rename(&staged, &self.dir, file).map_err(|error| {
            let _ = self.dir.remove_file(&staged);
            self.io_error(file, error)
        })
    }

    fn remove(&self, file: &str) -> Result<(), SessionCacheError> {
        match self.dir.remove_file(file) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(file, error)),
        }
    }
}

impl SessionCache for FileSessionCache {
    fn load_session(&self) -> Result<Option<AuthSession>, SessionCacheError> {
        self.read(SESSION_FILE)
    }

    fn store_session(&self, session: &AuthSession) -> Result<(), SessionCacheError> {
        self.write(SESSION_FILE, session)
    }

    fn load_profile(&self) -> Result<Option<UserProfile>, SessionCacheError> {
        self.read(PROFILE_FILE)
    }

    fn store_profile(&self, profile: &UserProfile) -> Result<(), SessionCacheError> {
        self.write(PROFILE_FILE, profile)
    }

    fn clear_profile(&self) -> Result<(), SessionCacheError> {
        self.remove(PROFILE_FILE)
    }

    fn clear(&self) -> Result<(), SessionCacheError> {
        self.remove(SESSION_FILE)?;
        self.remove(PROFILE_FILE)
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the on-disk cache layout.

    use super::*;
    use crate::domain::UserType;
    use crate::test_support::{profile, session_for};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workspace() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    fn empty_directory_reads_as_empty(workspace: TempDir) {
        let cache = FileSessionCache::open(workspace.path().join("nested/cache")).expect("open");
        assert_eq!(cache.load_session().expect("read"), None);
        assert_eq!(cache.load_profile().expect("read"), None);
    }

    #[rstest]
    fn entries_survive_reopening(workspace: TempDir) {
        let user = profile(UserType::Startup);
        let session = session_for(&user.id);
        {
            let cache = FileSessionCache::open(workspace.path()).expect("open");
            cache.store_session(&session).expect("store session");
            cache.store_profile(&user).expect("store profile");
        }
        let reopened = FileSessionCache::open(workspace.path()).expect("reopen");
        assert_eq!(reopened.load_session().expect("read"), Some(session));
        assert_eq!(reopened.load_profile().expect("read"), Some(user));
    }

    #[rstest]
    fn clear_profile_keeps_the_session(workspace: TempDir) {
        let user = profile(UserType::Enterprise);
        let cache = FileSessionCache::open(workspace.path()).expect("open");
        cache.store_session(&session_for(&user.id)).expect("store");
        cache.store_profile(&user).expect("store");

        cache.clear_profile().expect("clear profile");
        assert!(cache.load_session().expect("read").is_some());
        assert_eq!(cache.load_profile().expect("read"), None);

        cache.clear().expect("clear");
        cache.clear().expect("clearing twice is fine");
        assert_eq!(cache.load_session().expect("read"), None);
    }

    #[rstest]
    fn garbage_is_reported_as_corrupt(workspace: TempDir) {
        std::fs::write(workspace.path().join(SESSION_FILE), b"{not json").expect("seed");
        let cache = FileSessionCache::open(workspace.path()).expect("open");
        assert!(matches!(
            cache.load_session(),
            Err(SessionCacheError::Corrupt { .. })
        ));
    }
}
