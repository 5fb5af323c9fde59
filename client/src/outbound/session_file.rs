//! File-backed session store.
//!
//! The durable slot is one file whose entire contents are the bearer token.
//! Writes go to a hidden temporary sibling that is then renamed over the
//! target, so a crash never leaves a torn token behind. Clearing the slot
//! removes the file.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{AuthToken, Session};

#[cfg(unix)]
const TOKEN_FILE_MODE: u32 = 0o600;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Session store persisting the token to a single file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    directory: Utf8PathBuf,
    file_name: String,
}

impl FileSessionStore {
    /// Store the token at `path`. Parent directories are created on first
    /// write.
    ///
    /// # Errors
    ///
    /// Returns an error when `path` does not name a file.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Result<Self, SessionStoreError> {
        let target: Utf8PathBuf = path.into();
        let file_name = target
            .file_name()
            .ok_or_else(|| SessionStoreError::io(format!("{target} does not name a file")))?
            .to_owned();
        let directory = match target.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        Ok(Self {
            directory,
            file_name,
        })
    }

    /// Full path of the token file.
    pub fn path(&self) -> Utf8PathBuf {
        self.directory.join(&self.file_name)
    }

    fn open_dir(&self) -> io::Result<Dir> {
        Dir::open_ambient_dir(&self.directory, ambient_authority())
    }

    fn write_token(&self, token: &str) -> io::Result<()> {
        Dir::create_ambient_dir_all(&self.directory, ambient_authority())?;
        let dir = self.open_dir()?;
        write_atomic(&dir, &self.file_name, token)
    }

    fn clear(&self) -> io::Result<()> {
        let dir = match self.open_dir() {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };
        match dir.remove_file(&self.file_name) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn restore(&self) -> Option<AuthToken> {
        let contents = self
            .open_dir()
            .and_then(|dir| dir.read_to_string(&self.file_name));
        match contents {
            Ok(raw) => AuthToken::new(raw).ok(),
            Err(err) => {
                debug!(path = %self.path(), error = %err, "no readable session file");
                None
            }
        }
    }

    fn persist(&self, session: Option<&Session>) -> Result<(), SessionStoreError> {
        let outcome = match session {
            Some(session) => self.write_token(session.token().expose()),
            None => self.clear(),
        };
        outcome.map_err(|err| SessionStoreError::io(format!("{}: {err}", self.path())))
    }
}

fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(".{file_name}.tmp.{}.{suffix}.{counter}", std::process::id());

    if let Err(err) = write_temp(dir, &tmp_name, contents) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    if let Err(err) = rename_over(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    Ok(())
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    owner_only(&mut options);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

// The token is a bearer credential; other local users must not read it.
#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) {
    use cap_std::fs::OpenOptionsExt;
    options.mode(TOKEN_FILE_MODE);
}

#[cfg(not(unix))]
fn owner_only(_options: &mut OpenOptions) {}

#[cfg(windows)]
fn rename_over(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    match dir.remove_file(target_name) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
        _ => {}
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_over(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

/// Resolve the default token location under `home`.
pub fn default_session_path(home: Option<&Utf8Path>) -> Utf8PathBuf {
    home.unwrap_or_else(|| Utf8Path::new("."))
        .join(".landslide")
        .join("session_token")
}
