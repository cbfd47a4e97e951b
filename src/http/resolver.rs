//! Maps request paths onto files under the serving root.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs::File;
use url::Url;

#[derive(Debug)]
pub enum ResolveError {
    NotFound,
    /// The path would leave the serving root.
    OutsideRoot,
    Permission,
    Io(io::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "not found"),
            ResolveError::OutsideRoot => write!(f, "path escapes serving root"),
            ResolveError::Permission => write!(f, "permission denied"),
            ResolveError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<io::Error> for ResolveError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound
            | io::ErrorKind::NotADirectory
            | io::ErrorKind::InvalidInput => ResolveError::NotFound,
            io::ErrorKind::PermissionDenied => ResolveError::Permission,
            _ => ResolveError::Io(e),
        }
    }
}

/// An open file together with the length it had when it was opened.
///
/// The handle is owned by the connection serving the request and is closed
/// when this value is dropped.
#[derive(Debug)]
pub struct ResolvedFile {
    pub file: File,
    pub len: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    /// Creates a resolver for `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Opens the file named by a request path.
    ///
    /// The length is read from the open handle, so the size reported in the
    /// headers belongs to the same file the body is copied from.
    pub async fn resolve(&self, request_path: &str) -> Result<ResolvedFile, ResolveError> {
        let relative = normalize(request_path)?;
        if relative.as_os_str().is_empty() {
            return Err(ResolveError::NotFound);
        }

        let candidate = self.root.join(&relative);
        let path = tokio::fs::canonicalize(&candidate).await?;

        if !path.starts_with(&self.root) {
            tracing::warn!(
                path = %request_path,
                resolved = %path.display(),
                "Path traversal attempt blocked"
            );
            return Err(ResolveError::OutsideRoot);
        }

        let file = File::open(&path).await?;
        let meta = file.metadata().await.map_err(|_| ResolveError::NotFound)?;
        if !meta.is_file() {
            return Err(ResolveError::NotFound);
        }

        Ok(ResolvedFile {
            file,
            len: meta.len(),
            path,
        })
    }
}

/// Turns a request path into a relative filesystem path.
///
/// Dot segments are removed and percent escapes decoded by resolving the path
/// as a `file:` URL. Anything left that is not a plain name, such as a `..`
/// produced by an encoded slash, is rejected.
pub fn normalize(request_path: &str) -> Result<PathBuf, ResolveError> {
    let url = Url::parse("file:///")
        .and_then(|base| base.join(&format!("./{request_path}")))
        .map_err(|_| ResolveError::NotFound)?;

    let absolute = url.to_file_path().map_err(|_| ResolveError::NotFound)?;

    let mut relative = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(name) => relative.push(name),
            Component::ParentDir | Component::Prefix(_) => return Err(ResolveError::OutsideRoot),
        }
    }

    Ok(relative)
}
