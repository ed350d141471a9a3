//! Lexical containment checks for the static asset root.
//!
//! Containment is decided purely by path normalization. Nothing here touches the
//! filesystem except [`PathSandbox::try_new`], which canonicalizes the root once.

use std::ffi::OsString;
use std::io;
use std::path::{Component, MAIN_SEPARATOR_STR, Path, PathBuf};

use path_clean::PathClean;

/// A fixed, canonical directory that delivery must never read outside of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSandbox {
    root: PathBuf,
}

impl PathSandbox {
    /// Canonicalize `root` and wrap it. The directory must exist.
    pub fn try_new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("sandbox root {} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the joined path for `candidate` when it stays under the root.
    pub fn resolve(&self, candidate: &str) -> Option<PathBuf> {
        let joined = join_lexically(&self.root, candidate);
        is_within(&self.root.clean(), &joined).then_some(joined)
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.resolve(candidate).is_some()
    }
}

/// True if `candidate`, appended below `root` and normalized, stays under `root`.
///
/// `candidate` is always appended, even when absolute: `/etc/passwd` under
/// `/srv/www` becomes `/srv/www/etc/passwd`. The prefix test is component
/// aligned, so `/srv/www2` is not inside `/srv/www`. A relative root is taken
/// as given; `.` contains everything that does not climb above it.
pub fn contains(root: &Path, candidate: &str) -> bool {
    let joined = join_lexically(root, candidate);
    is_within(&root.clean(), &joined)
}

fn join_lexically(root: &Path, candidate: &str) -> PathBuf {
    let mut joined = OsString::from(root.as_os_str());
    joined.push(MAIN_SEPARATOR_STR);
    joined.push(candidate);
    PathBuf::from(joined).clean()
}

fn is_within(root: &Path, joined: &Path) -> bool {
    if joined.as_os_str().is_empty() {
        return false;
    }
    // Cleaning drops the leading `./` from the join, so `.` matches any path
    // that stays relative and never starts with `..`.
    if root == Path::new(".") {
        return !matches!(
            joined.components().next(),
            Some(Component::ParentDir | Component::RootDir | Component::Prefix(_))
        );
    }
    joined.starts_with(root)
}
