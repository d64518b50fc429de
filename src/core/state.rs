use std::path::{Path, PathBuf};

/// The shell's notion of "current directory".
///
/// Validated only when it changes; a directory removed afterwards is noticed
/// by whichever command next touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    path: PathBuf,
}

impl WorkingDirectory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Starts at the directory the process was launched from.
    pub fn from_process() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves `target` against this directory, then against the process's
    /// own directory. The first existing directory wins and is returned in
    /// canonical form.
    pub fn resolve(&self, target: &str) -> Option<PathBuf> {
        [self.path.join(target), PathBuf::from(target)]
            .into_iter()
            .find(|candidate| candidate.is_dir())
            .and_then(|found| found.canonicalize().ok())
    }

    pub fn set(&mut self, path: PathBuf) {
        self.path = path;
    }
}
