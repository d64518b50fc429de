use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

/// Completes file and directory names. Relative input is looked up under
/// the engine's working directory, not the process's.
#[derive(Clone, Default)]
pub struct PathCompleter;

impl PathCompleter {
    pub fn new() -> Self {
        Self
    }

    pub fn complete_path(&self, incomplete: &str, cwd: &Path) -> Vec<Pair> {
        // Split into the directory part as typed and the name prefix.
        let (typed_dir, file_prefix) = match incomplete.rfind('/') {
            Some(idx) => (&incomplete[..=idx], &incomplete[idx + 1..]),
            None => ("", incomplete),
        };

        let dir_to_search: PathBuf = if typed_dir.is_empty() {
            cwd.to_path_buf()
        } else {
            cwd.join(typed_dir)
        };

        let mut matches = Vec::new();
        if let Ok(entries) = fs::read_dir(&dir_to_search) {
            for entry in entries.filter_map(Result::ok) {
                let Some(name) = entry.file_name().to_str().map(String::from) else {
                    continue;
                };
                if !name.starts_with(file_prefix) {
                    continue;
                }
                // Hidden entries only when asked for.
                if name.starts_with('.') && !file_prefix.starts_with('.') {
                    continue;
                }
                matches.push(self.create_completion_pair(typed_dir, &name, entry.path().is_dir()));
            }
        }

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }

    fn create_completion_pair(&self, typed_dir: &str, name: &str, is_dir: bool) -> Pair {
        let relative_path = format!("{}{}", typed_dir, name);
        if is_dir {
            Pair {
                display: format!("{}/", name),
                replacement: format!("{}/", relative_path),
            }
        } else {
            Pair {
                display: name.to_string(),
                replacement: format!("{} ", relative_path),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replacements(pairs: Vec<Pair>) -> Vec<String> {
        pairs.into_iter().map(|p| p.replacement).collect()
    }

    #[test]
    fn test_complete_under_working_directory() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::create_dir(root.path().join("src")).expect("mkdir");
        fs::write(root.path().join("setup.sh"), "").expect("write");
        fs::write(root.path().join(".secret"), "").expect("write");

        let completer = PathCompleter::new();
        assert_eq!(
            replacements(completer.complete_path("s", root.path())),
            vec!["setup.sh ".to_string(), "src/".to_string()]
        );
        assert_eq!(
            replacements(completer.complete_path(".", root.path())),
            vec![".secret ".to_string()]
        );
    }

    #[test]
    fn test_complete_nested_and_absolute() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(root.path().join("a").join("bin")).expect("mkdir");

        let completer = PathCompleter::new();
        assert_eq!(
            replacements(completer.complete_path("a/b", root.path())),
            vec!["a/bin/".to_string()]
        );

        let absolute = format!("{}/a/", root.path().display());
        assert_eq!(
            replacements(completer.complete_path(&absolute, Path::new("/"))),
            vec![format!("{}bin/", absolute)]
        );
    }
}
