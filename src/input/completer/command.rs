use std::{collections::BTreeSet, env, fs};

use rustyline::completion::Pair;

/// Completes the command word from the built-ins and the executables on
/// `PATH`.
#[derive(Clone)]
pub struct CommandCompleter {
    builtins: BTreeSet<String>,
    commands: BTreeSet<String>,
}

impl CommandCompleter {
    pub fn new(builtins: Vec<String>) -> Self {
        let mut completer = Self {
            builtins: builtins.into_iter().collect(),
            commands: BTreeSet::new(),
        };
        completer.refresh_commands();
        completer
    }

    pub fn refresh_commands(&mut self) {
        self.commands.clear();
        if let Some(path_var) = env::var_os("PATH") {
            for path in env::split_paths(&path_var) {
                if let Ok(entries) = fs::read_dir(path) {
                    for entry in entries.filter_map(Result::ok) {
                        if let Ok(file_type) = entry.file_type() {
                            if file_type.is_file() || file_type.is_symlink() {
                                if let Some(name) = entry.file_name().to_str() {
                                    self.commands.insert(name.to_string());
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn complete_command(&self, word: &str) -> Vec<Pair> {
        let input = word.trim();
        let mut matches: Vec<Pair> = self
            .builtins
            .iter()
            .filter(|name| name.starts_with(input))
            .map(|name| Pair {
                display: format!("{} (built-in)", name),
                replacement: format!("{} ", name),
            })
            .collect();

        matches.extend(
            self.commands
                .iter()
                .filter(|cmd| cmd.starts_with(input) && !self.builtins.contains(*cmd))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                }),
        );
        matches
    }
}
