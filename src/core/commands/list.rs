use std::fs;

use super::{Command, CommandContext, CommandError};

/// `dir` / `ls`: names of the working directory's immediate entries.
#[derive(Clone)]
pub struct ListCommand;

impl Default for ListCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ListCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ListCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<(), CommandError> {
        let path = ctx.cwd.path();
        let mut names: Vec<String> = fs::read_dir(path)?
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        ctx.sink
            .append(&format!("\nWorking directory: {}", path.display()));
        ctx.sink.append(&format!("\n{}\n", names.join("\t")));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferSink;
    use crate::core::state::WorkingDirectory;

    #[test]
    fn test_list_entries_tab_joined() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::write(root.path().join("b.txt"), "").expect("write");
        fs::create_dir(root.path().join("a_dir")).expect("mkdir");
        fs::create_dir(root.path().join("a_dir").join("nested")).expect("mkdir");

        let sink = BufferSink::new();
        let mut cwd = WorkingDirectory::new(root.path().to_path_buf());
        let mut ctx = CommandContext {
            cwd: &mut cwd,
            sink: &sink,
        };
        ListCommand::new()
            .execute(&mut ctx, &["dir".to_string()])
            .expect("list failed");

        assert_eq!(
            sink.contents(),
            format!("\nWorking directory: {}\na_dir\tb.txt\n", root.path().display())
        );
    }

    #[test]
    fn test_list_vanished_directory_is_io_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let gone = root.path().join("gone");
        fs::create_dir(&gone).expect("mkdir");
        fs::remove_dir(&gone).expect("rmdir");

        let sink = BufferSink::new();
        let mut cwd = WorkingDirectory::new(gone);
        let mut ctx = CommandContext {
            cwd: &mut cwd,
            sink: &sink,
        };
        let result = ListCommand::new().execute(&mut ctx, &["ls".to_string()]);

        assert!(matches!(result, Err(CommandError::IoError(_))));
        assert_eq!(sink.contents(), "");
    }
}
