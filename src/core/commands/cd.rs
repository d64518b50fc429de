use super::{Command, CommandContext, CommandError};

#[derive(Clone)]
pub struct CdCommand;

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self
    }
}

/// Strips one pair of surrounding double quotes.
fn unquote(path: &str) -> &str {
    path.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(path)
}

impl Command for CdCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
        if args.len() <= 1 {
            return Err(CommandError::Usage("cd [directory]"));
        }

        let typed = args[1..].join(" ");
        let typed = typed.trim();
        let target = unquote(typed);

        let resolved = ctx
            .cwd
            .resolve(target)
            .ok_or_else(|| CommandError::PathNotFound(typed.to_string()))?;

        ctx.cwd.set(resolved);
        ctx.sink.append(&format!(
            "\nWorking directory changed to '{}'",
            ctx.cwd.path().display()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferSink;
    use crate::core::state::WorkingDirectory;
    use std::fs;
    use std::path::Path;

    fn run(cwd: &mut WorkingDirectory, line: &str) -> (Result<(), CommandError>, String) {
        let sink = BufferSink::new();
        let args: Vec<String> = line.split_whitespace().map(String::from).collect();
        let mut ctx = CommandContext { cwd, sink: &sink };
        let result = CdCommand::new().execute(&mut ctx, &args);
        (result, sink.contents())
    }

    fn canonical(path: &Path) -> std::path::PathBuf {
        path.canonicalize().expect("canonicalize")
    }

    #[test]
    fn test_cd_without_argument_is_usage_error() {
        let start = WorkingDirectory::new(std::env::temp_dir());
        let mut cwd = start.clone();

        let (result, output) = run(&mut cwd, "cd");

        assert!(matches!(result, Err(CommandError::Usage(_))));
        assert_eq!(output, "");
        assert_eq!(cwd, start);
    }

    #[test]
    fn test_cd_into_child() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::create_dir(root.path().join("child")).expect("mkdir");
        let mut cwd = WorkingDirectory::new(root.path().to_path_buf());

        let (result, output) = run(&mut cwd, "cd child");

        assert!(result.is_ok());
        let expected = canonical(&root.path().join("child"));
        assert_eq!(cwd.path(), expected);
        assert_eq!(
            output,
            format!("\nWorking directory changed to '{}'", expected.display())
        );
    }

    #[test]
    fn test_cd_parent() {
        let root = tempfile::tempdir().expect("tempdir");
        let child = root.path().join("child");
        fs::create_dir(&child).expect("mkdir");
        let mut cwd = WorkingDirectory::new(child);

        let (result, output) = run(&mut cwd, "cd ..");

        assert!(result.is_ok());
        assert_eq!(cwd.path(), canonical(root.path()));
        assert!(output.starts_with("\nWorking directory changed to '"));
    }

    #[test]
    fn test_cd_quoted_and_unquoted_with_space_agree() {
        let root = tempfile::tempdir().expect("tempdir");
        fs::create_dir(root.path().join("sub dir")).expect("mkdir");

        let mut quoted = WorkingDirectory::new(root.path().to_path_buf());
        let mut bare = quoted.clone();
        let (quoted_result, _) = run(&mut quoted, "cd \"sub dir\"");
        let (bare_result, _) = run(&mut bare, "cd sub dir");

        assert!(quoted_result.is_ok());
        assert!(bare_result.is_ok());
        assert_eq!(quoted, bare);
        assert_eq!(quoted.path(), canonical(&root.path().join("sub dir")));
    }

    #[test]
    fn test_cd_missing_reports_typed_argument() {
        let root = tempfile::tempdir().expect("tempdir");
        let start = WorkingDirectory::new(root.path().to_path_buf());
        let mut cwd = start.clone();

        let (result, _) = run(&mut cwd, "cd missing_dir");
        match result {
            Err(err @ CommandError::PathNotFound(_)) => {
                assert_eq!(err.to_string(), "Directory 'missing_dir' does not exist")
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let (result, _) = run(&mut cwd, "cd \"no such\"");
        assert_eq!(
            result.map_err(|e| e.to_string()),
            Err("Directory '\"no such\"' does not exist".to_string())
        );
        assert_eq!(cwd, start);
    }

    #[test]
    fn test_cd_absolute_path() {
        let root = tempfile::tempdir().expect("tempdir");
        let mut cwd = WorkingDirectory::new(std::env::temp_dir());
        let line = format!("cd {}", root.path().display());

        let (result, _) = run(&mut cwd, &line);

        assert!(result.is_ok());
        assert_eq!(cwd.path(), canonical(root.path()));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a b\""), "a b");
        assert_eq!(unquote("\"open"), "\"open");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\"\""), "");
    }
}
