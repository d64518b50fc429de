use std::collections::BTreeMap;

mod cd;
mod clear;
mod list;

pub use cd::CdCommand;
pub use clear::ClearCommand;
pub use list::ListCommand;

use crate::console::OutputSink;
use crate::core::state::WorkingDirectory;

#[derive(Debug)]
pub enum CommandError {
    Usage(&'static str),
    PathNotFound(String),
    IoError(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Usage(usage) => write!(f, "Usage: {}", usage),
            CommandError::PathNotFound(path) => write!(f, "Directory '{}' does not exist", path),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

/// What a built-in may touch while it runs under the engine lock.
pub struct CommandContext<'a> {
    pub cwd: &'a mut WorkingDirectory,
    pub sink: &'a dyn OutputSink,
}

pub trait Command {
    /// `args[0]` is the command name as typed.
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError>;
}

#[derive(Clone)]
pub enum CommandType {
    ListDirectory(ListCommand),
    Clear(ClearCommand),
    ChangeDirectory(CdCommand),
}

impl Command for CommandType {
    fn execute(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<(), CommandError> {
        match self {
            CommandType::ListDirectory(cmd) => cmd.execute(ctx, args),
            CommandType::Clear(cmd) => cmd.execute(ctx, args),
            CommandType::ChangeDirectory(cmd) => cmd.execute(ctx, args),
        }
    }
}

/// Lower-cased command name to built-in. Fixed once built.
#[derive(Clone)]
pub struct BuiltinRegistry {
    commands: BTreeMap<String, CommandType>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();

        let list = CommandType::ListDirectory(ListCommand::new());
        commands.insert("dir".to_string(), list.clone());
        commands.insert("ls".to_string(), list);
        commands.insert("clear".to_string(), CommandType::Clear(ClearCommand::new()));
        commands.insert(
            "cd".to_string(),
            CommandType::ChangeDirectory(CdCommand::new()),
        );

        Self { commands }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&CommandType> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}
