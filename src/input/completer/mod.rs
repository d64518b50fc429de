mod command;
mod helper;
mod path;

pub use helper::ConsoleHelper;
