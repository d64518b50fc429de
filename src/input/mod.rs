mod completer;

pub use completer::ConsoleHelper;
