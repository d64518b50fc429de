use std::{borrow::Cow, sync::Arc};

use super::{command::CommandCompleter, path::PathCompleter};
use crate::core::ShellEngine;
use crate::highlight::SyntaxHighlighter;

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

/// rustyline helper for the console: completion and highlighting while in
/// local mode, plain passthrough while a child is attached.
pub struct ConsoleHelper {
    engine: Arc<ShellEngine>,
    command_completer: CommandCompleter,
    path_completer: PathCompleter,
    highlighter: SyntaxHighlighter,
}

impl ConsoleHelper {
    pub fn new(engine: Arc<ShellEngine>, color: bool) -> Self {
        let builtins = engine.builtin_names();
        ConsoleHelper {
            command_completer: CommandCompleter::new(builtins.clone()),
            path_completer: PathCompleter::new(),
            highlighter: SyntaxHighlighter::new(color, builtins),
            engine,
        }
    }

    pub fn highlighter(&self) -> &SyntaxHighlighter {
        &self.highlighter
    }
}

impl Helper for ConsoleHelper {}

impl Highlighter for ConsoleHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.engine.is_attached() {
            return Cow::Borrowed(line);
        }
        Cow::Owned(self.highlighter.highlight_command(line))
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(
            self.highlighter
                .highlight_prompt(prompt, self.engine.is_attached()),
        )
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;
}

impl Validator for ConsoleHelper {}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if self.engine.is_attached() {
            return Ok((pos, Vec::new()));
        }

        let line_up_to_cursor = &line[..pos];
        // Start of the word under the cursor.
        let start = line_up_to_cursor
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(idx, c)| idx + c.len_utf8());
        let word = &line_up_to_cursor[start..];
        let is_command_word = line_up_to_cursor[..start].trim().is_empty();

        let matches = if is_command_word {
            self.command_completer.complete_command(word)
        } else {
            self.path_completer
                .complete_path(word, &self.engine.working_directory())
        };

        Ok((start, matches))
    }
}
