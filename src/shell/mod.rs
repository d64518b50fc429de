use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustyline::{error::ReadlineError, history::FileHistory, Editor};

use crate::{
    console::{OutputSink, Printer, TerminalSink},
    core::{config::Config, EngineOptions, Mode, ShellEngine, WorkingDirectory},
    error::ShellError,
    flags::Flags,
    input::ConsoleHelper,
};

/// Terminal front-end: reads lines with rustyline and hands them to the
/// engine, which writes everything else through a [`TerminalSink`].
pub struct Shell {
    pub(crate) editor: Editor<ConsoleHelper, FileHistory>,
    pub(crate) engine: Arc<ShellEngine>,
    pub(crate) sink: Arc<TerminalSink>,
    pub(crate) config: Config,
    // A line typed for a child that exited before it was submitted.
    carried: Option<String>,
}

impl Shell {
    pub fn new(flags: &Flags) -> Result<Self, ShellError> {
        let config = Config::load(flags.get_value("config").map(Path::new))?;

        let cwd = match flags.get_value("directory") {
            Some(dir) => starting_directory(dir)?,
            None => WorkingDirectory::from_process()?,
        };

        let editor_config = rustyline::Config::builder()
            .max_history_size(config.history_size)?
            .auto_add_history(true)
            .build();
        let mut editor = Editor::<ConsoleHelper, FileHistory>::with_config(editor_config)?;

        let printer: Option<Printer> = match editor.create_external_printer() {
            Ok(printer) => Some(Box::new(printer)),
            Err(e) => {
                tracing::debug!(error = %e, "no editor printer, writing to stdout");
                None
            }
        };
        let sink = Arc::new(TerminalSink::new(printer)?);

        // The editor leaves each submitted line on screen after its prompt,
        // which reads exactly like the engine's echo.
        let options = EngineOptions {
            echo_input: false,
            ..config.engine_options()
        };
        let engine = Arc::new(ShellEngine::with_directory(sink.clone(), cwd, options));
        editor.set_helper(Some(ConsoleHelper::new(engine.clone(), config.color)));

        if config.history_file.exists() {
            if let Err(e) = editor.load_history(&config.history_file) {
                tracing::warn!(error = %e, path = %config.history_file.display(), "couldn't load history");
            }
        }

        // Covers Ctrl-C arriving while the terminal is not in raw mode.
        let interrupt_target = Arc::clone(&engine);
        ctrlc::set_handler(move || {
            if let Err(e) = interrupt_target.interrupt() {
                tracing::warn!(error = %e, "interrupt failed");
            }
        })?;

        Ok(Shell {
            editor,
            engine,
            sink,
            config,
            carried: None,
        })
    }

    pub fn engine(&self) -> &Arc<ShellEngine> {
        &self.engine
    }

    fn prompt(&self, mode: Mode) -> String {
        match mode {
            Mode::Attached => format!("{}> ", self.config.attached_marker),
            Mode::Local => format!("{}> ", self.engine.working_directory().display()),
        }
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            let mode = self.engine.mode();
            let prompt = self.prompt(mode);
            let read = match self.carried.take() {
                Some(text) => self.editor.readline_with_initial(&prompt, (&text, "")),
                None => self.editor.readline(&prompt),
            };
            match read {
                Ok(line) => self.submit(mode, line),
                Err(ReadlineError::Interrupted) => self.on_interrupt(),
                Err(ReadlineError::Eof) => break,
                Err(e) => self.report(&format!("Error: {}", e)),
            }
        }

        self.sink.flush();
        self.save_history();
        Ok(())
    }

    fn submit(&mut self, prompted: Mode, line: String) {
        if !should_submit(prompted, self.engine.mode(), &line) {
            // The prompt still said attached; offer the line again under
            // the local prompt instead of running it as a command.
            self.sink.append("\nApplication exited before the line was sent\n");
            self.sink.flush();
            self.carried = Some(line);
            return;
        }
        self.engine.submit_line(&line);
        self.sink.flush();
    }

    fn on_interrupt(&self) {
        match self.engine.interrupt() {
            Ok(true) => {}
            Ok(false) => self.sink.append("\nUse Ctrl-D to exit\n"),
            Err(e) => self.report(&e.to_string()),
        }
    }

    fn save_history(&mut self) {
        if let Err(e) = self.editor.save_history(&self.config.history_file) {
            tracing::warn!(error = %e, "couldn't save history");
        }
    }

    fn report(&self, message: &str) {
        let text = match self.editor.helper() {
            Some(helper) => helper.highlighter().highlight_error(message),
            None => message.to_string(),
        };
        eprintln!("{}", text);
    }
}

/// A line typed at an attached prompt is only handed to the engine if the
/// engine is still attached; blank lines are harmless either way.
fn should_submit(prompted: Mode, current: Mode, line: &str) -> bool {
    prompted == current || prompted == Mode::Local || line.trim().is_empty()
}

fn starting_directory(dir: &str) -> Result<WorkingDirectory, ShellError> {
    let path = PathBuf::from(dir).canonicalize()?;
    if !path.is_dir() {
        return Err(ShellError::FlagError(format!("{} is not a directory", dir)));
    }
    Ok(WorkingDirectory::new(path))
}
