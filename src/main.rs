use std::env;
use tether::flags::Flags;
use tether::shell::Shell;

fn main() -> Result<(), tether::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("tether {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tether::logging::init(flags.is_set("quiet"), flags.is_set("debug"))?;

    let mut shell = Shell::new(&flags)?;
    tracing::debug!(cwd = %shell.engine().working_directory().display(), "console ready");
    shell.run()
}
