use super::{Command, CommandContext, CommandError};

#[derive(Clone)]
pub struct ClearCommand;

impl Default for ClearCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ClearCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ClearCommand {
    fn execute(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<(), CommandError> {
        ctx.sink.clear();
        Ok(())
    }
}
