//! Built-in terminal commands.
//!
//! The [`Command`] catalog drives three things: name lookup for dispatch,
//! the `help` listing, and the binaries seeded into `/bin`. Catalog order is
//! the order of both.
//!
//! Filesystem commands live in [`fs`], everything else in [`info`]. Each one
//! is a plain function of the session and its argument string returning a
//! [`CommandResult`]; errors carry their own shell-style message.

mod error;
mod fs;
mod info;

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::config::TerminalConfig;
use crate::session::Session;

pub use error::{CommandResult, ShellError};
pub use info::DATE_HELP;

/// Output of a successful `reset`.
pub const RESET_MESSAGE: &str = "Terminal session has been reset.";

/// Every command the terminal knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Help,
    About,
    /// Handled by the browser; the server just acknowledges it.
    Clear,
    Echo,
    Whoami,
    Ls,
    Pwd,
    Date,
    Cd,
    Cat,
    Rm,
    Tree,
    Touch,
    Nano,
    /// Drops the session. The dispatcher removes it from the store.
    Reset,
    /// Handled by the browser; the server just acknowledges it.
    Exit,
}

impl Command {
    /// Name as typed at the prompt.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Names of all commands, in catalog order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::iter().map(|c| c.name())
    }

    /// Synopsis shown by `help`.
    pub fn usage(&self) -> &'static str {
        match self {
            Command::Echo => "echo [text]",
            Command::Cd => "cd [path]",
            Command::Cat => "cat [file]",
            Command::Rm => "rm [file]",
            Command::Tree => "tree [path]",
            Command::Touch => "touch [file]",
            Command::Nano => "nano [file]",
            other => other.name(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Help => "Show this help message",
            Command::About => "About this terminal",
            Command::Clear => "Clear the terminal",
            Command::Echo => "Echo text back",
            Command::Whoami => "Display the current user",
            Command::Ls => "List directory contents",
            Command::Pwd => "Print working directory",
            Command::Date => "Show current date and time with optional format",
            Command::Cd => "Change directory to path",
            Command::Cat => "Display file contents",
            Command::Rm => "Remove a file",
            Command::Tree => "Display directory tree",
            Command::Touch => "Create a new empty file",
            Command::Nano => "Edit a file (write content)",
            Command::Reset => "Reset the terminal session",
            Command::Exit => "Exit the terminal session",
        }
    }
}

/// Run `command` against `session`.
///
/// `args` is the raw argument string; each command splits it as its grammar
/// requires.
pub fn run(
    command: Command,
    session: &mut Session,
    args: &str,
    config: &TerminalConfig,
) -> CommandResult {
    match command {
        Command::Ls => fs::ls(session, args),
        Command::Pwd => Ok(session.cwd().to_string()),
        Command::Cd => fs::cd(session, args),
        Command::Cat => fs::cat(session, args),
        Command::Touch => fs::touch(session, args),
        Command::Nano => fs::nano(session, args),
        Command::Rm => fs::rm(session, args),
        Command::Tree => fs::tree(session, args),
        Command::Echo => Ok(args.to_string()),
        Command::Date => info::date(args),
        Command::Help => Ok(info::help()),
        Command::About => Ok(config.about.clone()),
        Command::Whoami => Ok(session.identity().to_string()),
        Command::Reset => Ok(RESET_MESSAGE.to_string()),
        Command::Clear | Command::Exit => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("ls".parse::<Command>().unwrap(), Command::Ls);
        assert_eq!("whoami".parse::<Command>().unwrap(), Command::Whoami);
        assert!("LS".parse::<Command>().is_err());
        assert!("sudo".parse::<Command>().is_err());
    }

    #[test]
    fn test_names_follow_catalog_order() {
        let names: Vec<_> = Command::names().collect();
        assert_eq!(names.first(), Some(&"help"));
        assert_eq!(names.last(), Some(&"exit"));
        assert_eq!(names.len(), 16);
        for name in &names {
            assert_eq!(name.parse::<Command>().unwrap().name(), *name);
        }
    }

    #[test]
    fn test_usage_mentions_name() {
        for command in Command::iter() {
            assert!(command.usage().starts_with(command.name()));
            assert!(!command.description().is_empty());
        }
    }
}
