//! Commands that never touch the tree: `date` and `help`.

use std::fmt::Write;

use chrono::Utc;
use strum::IntoEnumIterator;

use super::Command;
use super::error::{CommandResult, ShellError};

/// Format used by `date` without arguments.
const DEFAULT_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Output of `date --help`.
pub const DATE_HELP: &str = "Usage: date [FORMAT]\n\n\
Display the current date and time.\n\n\
FORMAT controls the output. Some common format specifiers:\n  \
%a  Abbreviated weekday name (e.g., 'Mon')\n  \
%b  Abbreviated month name (e.g., 'Jan')\n  \
%d  Day of the month (01 to 31)\n  \
%H  Hour (00 to 23)\n  \
%M  Minute (00 to 59)\n  \
%S  Second (00 to 60)\n  \
%Y  Year with century (e.g., 2024)\n\n\
Example: date '%Y-%m-%d %H:%M:%S'";

/// `date [FORMAT|--help|-h]`, in UTC.
pub(super) fn date(args: &str) -> CommandResult {
    let format = match args.trim() {
        "" => DEFAULT_DATE_FORMAT,
        "--help" | "-h" => return Ok(DATE_HELP.to_string()),
        format => format,
    };

    // DelayedFormat reports bad specifiers through fmt::Error; to_string() would panic.
    let mut out = String::new();
    write!(out, "{}", Utc::now().format(format)).map_err(|_| ShellError::InvalidDateFormat)?;
    Ok(out)
}

/// `help`: one line per command, in catalog order.
pub(super) fn help() -> String {
    let mut out = String::from("Available commands:");
    for command in Command::iter() {
        out.push_str(&format!("\n  {}: {}", command.usage(), command.description()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_default_format() {
        let out = date("").unwrap();
        // e.g. "Mon Jan 05 13:04:05 UTC 2026"
        let fields: Vec<_> = out.split(' ').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[4], "UTC");
        assert_eq!(fields[5].len(), 4);
    }

    #[test]
    fn test_date_custom_format() {
        let out = date("%Y-%m-%d").unwrap();
        assert_eq!(out.len(), 10);
        assert_eq!(out.matches('-').count(), 2);
        assert_eq!(date("year %Y").unwrap().len(), 9);
    }

    #[test]
    fn test_date_help() {
        assert_eq!(date("--help").unwrap(), DATE_HELP);
        assert_eq!(date(" -h ").unwrap(), DATE_HELP);
        assert!(DATE_HELP.starts_with("Usage: date [FORMAT]"));
        assert!(DATE_HELP.ends_with("Example: date '%Y-%m-%d %H:%M:%S'"));
    }

    #[test]
    fn test_date_invalid_format() {
        assert_eq!(date("%Q").unwrap_err(), ShellError::InvalidDateFormat);
        assert_eq!(date("%").unwrap_err().to_string(), "Invalid date format.");
    }

    #[test]
    fn test_help_lists_every_command() {
        let out = help();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Available commands:"));
        assert_eq!(lines.next(), Some("  help: Show this help message"));
        assert!(out.contains("\n  nano [file]: Edit a file (write content)"));
        assert_eq!(lines.count(), Command::iter().count() - 1);
    }
}
