//! Interactive shell: command parsing, help text and execution.
//!
//! Parsing is pure so it can be tested without a server. Execution writes
//! human-readable output to any [`Write`] sink and reports server errors there
//! instead of aborting the session.

use crate::client::TicketClient;
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;
use ticket_reservation_core::{Event, EventId, TicketId};

const SEPARATOR: &str = "------------------------------------------------";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line
    Empty,
    /// `help [command]`
    Help(Option<String>),
    /// `list`
    List,
    /// `create <name> <date> <totalTickets>`
    Create {
        /// Event name
        name: String,
        /// Event date
        date: DateTime<Utc>,
        /// Capacity
        total_tickets: u32,
    },
    /// `book <id> <tickets>`
    Book {
        /// Event to book against
        event_id: EventId,
        /// Tickets wanted
        tickets: u32,
    },
    /// `auto list <requests> <delayMs>`
    AutoList {
        /// Number of list calls
        requests: u32,
        /// Pause between calls
        delay: Duration,
    },
    /// `auto book <id> <tickets> <requests> <delayMs>`
    AutoBook {
        /// Event to book against
        event_id: EventId,
        /// Tickets per request
        tickets: u32,
        /// Number of book calls
        requests: u32,
        /// Pause between calls
        delay: Duration,
    },
    /// `exit`
    Exit,
}

/// Why a line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellParseError {
    /// First word is not a command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Too many or too few arguments.
    #[error("Invalid arguments for {command}. Usage: {usage}")]
    WrongArguments {
        /// Command name
        command: &'static str,
        /// Expected form
        usage: &'static str,
    },

    /// An argument that should be a non-negative integer is not.
    #[error("Invalid {field}: {value}")]
    InvalidNumber {
        /// Argument name
        field: &'static str,
        /// Raw text
        value: String,
    },

    /// The date is not RFC 3339.
    #[error("Invalid date {0}, expected RFC 3339 such as 2025-01-01T20:00:00Z")]
    InvalidDate(String),
}

const CREATE_USAGE: &str = "create <name> <date> <totalTickets>";
const BOOK_USAGE: &str = "book <id> <tickets>";
const AUTO_LIST_USAGE: &str = "auto list <requests> <delayMs>";
const AUTO_BOOK_USAGE: &str = "auto book <id> <tickets> <requests> <delayMs>";

/// Parse one input line.
///
/// The command word is case-insensitive; arguments are whitespace separated.
///
/// # Errors
///
/// Returns a [`ShellParseError`] describing the first problem found.
pub fn parse(line: &str) -> Result<Command, ShellParseError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Command::Empty);
    };
    let args: Vec<&str> = words.collect();

    match command.to_lowercase().as_str() {
        "help" => match args.as_slice() {
            [] => Ok(Command::Help(None)),
            [topic] => Ok(Command::Help(Some(topic.to_lowercase()))),
            _ => Err(ShellParseError::WrongArguments {
                command: "help",
                usage: "help [command]",
            }),
        },
        "list" if args.is_empty() => Ok(Command::List),
        "list" => Err(ShellParseError::WrongArguments {
            command: "list",
            usage: "list",
        }),
        "exit" | "quit" => Ok(Command::Exit),
        "create" => match args.as_slice() {
            [name, date, total] => Ok(Command::Create {
                name: (*name).to_string(),
                date: parse_date(date)?,
                total_tickets: parse_number("totalTickets", total)?,
            }),
            _ => Err(ShellParseError::WrongArguments {
                command: "create",
                usage: CREATE_USAGE,
            }),
        },
        "book" => match args.as_slice() {
            [id, tickets] => Ok(Command::Book {
                event_id: EventId::from(*id),
                tickets: parse_number("tickets", tickets)?,
            }),
            _ => Err(ShellParseError::WrongArguments {
                command: "book",
                usage: BOOK_USAGE,
            }),
        },
        "auto" => parse_auto(&args),
        other => Err(ShellParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_auto(args: &[&str]) -> Result<Command, ShellParseError> {
    match args {
        [sub, requests, delay] if sub.eq_ignore_ascii_case("list") => Ok(Command::AutoList {
            requests: parse_number("requests", requests)?,
            delay: Duration::from_millis(u64::from(parse_number("delay", delay)?)),
        }),
        [sub, id, tickets, requests, delay] if sub.eq_ignore_ascii_case("book") => {
            Ok(Command::AutoBook {
                event_id: EventId::from(*id),
                tickets: parse_number("tickets", tickets)?,
                requests: parse_number("requests", requests)?,
                delay: Duration::from_millis(u64::from(parse_number("delay", delay)?)),
            })
        }
        [sub, ..] if sub.eq_ignore_ascii_case("book") => Err(ShellParseError::WrongArguments {
            command: "auto book",
            usage: AUTO_BOOK_USAGE,
        }),
        _ => Err(ShellParseError::WrongArguments {
            command: "auto list",
            usage: AUTO_LIST_USAGE,
        }),
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<u32, ShellParseError> {
    value.parse().map_err(|_| ShellParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_date(value: &str) -> Result<DateTime<Utc>, ShellParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| ShellParseError::InvalidDate(value.to_string()))
}

/// Help for every command, or for one.
#[must_use]
pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => [
            "Available commands:",
            "help [command] - Display help for a command",
            "list - List all events",
            "create <name> <date> <totalTickets> - Create a new event",
            "book <id> <tickets> - Book tickets for an event",
            "auto - Run a command automatically multiple times",
            "exit - Exit the program",
        ]
        .join("\n"),
        Some("help") => "help [command] - Display help for a command\nExample: help list".into(),
        Some("list") => "list - List all events\nExample: list".into(),
        Some("create") => [
            "create <name> <date> <totalTickets> - Create a new event",
            "name - Name of the event (one word)",
            "date - Date of the event in RFC 3339 format",
            "totalTickets - Total number of tickets available for the event",
            "Example: create Concert 2025-07-01T20:00:00Z 100",
        ]
        .join("\n"),
        Some("book") => [
            "book <id> <tickets> - Book tickets for an event",
            "id - ID of the event",
            "tickets - Number of tickets to book",
            "Example: book 7c0e5a2b-... 5",
        ]
        .join("\n"),
        Some("auto") => [
            "auto list <requests> <delayMs> - List events repeatedly",
            "auto book <id> <tickets> <requests> <delayMs> - Book tickets repeatedly",
            "requests - Number of requests to make",
            "delayMs - Delay between requests in milliseconds",
            "Example: auto list 5 1000",
        ]
        .join("\n"),
        Some("exit") => "exit - Exit the program\nExample: exit".into(),
        Some(other) => format!("Unknown command: {other}"),
    }
}

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Stop the session
    Exit,
}

/// Run `command` against the server, writing results to `out`.
///
/// Server and transport errors are written to `out` as well.
///
/// # Errors
///
/// Only fails if writing to `out` fails.
pub async fn execute<W: Write>(
    client: &TicketClient,
    command: Command,
    out: &mut W,
) -> io::Result<Flow> {
    match command {
        Command::Empty => {}
        Command::Exit => {
            writeln!(out, "Exiting...")?;
            return Ok(Flow::Exit);
        }
        Command::Help(topic) => writeln!(out, "{}", help_text(topic.as_deref()))?,
        Command::List => list_once(client, out).await?,
        Command::Create {
            name,
            date,
            total_tickets,
        } => match client.create_event(&name, date, total_tickets).await {
            Ok(event) => {
                writeln!(out, "{SEPARATOR}")?;
                write_event(out, &event)?;
                writeln!(out, "{SEPARATOR}")?;
            }
            Err(error) => writeln!(out, "Error: {error}")?,
        },
        Command::Book { event_id, tickets } => book_once(client, &event_id, tickets, out).await?,
        Command::AutoList { requests, delay } => {
            for i in 0..requests {
                list_once(client, out).await?;
                if i + 1 < requests {
                    tokio::time::sleep(delay).await;
                }
            }
        }
        Command::AutoBook {
            event_id,
            tickets,
            requests,
            delay,
        } => {
            for i in 0..requests {
                book_once(client, &event_id, tickets, out).await?;
                if i + 1 < requests {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Ok(Flow::Continue)
}

async fn list_once<W: Write>(client: &TicketClient, out: &mut W) -> io::Result<()> {
    match client.list_events().await {
        Ok(events) => {
            for event in &events {
                writeln!(out, "{SEPARATOR}")?;
                write_event(out, event)?;
            }
            writeln!(out, "{SEPARATOR}")
        }
        Err(error) => writeln!(out, "Error: {error}"),
    }
}

async fn book_once<W: Write>(
    client: &TicketClient,
    event_id: &EventId,
    tickets: u32,
    out: &mut W,
) -> io::Result<()> {
    match client.book_tickets(event_id, tickets).await {
        Ok(ids) => write_tickets(out, &ids),
        Err(error) => writeln!(out, "Error: {error}"),
    }
}

/// Print one event in the shell's block format.
///
/// # Errors
///
/// Fails if writing to `out` fails.
pub fn write_event<W: Write>(out: &mut W, event: &Event) -> io::Result<()> {
    writeln!(out, "ID: {}", event.id())?;
    writeln!(out, "Name: {}", event.name())?;
    writeln!(out, "Date: {}", event.date().to_rfc3339())?;
    writeln!(out, "Total Tickets: {}", event.total_tickets())?;
    writeln!(out, "Available Tickets: {}", event.available_tickets())
}

fn write_tickets<W: Write>(out: &mut W, tickets: &[TicketId]) -> io::Result<()> {
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "Ticket IDs:")?;
    for ticket in tickets {
        writeln!(out, "{ticket}")?;
    }
    writeln!(out, "{SEPARATOR}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_blank_line_is_empty() {
        assert_eq!(parse("   ").unwrap(), Command::Empty);
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert_eq!(parse("LIST").unwrap(), Command::List);
        assert_eq!(parse("Help Book").unwrap(), Command::Help(Some("book".into())));
    }

    #[test]
    fn test_create() {
        assert_eq!(
            parse("create Concert 2025-07-01T20:00:00Z 100").unwrap(),
            Command::Create {
                name: "Concert".into(),
                date: Utc.with_ymd_and_hms(2025, 7, 1, 20, 0, 0).unwrap(),
                total_tickets: 100,
            }
        );
    }

    #[test]
    fn test_create_rejects_bad_values() {
        assert_eq!(
            parse("create Concert tomorrow 100").unwrap_err(),
            ShellParseError::InvalidDate("tomorrow".into())
        );
        assert!(matches!(
            parse("create Concert 2025-07-01T20:00:00Z -1").unwrap_err(),
            ShellParseError::InvalidNumber { field: "totalTickets", .. }
        ));
        assert!(matches!(
            parse("create Concert").unwrap_err(),
            ShellParseError::WrongArguments { command: "create", .. }
        ));
    }

    #[test]
    fn test_book_and_auto_book() {
        assert_eq!(
            parse("book abc 3").unwrap(),
            Command::Book {
                event_id: EventId::from("abc"),
                tickets: 3
            }
        );
        assert_eq!(
            parse("auto book abc 1 10 250").unwrap(),
            Command::AutoBook {
                event_id: EventId::from("abc"),
                tickets: 1,
                requests: 10,
                delay: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn test_auto_list_arity() {
        assert_eq!(
            parse("auto list 5 1000").unwrap(),
            Command::AutoList {
                requests: 5,
                delay: Duration::from_secs(1)
            }
        );
        assert!(matches!(
            parse("auto list 5").unwrap_err(),
            ShellParseError::WrongArguments { command: "auto list", .. }
        ));
        assert!(matches!(
            parse("auto").unwrap_err(),
            ShellParseError::WrongArguments { .. }
        ));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse("refund abc").unwrap_err(),
            ShellParseError::UnknownCommand("refund".into())
        );
    }

    #[test]
    fn test_help_topics() {
        assert!(help_text(None).starts_with("Available commands:"));
        assert!(help_text(Some("auto")).contains("auto book"));
        assert_eq!(help_text(Some("nope")), "Unknown command: nope");
    }
}
