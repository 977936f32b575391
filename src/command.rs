use crate::model::*;

/// One line of driver input.
#[derive(Debug, PartialEq)]
pub enum Command {
    PointerDown { day: Day },
    PointerEnter { day: Day },
    PointerUp,
    Reset,
    Restore { days: Vec<Day> },
    Validate,
    Price { selected_day_count: usize },
    Status,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let trimmed = line.trim();
    let mut parts = trimmed.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err(CommandError::Empty);
    };
    let args: Vec<&str> = parts.collect();

    match verb.to_lowercase().as_str() {
        "down" => Ok(Command::PointerDown { day: one_day("down", &args)? }),
        "enter" => Ok(Command::PointerEnter { day: one_day("enter", &args)? }),
        "up" => no_args("up", &args, Command::PointerUp),
        "reset" => no_args("reset", &args, Command::Reset),
        "validate" => no_args("validate", &args, Command::Validate),
        "status" => no_args("status", &args, Command::Status),
        "quit" | "exit" => no_args("quit", &args, Command::Quit),
        "select" => {
            // Accept both "select 5,6,0" and "select 5 6 0".
            let days = args
                .iter()
                .flat_map(|a| a.split(','))
                .filter(|s| !s.is_empty())
                .map(parse_day)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Command::Restore { days })
        }
        "price" => {
            if args.len() != 1 {
                return Err(CommandError::WrongArity("price", 1, args.len()));
            }
            let selected_day_count = args[0]
                .parse()
                .map_err(|_| CommandError::Parse(format!("bad day count {:?}", args[0])))?;
            Ok(Command::Price { selected_day_count })
        }
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

// ── Helpers ───────────────────────────────────────────────────

fn one_day(verb: &'static str, args: &[&str]) -> Result<Day, CommandError> {
    if args.len() != 1 {
        return Err(CommandError::WrongArity(verb, 1, args.len()));
    }
    parse_day(args[0])
}

fn no_args(verb: &'static str, args: &[&str], cmd: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(cmd)
    } else {
        Err(CommandError::WrongArity(verb, 0, args.len()))
    }
}

/// A day index (`0`..`6`) or a day name, full or three-letter.
fn parse_day(raw: &str) -> Result<Day, CommandError> {
    let raw = raw.trim();
    if let Ok(index) = raw.parse::<u8>() {
        return Day::new(index).map_err(|e| CommandError::Parse(e.to_string()));
    }
    let lower = raw.to_lowercase();
    Day::all()
        .find(|d| d.name().to_lowercase() == lower || d.short_name().to_lowercase() == lower)
        .ok_or_else(|| CommandError::Parse(format!("unknown day {raw:?}")))
}

#[derive(Debug, PartialEq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    Parse(String),
    WrongArity(&'static str, usize, usize),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(v) => write!(f, "unknown command: {v}"),
            CommandError::Parse(s) => write!(f, "parse error: {s}"),
            CommandError::WrongArity(verb, expected, got) => {
                write!(f, "{verb}: expected {expected} arguments, got {got}")
            }
        }
    }
}

impl std::error::Error for CommandError {}
