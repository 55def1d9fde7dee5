//! Line commands understood by the prompt.

use chrono::{Local, NaiveDate};
use ledger::{Draft, Filter, Kind, LedgerError, Money, SortSpec, parse_date};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Add(Draft),
    Remove(u64),
    Kind(Filter<Kind>),
    Category(Filter<String>),
    Sort(SortSpec),
    List,
    Stats { json: bool },
    Categories,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command \"{0}\", type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Invalid(#[from] LedgerError),
}

pub(crate) const HELP: &str = "\
commands:
  add <income|expense> <category> <amount> <YYYY-MM-DD|today> <description...>
  rm <id>
  kind <income|expense|all>
  category <name|all>
  sort <field>-<asc|desc>   fields: date, amount, category, kind, description, id
  list | stats [json] | categories | help | quit
quote multi-word categories: add income \"Other Income\" 20 today gift";

const ADD_USAGE: &str = "add <income|expense> <category> <amount> <date> <description...>";

/// Splits on whitespace, keeping `"double quoted"` runs together.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        tokens.push(current);
    }
    tokens
}

fn parse_day(value: &str, today: NaiveDate) -> Result<NaiveDate, LedgerError> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    parse_date(value)
}

pub(crate) fn parse_command(input: &str) -> Result<Command, ParseError> {
    parse_command_at(input, Local::now().date_naive())
}

/// Parses one prompt line; `today` resolves the `today` date keyword.
pub(crate) fn parse_command_at(input: &str, today: NaiveDate) -> Result<Command, ParseError> {
    let tokens = tokenize(input.trim());
    let Some((name, args)) = tokens.split_first() else {
        return Err(ParseError::Empty);
    };

    let single = |usage: &'static str| match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(ParseError::Usage(usage)),
    };

    match name.to_ascii_lowercase().as_str() {
        "add" => {
            let [kind, category, amount, date, description @ ..] = args else {
                return Err(ParseError::Usage(ADD_USAGE));
            };
            if description.is_empty() {
                return Err(ParseError::Usage(ADD_USAGE));
            }
            Ok(Command::Add(Draft::new(
                kind.parse()?,
                category.as_str(),
                amount.parse::<Money>()?,
                description.join(" "),
                parse_day(date, today)?,
            )))
        }
        "rm" | "remove" | "delete" => {
            let id = single("rm <id>")?;
            id.parse()
                .map(Command::Remove)
                .map_err(|_| ParseError::Usage("rm <id>"))
        }
        "kind" | "type" => Ok(Command::Kind(single("kind <income|expense|all>")?.parse()?)),
        "category" => Ok(Command::Category(single("category <name|all>")?.parse()?)),
        "sort" => Ok(Command::Sort(single("sort <field>-<asc|desc>")?.parse()?)),
        "list" | "ls" => Ok(Command::List),
        "stats" => match args {
            [] => Ok(Command::Stats { json: false }),
            [format] if format.eq_ignore_ascii_case("json") => Ok(Command::Stats { json: true }),
            _ => Err(ParseError::Usage("stats [json]")),
        },
        "categories" => Ok(Command::Categories),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
