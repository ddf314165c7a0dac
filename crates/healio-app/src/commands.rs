//! Parsing of terminal input lines into chat commands.
//!
//! Plain text is a message; lines starting with `/` are commands. Indices
//! typed by the user are 1-based and converted to 0-based here.

use healio_chat::ConfirmChoice;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Save,
    New,
    Sidebar,
    List,
    Open(usize),
    Remove(usize),
    Answer(ConfirmChoice),
    Speak(usize),
    Help,
    Quit,
    Empty,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("/{0} needs a number")]
    MissingIndex(&'static str),
    #[error("not a valid number: {0}")]
    InvalidIndex(String),
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Send(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next();

    match name.as_str() {
        "save" => Ok(Command::Save),
        "new" => Ok(Command::New),
        "sidebar" => Ok(Command::Sidebar),
        "list" | "ls" => Ok(Command::List),
        "open" => index_arg("open", arg).map(Command::Open),
        "remove" | "rm" => index_arg("remove", arg).map(Command::Remove),
        "yes" => Ok(Command::Answer(ConfirmChoice::Remove)),
        "no" => Ok(Command::Answer(ConfirmChoice::Cancel)),
        "speak" => index_arg("speak", arg).map(Command::Speak),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn index_arg(command: &'static str, arg: Option<&str>) -> Result<usize, CommandError> {
    let raw = arg.ok_or(CommandError::MissingIndex(command))?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidIndex(raw.to_string())),
    }
}

pub const HELP_TEXT: &str = "\
Type a message and press Enter to send it.

  /save         save this chat to the sidebar
  /new          start a new chat
  /sidebar      open or close the saved-chat sidebar
  /list         list saved chats
  /open N       open saved chat N
  /remove N     remove saved chat N
  /yes, /no     answer a removal prompt
  /speak N      read message N aloud, or stop reading
  /help         show this help
  /quit         exit";
