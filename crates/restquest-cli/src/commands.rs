//! Parsing of learner commands typed at the prompt.

use restquest_core::{FormKind, Mode, QuestError, Result};

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  help                                   Show this help
  show                                   Redraw the current screen
  mode beginner|advanced                 Choose a difficulty mode (quest only)
  start                                  Leave the welcome screen
  next | prev                            Move between levels
  reset                                  Start over (keeps the mode)
  get                                    GET /books
  get <id>                               GET /books/{id}
  post title=.. author=.. year=..        POST /books
  put id=.. title=.. [author=..] [year=..]
  patch id=.. [title=..] [author=..] [year=..]
  delete <id>                            DELETE /books/{id}
  drafts                                 Show what is typed into each form
  refresh                                Re-fetch the book table
  quit                                   Exit

Values containing spaces can be quoted: post title=\"The Left Hand of Darkness\"";

/// A parsed learner command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `help`
    Help,
    /// `show`
    Show,
    /// `mode <m>`
    Mode(Mode),
    /// `start`
    Start,
    /// `next`
    Next,
    /// `prev`
    Prev,
    /// `reset`
    Reset,
    /// Fill a form with `key=value` pairs, then submit it.
    Submit {
        /// Form to submit.
        form: FormKind,
        /// Fields to type before submitting.
        fields: Vec<(String, String)>,
    },
    /// `drafts`
    Drafts,
    /// `refresh`
    Refresh,
    /// `quit`
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::UnknownCommand`] for unknown verbs and
    /// [`QuestError::InvalidArguments`] for malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let tokens = tokenize(line)?;
        let Some((verb, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match verb.to_lowercase().as_str() {
            "help" | "?" => no_args("help", args, Self::Help)?,
            "show" => no_args("show", args, Self::Show)?,
            "start" => no_args("start", args, Self::Start)?,
            "next" => no_args("next", args, Self::Next)?,
            "prev" | "back" => no_args("prev", args, Self::Prev)?,
            "reset" => no_args("reset", args, Self::Reset)?,
            "drafts" => no_args("drafts", args, Self::Drafts)?,
            "refresh" => no_args("refresh", args, Self::Refresh)?,
            "quit" | "exit" => no_args("quit", args, Self::Quit)?,
            "mode" => Self::Mode(parse_mode(args)?),
            "get" => match args {
                [] => Self::Submit {
                    form: FormKind::GetAll,
                    fields: Vec::new(),
                },
                [id] => id_submit(FormKind::GetById, id),
                _ => return Err(QuestError::invalid_arguments("get", "expected at most one id")),
            },
            "delete" => match args {
                [id] => id_submit(FormKind::Delete, id),
                _ => return Err(QuestError::invalid_arguments("delete", "expected exactly one id")),
            },
            "post" => Self::Submit {
                form: FormKind::Create,
                fields: parse_fields("post", args)?,
            },
            "put" => Self::Submit {
                form: FormKind::Update,
                fields: parse_fields("put", args)?,
            },
            "patch" => Self::Submit {
                form: FormKind::Patch,
                fields: parse_fields("patch", args)?,
            },
            _ => return Err(QuestError::unknown_command(line.trim())),
        };
        Ok(Some(command))
    }
}

fn no_args(name: &str, args: &[String], command: Command) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(QuestError::invalid_arguments(name, "takes no arguments"))
    }
}

fn parse_mode(args: &[String]) -> Result<Mode> {
    match args {
        [mode] => Mode::from_str_case_insensitive(mode).ok_or_else(|| {
            QuestError::invalid_arguments("mode", format!("unknown mode '{mode}' (expected beginner or advanced)"))
        }),
        _ => Err(QuestError::invalid_arguments("mode", "expected beginner or advanced")),
    }
}

fn id_submit(form: FormKind, id: &str) -> Command {
    Command::Submit {
        form,
        fields: vec![("id".to_string(), id.to_string())],
    }
}

fn parse_fields(command: &str, args: &[String]) -> Result<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                QuestError::invalid_arguments(command, format!("expected key=value, got '{arg}'"))
            })?;
            if key.is_empty() {
                return Err(QuestError::invalid_arguments(command, format!("missing field name in '{arg}'")));
            }
            Ok((key.to_lowercase(), value.to_string()))
        })
        .collect()
}

/// Splits a line on whitespace, honouring double quotes and `\"` escapes.
fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '\\' if quoted => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(QuestError::invalid_arguments(
            line.split_whitespace().next().unwrap_or_default(),
            "unterminated quote",
        ));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
