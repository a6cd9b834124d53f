use crawldash_core::{DocumentId, JobId, Msg, DEFAULT_FORMATS, DEFAULT_LIMIT};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  create <url> [limit] [formats]   start a crawl (defaults: limit 25, formats markdown,html)
  open <job-id>                    show a job and its documents
  doc <doc-id>                     preview a document of the open job
  search [query]                   filter documents; no query clears the filter
  back                             return to the job list
  refresh                          reload the job list
  dismiss                          clear the last message
  help                             show this text
  quit                             exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    Redraw,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}; type `help`")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "" => Command::Redraw,
        "create" => {
            let mut args = rest.split_whitespace();
            let url = args.next().ok_or(CommandError::MissingArgument {
                command: "create",
                argument: "a url",
            })?;
            // Unparseable limits fall back to the default, like the web form.
            let limit = args
                .next()
                .and_then(|raw| raw.parse::<u32>().ok())
                .unwrap_or(DEFAULT_LIMIT);
            let formats = args.next().unwrap_or(DEFAULT_FORMATS);
            Command::Dispatch(Msg::CreateJobSubmitted {
                url: url.to_string(),
                limit,
                formats: formats.to_string(),
            })
        }
        "open" => Command::Dispatch(Msg::JobSelected(JobId::new(required(
            rest, "open", "a job id",
        )?))),
        "doc" => Command::Dispatch(Msg::DocumentSelected(DocumentId::new(required(
            rest,
            "doc",
            "a document id",
        )?))),
        "search" => Command::Dispatch(Msg::SearchChanged(rest.to_string())),
        "back" => Command::Dispatch(Msg::BackClicked),
        "refresh" => Command::Dispatch(Msg::RefreshClicked),
        "dismiss" => Command::Dispatch(Msg::DismissNotice),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}
