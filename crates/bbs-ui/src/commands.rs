//! Line commands for interactive browsing.
//!
//! `parse` turns one input line into a `UiEvent`. Commands that act on the
//! open thread read the current page from the state.

use std::fmt;

use bbs_core::forms::{LoginForm, PostEdit, RegisterForm, ReplyDraft, ThreadDraft};
use bbs_core::query::SortBy;

use crate::events::{NavEvent, SearchEvent, SubmitEvent, UiEvent};
use crate::state::{AppState, Page};

/// Definition of a command.
#[derive(Debug, Clone)]
pub struct Command {
    /// Primary name (e.g., "threads").
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Argument synopsis shown in help.
    pub usage: &'static str,
    pub description: &'static str,
}

impl Command {
    /// Exact, case-insensitive match against the name and aliases.
    pub fn matches(&self, word: &str) -> bool {
        self.name.eq_ignore_ascii_case(word)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(word))
    }

    /// Returns the display name with aliases, e.g., "quit (exit, q)".
    pub fn display_name(&self) -> String {
        if self.aliases.is_empty() {
            self.name.to_string()
        } else {
            format!("{} ({})", self.name, self.aliases.join(", "))
        }
    }
}

pub const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        aliases: &["?"],
        usage: "",
        description: "Show this list",
    },
    Command {
        name: "home",
        aliases: &[],
        usage: "",
        description: "Go to the home page",
    },
    Command {
        name: "threads",
        aliases: &["ls"],
        usage: "",
        description: "List all threads",
    },
    Command {
        name: "open",
        aliases: &["show"],
        usage: "<thread-id>",
        description: "Open a thread",
    },
    Command {
        name: "back",
        aliases: &[],
        usage: "",
        description: "Back to the thread list",
    },
    Command {
        name: "category",
        aliases: &["cat"],
        usage: "<slug>",
        description: "Threads in a category",
    },
    Command {
        name: "profile",
        aliases: &["user"],
        usage: "[user-id]",
        description: "Show a profile (your own without an id)",
    },
    Command {
        name: "search",
        aliases: &["/"],
        usage: "[query]",
        description: "Search threads, or open the search page",
    },
    Command {
        name: "filter",
        aliases: &[],
        usage: "category <id|all> | sort <latest|oldest|popular|replies> | clear",
        description: "Change search filters",
    },
    Command {
        name: "login",
        aliases: &[],
        usage: "[email password [--remember]]",
        description: "Sign in, or open the login page",
    },
    Command {
        name: "register",
        aliases: &["signup"],
        usage: "[name email password confirmation]",
        description: "Create an account, or open the register page",
    },
    Command {
        name: "logout",
        aliases: &[],
        usage: "",
        description: "Sign out",
    },
    Command {
        name: "new",
        aliases: &[],
        usage: "[category-id title | body [| image]...]",
        description: "Create a thread, or open the form",
    },
    Command {
        name: "reply",
        aliases: &[],
        usage: "<text>",
        description: "Reply to the open thread",
    },
    Command {
        name: "reply-to",
        aliases: &[],
        usage: "<post-id> <text>",
        description: "Reply to a post in the open thread",
    },
    Command {
        name: "edit",
        aliases: &[],
        usage: "<post-id> <text>",
        description: "Edit one of your posts",
    },
    Command {
        name: "delete",
        aliases: &["rm"],
        usage: "<post-id>",
        description: "Delete one of your posts",
    },
    Command {
        name: "dismiss",
        aliases: &[],
        usage: "",
        description: "Clear the current notice",
    },
    Command {
        name: "quit",
        aliases: &["exit", "q"],
        usage: "",
        description: "Leave",
    },
];

/// Help text listing every command.
pub fn help() -> String {
    COMMANDS
        .iter()
        .map(|c| {
            let head = if c.usage.is_empty() {
                c.display_name()
            } else {
                format!("{} {}", c.display_name(), c.usage)
            };
            format!("  {head:<48} {}", c.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone)]
pub enum Parsed {
    Event(UiEvent),
    Help,
    /// Blank line.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

fn err<T>(msg: impl Into<String>) -> Result<T, ParseError> {
    Err(ParseError(msg.into()))
}

fn id_arg(value: Option<&str>, what: &str) -> Result<u64, ParseError> {
    let Some(value) = value else {
        return err(format!("Missing {what}"));
    };
    value
        .parse()
        .map_err(|e| ParseError(format!("Invalid {what} '{value}': {e}")))
}

fn open_thread(state: &AppState) -> Result<u64, ParseError> {
    match state.page {
        Page::ThreadDetail { thread_id } => Ok(thread_id),
        _ => err("Open a thread first"),
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    }
}

pub fn parse(line: &str, state: &AppState) -> Result<Parsed, ParseError> {
    let (word, rest) = split_word(line.trim());
    if word.is_empty() {
        return Ok(Parsed::Nothing);
    }
    let Some(command) = COMMANDS.iter().find(|c| c.matches(word)) else {
        return err(format!("Unknown command '{word}' (try 'help')"));
    };

    let event = match command.name {
        "help" => return Ok(Parsed::Help),
        "home" => UiEvent::Nav(NavEvent::Home),
        "threads" => UiEvent::Nav(NavEvent::Threads),
        "open" => UiEvent::Nav(NavEvent::OpenThread(id_arg(
            rest.split_whitespace().next(),
            "thread id",
        )?)),
        "back" => UiEvent::Nav(NavEvent::Back),
        "category" => {
            if rest.is_empty() {
                return err("Missing category slug");
            }
            UiEvent::Nav(NavEvent::OpenCategory(rest.to_string()))
        }
        "profile" => {
            let user_id = match rest.split_whitespace().next() {
                Some(id) => Some(id_arg(Some(id), "user id")?),
                None => None,
            };
            UiEvent::Nav(NavEvent::OpenProfile(user_id))
        }
        "search" => {
            if rest.is_empty() {
                UiEvent::Nav(NavEvent::OpenSearch)
            } else {
                UiEvent::Search(SearchEvent::Header(rest.to_string()))
            }
        }
        "filter" => parse_filter(rest)?,
        "login" => parse_login(rest)?,
        "register" => parse_register(rest)?,
        "logout" => UiEvent::Nav(NavEvent::Logout),
        "new" => parse_new(rest)?,
        "reply" => UiEvent::Submit(SubmitEvent::Reply(ReplyDraft {
            thread_id: open_thread(state)?,
            content: rest.to_string(),
            reply_to: None,
        })),
        "reply-to" => {
            let thread_id = open_thread(state)?;
            let (post, content) = split_word(rest);
            UiEvent::Submit(SubmitEvent::Reply(ReplyDraft {
                thread_id,
                content: content.to_string(),
                reply_to: Some(id_arg(Some(post).filter(|p| !p.is_empty()), "post id")?),
            }))
        }
        "edit" => {
            let (post, content) = split_word(rest);
            UiEvent::Submit(SubmitEvent::Edit(PostEdit {
                post_id: id_arg(Some(post).filter(|p| !p.is_empty()), "post id")?,
                content: content.to_string(),
            }))
        }
        "delete" => UiEvent::Submit(SubmitEvent::Delete(id_arg(
            rest.split_whitespace().next(),
            "post id",
        )?)),
        "dismiss" => UiEvent::DismissNotice,
        "quit" => UiEvent::Quit,
        other => return err(format!("Command '{other}' is not available here")),
    };
    Ok(Parsed::Event(event))
}

fn parse_filter(rest: &str) -> Result<UiEvent, ParseError> {
    let mut args = rest.split_whitespace();
    match args.next() {
        Some("category") => match args.next() {
            Some("all") => Ok(UiEvent::Search(SearchEvent::SetCategory(None))),
            value => Ok(UiEvent::Search(SearchEvent::SetCategory(Some(id_arg(
                value,
                "category id",
            )?)))),
        },
        Some("sort") => {
            let Some(mode) = args.next() else {
                return err("Missing sort mode");
            };
            let sort_by: SortBy = mode
                .to_ascii_lowercase()
                .parse()
                .map_err(|e| ParseError(format!("{e}")))?;
            Ok(UiEvent::Search(SearchEvent::SetSort(sort_by)))
        }
        Some("clear") => Ok(UiEvent::Search(SearchEvent::ClearFilters)),
        _ => err("Usage: filter category <id|all> | sort <mode> | clear"),
    }
}

fn parse_login(rest: &str) -> Result<UiEvent, ParseError> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    match args.as_slice() {
        [] => Ok(UiEvent::Nav(NavEvent::Login)),
        [email, password] | [email, password, "--remember"] => {
            Ok(UiEvent::Submit(SubmitEvent::Login(LoginForm {
                email: (*email).to_string(),
                password: (*password).to_string(),
                remember: args.len() == 3,
            })))
        }
        _ => err("Usage: login <email> <password> [--remember]"),
    }
}

fn parse_register(rest: &str) -> Result<UiEvent, ParseError> {
    let args: Vec<&str> = rest.split_whitespace().collect();
    match args.as_slice() {
        [] => Ok(UiEvent::Nav(NavEvent::Register)),
        [name, email, password, confirmation] => {
            Ok(UiEvent::Submit(SubmitEvent::Register(RegisterForm {
                name: (*name).to_string(),
                email: (*email).to_string(),
                password: (*password).to_string(),
                password_confirmation: (*confirmation).to_string(),
            })))
        }
        _ => err("Usage: register <name> <email> <password> <confirmation>"),
    }
}

fn parse_new(rest: &str) -> Result<UiEvent, ParseError> {
    if rest.is_empty() {
        return Ok(UiEvent::Nav(NavEvent::CreateThread));
    }
    let mut parts = rest.split('|').map(str::trim);
    let head = parts.next().unwrap_or_default();
    let (category, title) = split_word(head);
    let Some(body) = parts.next() else {
        return err("Usage: new <category-id> <title> | <body> [| <image>]...");
    };
    Ok(UiEvent::Submit(SubmitEvent::CreateThread(ThreadDraft {
        title: title.to_string(),
        body: body.to_string(),
        category_id: id_arg(Some(category), "category id")?,
        images: parts.filter(|p| !p.is_empty()).map(String::from).collect(),
    })))
}
