use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use thiserror::Error;
use todo_list::{Priority, TaskId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unterminated quote in input")]
    UnterminatedQuote,
    #[error("{0}")]
    Invalid(String),
}

#[derive(Parser, Debug, PartialEq)]
#[command(
    name = "task",
    no_binary_name = true,
    disable_help_subcommand = true,
    help_template = "Commands:\n{subcommands}"
)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// One line of user input in a session.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Add a new task
    Add {
        /// Title words, joined with single spaces. Put `--` before a title
        /// that starts with '-'
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Due date as YYYY-MM-DD
        #[arg(long, conflicts_with = "no_due")]
        due: Option<NaiveDate>,
        /// Leave the task without a due date
        #[arg(long)]
        no_due: bool,
        /// high, medium or low
        #[arg(short, long)]
        priority: Option<Priority>,
    },
    /// Mark an active task as completed
    #[command(visible_alias = "done")]
    Complete { id: TaskId },
    /// Delete a task; --active/--completed restrict the search to one list
    Delete {
        id: TaskId,
        #[arg(long, conflicts_with = "active")]
        completed: bool,
        #[arg(long)]
        active: bool,
    },
    /// Show one task in full
    Show { id: TaskId },
    /// Show active and completed tasks with the progress summary
    #[command(visible_alias = "ls")]
    List,
    /// Show the progress summary
    Stats,
    /// Print every task and the summary as JSON
    Export,
    /// Show this help
    Help,
    /// End the session
    #[command(visible_alias = "exit")]
    Quit,
}

impl Command {
    /// Parses a line of input. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let words = split_words(line)?;
        if words.is_empty() {
            return Ok(None);
        }

        Line::try_parse_from(words)
            .map(|line| Some(line.command))
            .map_err(|e| CommandError::Invalid(e.render().to_string().trim_end().to_string()))
    }

    pub fn help() -> String {
        Line::command().render_help().to_string()
    }
}

/// Splits a line on whitespace. Double quotes group words and `\"` is a
/// literal quote.
fn split_words(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
                in_word = true;
            }
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
