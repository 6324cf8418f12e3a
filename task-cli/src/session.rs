use crate::command::Command;
use crate::config::Settings;
use crate::render;
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use std::io::{BufRead, Write};
use todo_list::{Bucket, NewTask, Priority, Stats, Task, TaskId, TaskStore};

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// JSON form of the whole session, produced by `export`.
#[derive(Serialize)]
struct Snapshot<'a> {
    active: Vec<&'a Task>,
    completed: Vec<&'a Task>,
    stats: Stats,
}

/// One interactive session: owns the store and writes every view to `out`.
pub struct Session<W> {
    store: TaskStore,
    settings: Settings,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(settings: Settings, out: W) -> Self {
        Self {
            store: TaskStore::new(),
            settings,
            out,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Reads commands line by line until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> anyhow::Result<()> {
        render::board(&mut self.out, &self.store)?;
        self.prompt()?;

        for line in input.lines() {
            let line = line?;
            let flow = match Command::parse(&line) {
                Ok(Some(command)) => self.execute(command)?,
                Ok(None) => Flow::Continue,
                Err(e) => {
                    tracing::debug!(error = %e, "could not parse input");
                    writeln!(self.out, "{e}")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
            self.prompt()?;
        }

        tracing::info!(tasks = self.store.len(), "session ended");
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        tracing::debug!(?command, "executing command");
        match command {
            Command::Add {
                title,
                description,
                due,
                no_due,
                priority,
            } => {
                let priority = priority.unwrap_or(self.settings.default_priority);
                self.add(title.join(" "), description, due, no_due, priority)?;
            }
            Command::Complete { id } => match self.store.complete_task(id) {
                Ok(()) => {
                    tracing::info!(id, "task completed");
                    writeln!(self.out, "Completed task #{id}")?;
                    self.board()?;
                }
                Err(e) => writeln!(self.out, "{e}")?,
            },
            Command::Delete {
                id,
                completed,
                active,
            } => self.delete(id, completed, active)?,
            Command::Show { id } => match self.store.get(id) {
                Some(task) => render::detail(&mut self.out, task)?,
                None => writeln!(self.out, "No task with id {id}")?,
            },
            Command::List => self.board()?,
            Command::Stats => render::summary(&mut self.out, &self.store.stats())?,
            Command::Export => self.export()?,
            Command::Help => write!(self.out, "{}", Command::help())?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn add(
        &mut self,
        title: String,
        description: Option<String>,
        due: Option<NaiveDate>,
        no_due: bool,
        priority: Priority,
    ) -> anyhow::Result<()> {
        let today = Local::now().date_naive();
        let due = match (due, no_due) {
            (_, true) => None,
            (Some(due), false) => Some(due),
            (None, false) => {
                let days = Days::new(self.settings.default_due_in_days.into());
                match today.checked_add_days(days) {
                    Some(due) => Some(due),
                    None => {
                        writeln!(
                            self.out,
                            "Default due date is out of range; pass --due or --no-due"
                        )?;
                        return Ok(());
                    }
                }
            }
        };
        if due.is_some_and(|due| due < today) {
            writeln!(self.out, "Due date cannot be in the past")?;
            return Ok(());
        }

        let mut input = NewTask::new(title).priority(priority);
        input.description = description;
        input.due_date = due;

        match self.store.add_task(input) {
            Ok(id) => {
                tracing::info!(id, "task added");
                writeln!(self.out, "Added task #{id}")?;
                self.board()?;
            }
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(())
    }

    fn delete(&mut self, id: TaskId, completed: bool, active: bool) -> anyhow::Result<()> {
        let result = if completed || active {
            self.store
                .delete_task_from(id, Bucket::from_completed(completed))
        } else {
            self.store.delete_task(id).map(|_| ())
        };

        match result {
            Ok(()) => {
                tracing::info!(id, "task deleted");
                writeln!(self.out, "Deleted task #{id}")?;
                self.board()?;
            }
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(())
    }

    fn export(&mut self) -> anyhow::Result<()> {
        let snapshot = Snapshot {
            active: self.store.list_active(),
            completed: self.store.list_completed(),
            stats: self.store.stats(),
        };
        serde_json::to_writer_pretty(&mut self.out, &snapshot)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn board(&mut self) -> std::io::Result<()> {
        writeln!(self.out)?;
        render::board(&mut self.out, &self.store)
    }

    fn prompt(&mut self) -> std::io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }
}
