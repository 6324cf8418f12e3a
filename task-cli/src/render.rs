//! Plain-text views of a [`TaskStore`].
use chrono::Local;
use std::io::{self, Write};
use todo_list::{Clock, Stats, Task, TaskStore};

const DUE_DATE_FORMAT: &str = "%b %d, %Y";
const COMPLETED_AT_FORMAT: &str = "%b %d, %I:%M %p";

/// Active list, completed list and progress summary.
pub fn board<C: Clock>(out: &mut impl Write, store: &TaskStore<C>) -> io::Result<()> {
    active(out, &store.list_active())?;
    writeln!(out)?;
    completed(out, &store.list_completed())?;
    writeln!(out)?;
    summary(out, &store.stats())
}

pub fn active(out: &mut impl Write, tasks: &[&Task]) -> io::Result<()> {
    writeln!(out, "Active Tasks ({})", tasks.len())?;
    if tasks.is_empty() {
        writeln!(out, "  No tasks yet")?;
        return writeln!(out, "  Add your first task to get started!");
    }
    for task in tasks {
        active_task(out, task)?;
    }
    Ok(())
}

pub fn completed(out: &mut impl Write, tasks: &[&Task]) -> io::Result<()> {
    writeln!(out, "Completed Tasks ({})", tasks.len())?;
    if tasks.is_empty() {
        writeln!(out, "  No completed tasks")?;
        return writeln!(out, "  Complete some tasks to see them here!");
    }
    for task in tasks {
        writeln!(out, "  #{} {}", task.id(), task.title())?;
        if let Some(at) = task.completed_at() {
            let at = at.with_timezone(&Local).format(COMPLETED_AT_FORMAT);
            writeln!(out, "     Completed: {at}")?;
        }
    }
    Ok(())
}

pub fn summary(out: &mut impl Write, stats: &Stats) -> io::Result<()> {
    writeln!(out, "Progress Summary")?;
    writeln!(out, "  Active Tasks:    {}", stats.active_count)?;
    writeln!(out, "  Completed Tasks: {}", stats.completed_count)?;
    writeln!(out, "  Completion Rate: {:.1}%", stats.completion_rate)
}

/// Every field of a single task.
pub fn detail(out: &mut impl Write, task: &Task) -> io::Result<()> {
    writeln!(out, "#{} {}", task.id(), task.title())?;
    writeln!(out, "  Status:      {:?}", task.status())?;
    writeln!(out, "  Priority:    {}", task.priority())?;
    match task.due_date() {
        Some(due) => writeln!(out, "  Due:         {}", due.format(DUE_DATE_FORMAT))?,
        None => writeln!(out, "  Due:         -")?,
    }
    if let Some(description) = task.description() {
        writeln!(out, "  Description: {description}")?;
    }
    let created = task.created_at().with_timezone(&Local);
    writeln!(out, "  Created:     {}", created.format(COMPLETED_AT_FORMAT))?;
    if let Some(at) = task.completed_at() {
        let at = at.with_timezone(&Local).format(COMPLETED_AT_FORMAT);
        writeln!(out, "  Completed:   {at}")?;
    }
    Ok(())
}

fn active_task(out: &mut impl Write, task: &Task) -> io::Result<()> {
    writeln!(out, "  #{} {}", task.id(), task.title())?;
    if let Some(description) = task.description() {
        writeln!(out, "     {description}")?;
    }
    match task.due_date() {
        Some(due) => writeln!(
            out,
            "     Priority: {} | Due: {}",
            task.priority(),
            due.format(DUE_DATE_FORMAT)
        ),
        None => writeln!(out, "     Priority: {}", task.priority()),
    }
}
