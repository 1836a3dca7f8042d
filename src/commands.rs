use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::catalog::machine_types;
use crate::error::Result;
use crate::fleet::Fleet;
use crate::input::{
    generate_task_id, normalize_machine_type, parse_optional_date, parse_threshold_days,
    parse_threshold_usage,
};
use crate::models::{Machine, MaintenanceTask, UsageTracking};

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

fn fmt_usage(v: f64) -> String {
    format!("{:.1}", v)
}

/// Adds a machine and returns its index.
///
/// A blank type becomes the custom type; a blank start date means today.
pub fn cmd_machine_add(fleet: &mut Fleet, name: String, machine_type: Option<String>, start: Option<String>, silent: bool) -> Result<usize> {
    let machine_type = normalize_machine_type(machine_type.as_deref().unwrap_or(""));
    let start_date = parse_optional_date(start.as_deref().unwrap_or(""))?;
    let machine = Machine::new(name, machine_type, start_date, None)?;
    let summary = format!("'{}' ({}, {} tasks)", machine.name(), machine.type_display(), machine.task_count());
    let index = fleet.add_machine(machine);
    fleet.save()?;
    if !silent { println!("Machine {} added as #{}.", summary, index + 1); }
    Ok(index)
}

/// Removes the machine at `index`.
pub fn cmd_machine_remove(fleet: &mut Fleet, index: usize, silent: bool) -> Result<()> {
    let machine = fleet.remove_machine(index)?;
    fleet.save()?;
    if !silent { println!("Machine '{}' removed.", machine.name()); }
    Ok(())
}

/// Lists machines with the number of tasks due on `today`.
pub fn cmd_machine_list(fleet: &Fleet, today: NaiveDate) {
    if fleet.is_empty() {
        println!("No machines found.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["#", "Name", "Type", "Start", "Tasks", "Due"]));

    for (i, m) in fleet.machines().iter().enumerate() {
        let due = m.tasks().filter(|t| t.is_overdue(today)).count();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(m.name()),
            Cell::new(m.type_label()),
            Cell::new(m.start_date()),
            Cell::new(m.task_count()),
            Cell::new(due).fg(if due > 0 { Color::Red } else { Color::Green }),
        ]);
    }
    println!("{table}");
}

/// Shows one machine and the state of each of its tasks.
pub fn cmd_machine_show(fleet: &Fleet, index: usize, today: NaiveDate) -> Result<()> {
    let m = fleet.machine(index)?;
    println!("{} | Type: {} | Start: {}", m.name(), m.type_display(), m.start_date());
    if m.task_count() == 0 {
        println!("No maintenance tasks defined. Use `upkeep task add` to create one.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["ID", "Name", "Last Done", "Every", "Usage", "Status"]));

    for t in m.tasks() {
        let last = match (t.last_date(), t.days_since_last(today)) {
            (Some(d), Some(ago)) => format!("{} ({}d ago)", d, ago),
            _ => "N/A".to_string(),
        };
        let usage = match t.usage() {
            UsageTracking::TimeOnly => "-".to_string(),
            UsageTracking::Tracked { threshold_usage: Some(limit), usage_count } => {
                format!("{} / {}", fmt_usage(*usage_count), fmt_usage(*limit))
            }
            UsageTracking::Tracked { threshold_usage: None, usage_count } => fmt_usage(*usage_count),
        };
        let (status, color) = match t.due_reason(today) {
            Some(reason) => (format!("Due: {}", reason), Color::Red),
            None => match t.days_remaining(today) {
                Some(left) => (format!("OK ({}d left)", left), Color::Green),
                None => ("OK".to_string(), Color::Green),
            },
        };
        table.add_row(vec![
            Cell::new(t.task_id()),
            Cell::new(t.name()),
            Cell::new(last),
            Cell::new(format!("{}d", t.threshold_days())),
            Cell::new(usage),
            Cell::new(status).fg(color),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Adds a custom task to a machine.
///
/// Thresholds are taken as entered text and validated here. Without an
/// explicit id one is generated from the name and the current time.
pub fn cmd_task_add(fleet: &mut Fleet, index: usize, name: String, days: String, usage: Option<String>, task_id: Option<String>, silent: bool) -> Result<()> {
    let threshold_days = parse_threshold_days(&days)?;
    let tracking = match usage {
        Some(u) => UsageTracking::tracked(parse_threshold_usage(&u)?),
        None => UsageTracking::TimeOnly,
    };
    let task_id = task_id.unwrap_or_else(|| generate_task_id(&name, Local::now().timestamp()));
    let task = MaintenanceTask::new(task_id.clone(), name, threshold_days, tracking)?;
    fleet.machine_mut(index)?.add_task(task)?;
    fleet.save()?;
    if !silent { println!("Task '{}' added.", task_id); }
    Ok(())
}

/// Edits name, time threshold and usage tracking of an existing task.
///
/// `usage` switches tracking on (or changes its threshold) and `no_usage`
/// switches it off. Last date and accumulated usage are kept.
#[allow(clippy::too_many_arguments)]
pub fn cmd_task_edit(fleet: &mut Fleet, index: usize, task_id: String, name: Option<String>, days: Option<String>, usage: Option<String>, no_usage: bool, silent: bool) -> Result<()> {
    let machine = fleet.machine_mut(index)?;
    let mut task = machine
        .task(&task_id)
        .cloned()
        .ok_or_else(|| crate::Error::TaskNotFound(task_id.clone()))?;

    if let Some(n) = name { task.set_name(n)?; }
    if let Some(d) = days { task.set_threshold_days(parse_threshold_days(&d)?)?; }
    if let Some(u) = usage {
        task.set_usage_tracking(true, Some(parse_threshold_usage(&u)?))?;
    } else if no_usage {
        task.set_usage_tracking(false, None)?;
    }

    machine.edit_task(task)?;
    fleet.save()?;
    if !silent { println!("Task '{}' updated.", task_id); }
    Ok(())
}

pub fn cmd_task_remove(fleet: &mut Fleet, index: usize, task_id: String, silent: bool) -> Result<()> {
    let removed = fleet.machine_mut(index)?.remove_task(&task_id)?;
    fleet.save()?;
    if !silent { println!("Task '{}' ({}) removed.", task_id, removed.name()); }
    Ok(())
}

/// Adds usage to a task, e.g. litres brewed since the last entry.
pub fn cmd_usage(fleet: &mut Fleet, index: usize, task_id: String, quantity: String, silent: bool) -> Result<()> {
    let machine = fleet.machine_mut(index)?;
    machine.register_usage(&task_id, &quantity)?;
    let total = machine.task(&task_id).and_then(|t| t.usage_count());
    let name = machine.name().to_string();
    fleet.save()?;
    if !silent {
        match total {
            Some(total) => println!("Registered {} on '{}' of {} (total {}).", quantity.trim(), task_id, name, fmt_usage(total)),
            None => println!("Task '{}' does not track usage; nothing recorded.", task_id),
        }
    }
    Ok(())
}

/// Records that a task was performed today.
pub fn cmd_done(fleet: &mut Fleet, index: usize, task_id: String, silent: bool) -> Result<()> {
    let machine = fleet.machine_mut(index)?;
    machine.register_maintenance(&task_id)?;
    let name = machine.name().to_string();
    fleet.save()?;
    if !silent { println!("Maintenance of '{}' on {} recorded.", task_id, name); }
    Ok(())
}

/// Lists every overdue task across the fleet.
pub fn cmd_due(fleet: &Fleet, today: NaiveDate) {
    let due = fleet.due_tasks(today);
    if due.is_empty() {
        println!("Nothing due.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["#", "Machine", "Task ID", "Task", "Reason", "Last Done"]));
    for e in due {
        table.add_row(vec![
            Cell::new(e.machine_index + 1),
            Cell::new(e.machine_name),
            Cell::new(e.task_id),
            Cell::new(e.task_name),
            Cell::new(e.reason).fg(Color::Red),
            Cell::new(e.days_since_last.map_or_else(|| "never".to_string(), |d| format!("{}d ago", d))),
        ]);
    }
    println!("{table}");
}

/// Lists the known machine types and their default tasks.
pub fn cmd_types() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(header(&["Type", "Name", "Default Task", "Every", "Usage Limit"]));
    for kind in machine_types() {
        for tmpl in kind.maintenance {
            table.add_row(vec![
                kind.key.to_string(),
                kind.display_name.to_string(),
                format!("{} ({})", tmpl.name, tmpl.key),
                format!("{}d", tmpl.threshold_days),
                tmpl.threshold_usage.map_or_else(|| "-".to_string(), fmt_usage),
            ]);
        }
    }
    println!("{table}");
}
