use envtrail_sdk::types::StatusReport;

use super::{Palette, format_bytes};

pub fn print_status(report: &StatusReport, p: Palette) {
    if let Some(project) = &report.project {
        println!("{} {}", p.heading("Project:"), project.display());
    }

    match &report.session {
        Some(session) => println!(
            "{} {} \"{}\" ({} exchanges, {} min)",
            p.heading("Session:"),
            p.key(session.chat_id.as_str()),
            session.topic,
            session.message_count,
            session.elapsed_minutes
        ),
        None => println!("{} {}", p.heading("Session:"), p.dim("none")),
    }

    if let Some(pointer) = &report.pointer {
        if pointer.exists {
            let usage = format!(
                "{} / {}",
                format_bytes(pointer.size_bytes),
                format_bytes(pointer.limit_bytes)
            );
            let usage = if pointer.size_bytes > pointer.limit_bytes {
                p.warn(&format!("{} (over limit)", usage))
            } else {
                p.ok(&usage)
            };
            println!(
                "{} {}, {} entries",
                p.heading("Pointer file:"),
                usage,
                pointer.managed_count
            );
        } else {
            println!("{} {}", p.heading("Pointer file:"), p.dim("missing"));
        }
    }

    if let Some(log) = &report.log {
        if log.exists {
            println!(
                "{} {} records, {} ({})",
                p.heading("Log:"),
                log.record_count,
                format_bytes(log.size_bytes),
                log.path.display()
            );
        } else {
            println!("{} {}", p.heading("Log:"), p.dim("no log this week"));
        }
    }

    if report.project.is_some() {
        let backups = if report.backups.is_empty() {
            p.dim("none")
        } else {
            report.backups.join(", ")
        };
        println!("{} {}", p.heading("Backups:"), backups);

        let weeks: Vec<String> = report.weeks.iter().map(|w| w.to_string()).collect();
        let weeks = if weeks.is_empty() {
            p.dim("none")
        } else {
            weeks.join(", ")
        };
        println!("{} {}", p.heading("Weeks:"), weeks);
    }

    if let Some(pointer) = &report.pointer
        && !pointer.recent.is_empty()
    {
        println!();
        println!("{}", p.heading("Recent entries:"));
        for entry in &pointer.recent {
            println!("  {} {}", p.key(&entry.key), entry.preview);
            if let Some(reference) = &entry.reference {
                println!("    {}", p.dim(&format!("# Log: {}", reference)));
            }
        }
    }
}
