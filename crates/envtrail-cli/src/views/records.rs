use envtrail_sdk::types::{LogBody, LogRecord, WeekRecords};

use super::Palette;

pub fn print_records(records: &[LogRecord], p: Palette) {
    for record in records {
        print_record(record, p);
    }
}

pub fn print_week(week: &WeekRecords, p: Palette) {
    println!(
        "{} {} ({} of {} records)",
        p.heading("Week"),
        week.week,
        week.records.len(),
        week.total
    );
    println!();
    print_records(&week.records, p);
}

fn print_record(record: &LogRecord, p: Palette) {
    println!(
        "{} {} #{} {}",
        p.dim(&record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        p.key(record.chat_id.as_str()),
        record.message_num,
        p.heading(record.body.kind())
    );
    let text = match &record.body {
        LogBody::SessionStart { project_path, .. } => {
            format!("{}\n{}", record.pointer_text(), project_path)
        }
        _ => record.pointer_text(),
    };
    for line in text.lines() {
        println!("    {}", line);
    }
    println!();
}
