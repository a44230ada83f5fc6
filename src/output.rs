// output formatting - readable text or raw json

use crate::core::{Category, LogRecord, LoggedRow, Outcome, Relevance};

pub struct Output;

impl Output {
    // for humans
    pub fn pretty(outcome: &Outcome) {
        println!("prompt:   {}", outcome.prompt);
        println!("category: {}", outcome.category());
        if let Some(relevance) = outcome.relevance() {
            let label = match relevance {
                Relevance::Relevant => "relevant",
                Relevance::NotRelevant => "not relevant",
            };
            println!("relevance: {label}");
        }
        println!();

        let marker = match outcome.category() {
            Category::Safety => "[!!]",
            Category::Instruction => "[??]",
            Category::Unclear => "[--]",
            Category::Quiet | Category::Positive => "[ok]",
        };
        for (i, line) in outcome.result.response_text.lines().enumerate() {
            if i == 0 {
                println!("{marker} {line}");
            } else {
                println!("     {line}");
            }
        }
    }

    // for scripts
    pub fn raw(outcome: &Outcome) {
        println!("{}", serde_json::to_string(outcome).unwrap_or_default());
    }

    pub fn records(records: &[LogRecord]) {
        if records.is_empty() {
            println!("no entries logged");
            return;
        }
        for record in records {
            print_record(record, None);
        }
    }

    pub fn rows(rows: &[LoggedRow]) {
        if rows.is_empty() {
            println!("no entries logged");
            return;
        }
        for row in rows {
            print_record(&row.record, Some(&row.session_id));
        }
    }
}

fn print_record(record: &LogRecord, session: Option<&str>) {
    let flag = if record.safety_flagged { " !" } else { "" };
    let session = session
        .map(|s| format!(" [{}]", s.chars().take(8).collect::<String>()))
        .unwrap_or_default();

    println!(
        "{}{session} {:<11}{flag} {}",
        record.timestamp.format("%Y-%m-%d %H:%M"),
        record.category.as_str(),
        truncate(&record.entry, 60),
    );
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}
