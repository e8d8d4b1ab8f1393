//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so every command
//! is styled the same way.

use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::db::{Database, Entry, Group};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Format an optional timestamp, `-` when absent.
pub fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Expiry column text: the date, or `never`.
pub fn format_expiry(entry: &Entry) -> String {
    let times = entry.time_info();
    if times.expires() {
        format_time(times.expiry_time())
    } else {
        "never".to_string()
    }
}

/// Print the group hierarchy with entry counts, one group per line.
pub fn print_tree(db: &Database) {
    let top = db.root_group().children();
    if top.is_empty() {
        info("This database has no groups.");
        return;
    }
    for group in top {
        print_group(db, group, 0);
    }
}

fn print_group(db: &Database, group: &Group, depth: usize) {
    let marker = if group.is_expanded() { "\u{25be}" } else { "\u{25b8}" };
    let icon = if db.custom_icon(group.icon()).is_some() {
        " (custom icon)".to_string()
    } else {
        String::new()
    };
    println!(
        "{}{} {} {}{}",
        "  ".repeat(depth),
        style(marker).dim(),
        style(group.name()).bold(),
        style(format!("[{}]", group.entries().len())).dim(),
        style(icon).dim()
    );
    for child in group.children() {
        print_group(db, child, depth + 1);
    }
}

/// Print a table of entries (Group, Title, Username, URL, Expires).
pub fn print_entries_table(db: &Database) {
    if db.entry_count() == 0 {
        info("No entries in this database.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Group", "Title", "Username", "URL", "Expires"]);

    for (group, entry) in db.entries() {
        table.add_row(vec![
            group.name().to_string(),
            entry.title().to_string(),
            entry.username().to_string(),
            entry.url().to_string(),
            format_expiry(entry),
        ]);
    }

    println!("{table}");
}

/// Print every field of one entry.  The password is masked unless
/// `reveal` is set.
pub fn print_entry(entry: &Entry, reveal: bool) {
    let password = if reveal {
        entry.password().to_string()
    } else {
        "*".repeat(entry.password().chars().count().min(12))
    };
    let times = entry.time_info();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Title", entry.title()]);
    table.add_row(vec!["Username", entry.username()]);
    table.add_row(vec!["Password", password.as_str()]);
    table.add_row(vec!["URL", entry.url()]);
    table.add_row(vec!["Notes", entry.notes()]);
    table.add_row(vec!["Icon", entry.icon_number().to_string().as_str()]);
    table.add_row(vec!["Created", format_time(times.creation_time()).as_str()]);
    table.add_row(vec![
        "Modified",
        format_time(times.last_modification_time()).as_str(),
    ]);
    table.add_row(vec!["Accessed", format_time(times.last_access_time()).as_str()]);
    table.add_row(vec!["Expires", format_expiry(entry).as_str()]);
    for (name, data) in entry.attachments() {
        table.add_row(vec!["Attachment".to_string(), format!("{name} ({} bytes)", data.len())]);
    }

    println!("{table}");
}
