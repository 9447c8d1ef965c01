//! CSV export of a day's tasks

use chrono::NaiveDate;

use crate::task::Task;

const HEADER: [&str; 5] = ["Title", "Description", "Priority", "Status", "Date"];

/// Which date fills the `Date` column of every exported row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowDate {
    /// The currently selected day, repeated on every row
    SelectedDate,
    /// The day each task belongs to
    TaskDate,
}

/// An export, ready to be written or downloaded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl CsvFile {
    pub fn as_text(&self) -> &str {
        std::str::from_utf8(&self.content).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Export {
    /// There was no task to export. No file should be produced.
    NothingToExport,
    Csv(CsvFile),
}

/// The name the export file should be saved under
pub fn file_name(selected_date: NaiveDate) -> String {
    format!("tasks_{}.csv", selected_date.format("%Y-%m-%d"))
}

/// Format a date like `Fri Oct 16 2026`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Build a CSV file with one record per task, in order, preceded by a header record
pub fn export_csv(tasks: &[Task], selected_date: NaiveDate, row_date: RowDate) -> Export {
    if tasks.is_empty() {
        log::info!("No task for {}, nothing to export", selected_date);
        return Export::NothingToExport;
    }

    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(HEADER.join(","));
    for task in tasks {
        let date = match row_date {
            RowDate::SelectedDate => selected_date,
            RowDate::TaskDate => task.date(),
        };
        let record = [
            escape(task.title()),
            escape(task.description()),
            task.priority().to_string(),
            task.status_label().to_string(),
            display_date(date),
        ];
        lines.push(record.join(","));
    }

    log::debug!("Exported {} tasks", tasks.len());
    Export::Csv(CsvFile {
        file_name: file_name(selected_date),
        content: lines.join("\n").into_bytes(),
    })
}

/// Quote a field if it contains a separator, a quote or a line break
fn escape(field: &str) -> String {
    if field.contains(|c: char| c == ',' || c == '"' || c == '\n' || c == '\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::task::{Priority, TaskId};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new_with_parameters(TaskId::from(1), "Buy milk".into(), "Two bottles".into(), Priority::Low, false, day(16)),
            Task::new_with_parameters(TaskId::from(2), "Write report".into(), "Quarterly, final".into(), Priority::High, true, day(15)),
        ]
    }

    fn unwrap_csv(export: Export) -> CsvFile {
        match export {
            Export::Csv(file) => file,
            Export::NothingToExport => panic!("expected a CSV file"),
        }
    }

    #[test]
    fn empty_list_exports_nothing() {
        assert_eq!(export_csv(&[], day(16), RowDate::SelectedDate), Export::NothingToExport);
    }

    #[test]
    fn rows_use_the_selected_date() {
        let file = unwrap_csv(export_csv(&sample(), day(16), RowDate::SelectedDate));
        assert_eq!(file.file_name, "tasks_2026-10-16.csv");
        assert_eq!(file.as_text(),
            "Title,Description,Priority,Status,Date\n\
             Buy milk,Two bottles,low,Not Completed,Fri Oct 16 2026\n\
             Write report,\"Quarterly, final\",high,Completed,Fri Oct 16 2026");
    }

    #[test]
    fn rows_can_use_their_own_date() {
        let file = unwrap_csv(export_csv(&sample(), day(16), RowDate::TaskDate));
        let lines: Vec<&str> = file.as_text().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("Fri Oct 16 2026"));
        assert!(lines[2].ends_with("Thu Oct 15 2026"));
    }

    #[test]
    fn quoting() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn single_digit_days_are_padded() {
        assert_eq!(display_date(day(6)), "Tue Oct 06 2026");
    }
}
