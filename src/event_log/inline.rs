//! Ad-hoc semicolon-delimited inline log format: `task;case;user;date` per line.
//!
//! A convenience reader for logs jotted down by hand or produced by simple exports. Does not
//! validate dates or deduplicate users, just assigns events to cases.

use super::{Event, Log};

/// Parse a [`Log`] from `task;case;user;date` lines.
///
/// Blank lines and lines with fewer than two semicolon-delimited fields are skipped.
pub fn parse_inline_log(text: &str) -> Log {
    let mut log = Log::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() <= 1 {
            continue;
        }
        let task = fields[0].to_string();
        let case = fields[1].to_string();
        let mut event = Event::new(task);
        event.case = Some(case.clone());
        if let Some(user) = fields.get(2) {
            event.resources.push((*user).to_string());
        }
        if let Some(date) = fields.get(3) {
            event.timestamp = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S")
                .ok()
                .and_then(|ndt| ndt.and_local_timezone(chrono::Utc).single());
        }
        log.entry(case).or_default().push(event);
    }
    log
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
Task_A;case_1;user_1;2019-09-09 17:36:47
Task_B;case_1;user_3;2019-09-11 09:11:13

Task_A;case_2;user_2;2019-09-14 08:56:09
";

    #[test]
    fn skips_blank_lines_and_groups_by_case() {
        let log = parse_inline_log(SAMPLE);
        assert_eq!(log.len(), 2);
        assert_eq!(log["case_1"].len(), 2);
        assert_eq!(log["case_1"][0].task, "Task_A");
        assert_eq!(log["case_1"][0].resources, vec!["user_1".to_string()]);
        assert_eq!(log["case_2"].len(), 1);
    }

    #[test]
    fn short_lines_are_skipped() {
        let log = parse_inline_log("just_a_task_name\n\n");
        assert!(log.is_empty());
    }
}
