//! Search over the task list

use crate::task::Task;

/// Returns the tasks whose title contains `search_term`, ignoring case.
///
/// An empty search term matches every task. The source order is preserved.
pub fn filter<'a>(tasks: &'a [Task], search_term: &str) -> Vec<&'a Task> {
    let needle = search_term.to_lowercase();
    tasks.iter()
        .filter(|task| task.title().to_lowercase().contains(&needle))
        .collect()
}

/// The rows a task table should display.
///
/// These are the [`filter`]ed tasks, unless the search matches nothing: the whole list is shown then.
pub fn visible_rows<'a>(tasks: &'a [Task], search_term: &str) -> Vec<&'a Task> {
    let filtered = filter(tasks, search_term);
    if filtered.is_empty() {
        tasks.iter().collect()
    } else {
        filtered
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use crate::task::{Priority, TaskId};

    fn task(id: u64, title: &str) -> Task {
        Task::new_with_parameters(TaskId::from(id), title.to_string(), "some description".to_string(),
            Priority::Low, false, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "Buy milk"),
            task(2, "Write report"),
            task(3, "buy bread"),
            task(4, "Call the bank"),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id().to_string()).collect()
    }

    #[test]
    fn case_insensitive_title_match() {
        let tasks = sample();
        assert_eq!(ids(&filter(&tasks, "buy")), vec!["1", "3"]);
        assert_eq!(ids(&filter(&tasks, "BUY")), vec!["1", "3"]);
        assert_eq!(ids(&filter(&tasks, "rEpOrT")), vec!["2"]);
    }

    #[test]
    fn description_is_not_searched() {
        let tasks = sample();
        assert!(filter(&tasks, "description").is_empty());
    }

    #[test]
    fn empty_term_matches_everything() {
        let tasks = sample();
        let all = filter(&tasks, "");
        assert_eq!(all.len(), tasks.len());
        assert_eq!(ids(&all), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn visible_rows_fall_back_to_everything() {
        let tasks = sample();
        assert_eq!(ids(&visible_rows(&tasks, "bank")), vec!["4"]);
        assert_eq!(ids(&visible_rows(&tasks, "no such task")), vec!["1", "2", "3", "4"]);
        assert!(visible_rows(&[], "bank").is_empty());
    }

    proptest! {
        #[test]
        fn filter_keeps_exactly_the_matching_titles(titles in prop::collection::vec("[a-zA-Z ]{0,12}", 0..10), term in "[a-zA-Z]{0,3}") {
            let tasks: Vec<Task> = titles.iter().enumerate().map(|(i, t)| task(i as u64, t)).collect();
            let filtered = filter(&tasks, &term);

            let expected: Vec<&Task> = tasks.iter()
                .filter(|t| t.title().to_lowercase().contains(&term.to_lowercase()))
                .collect();
            prop_assert_eq!(&filtered, &expected);
            prop_assert_eq!(filter(&tasks, &term.to_uppercase()), filtered);
        }
    }
}
