use chrono::{Days, Months, NaiveDate};

use crate::models::{Recurrence, Task};

/// Default bound on recurrence walks.
///
/// A walk that needs more steps than this is truncated. Configurable through
/// [`RecurrenceConfig`].
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Computes the date following `current` under the task's recurrence rule.
///
/// Daily and custom rules step by N days, weekly by N weeks and monthly by N
/// calendar months. Monthly steps clamp to the last day of the target month
/// (Jan 31 + 1 month = Feb 28/29). Returns `None` for non-recurring tasks or
/// when the result would leave the representable date range.
pub fn next_date(task: &Task, current: NaiveDate) -> Option<NaiveDate> {
    let interval = task.interval();

    match task.recurrence {
        Recurrence::None => None,
        Recurrence::Daily | Recurrence::Custom => current.checked_add_days(Days::new(interval.into())),
        Recurrence::Weekly => current.checked_add_days(Days::new(u64::from(interval) * 7)),
        Recurrence::Monthly => current.checked_add_months(Months::new(interval)),
    }
}

/// Configuration for recurrence expansion.
#[derive(Debug, Clone)]
pub struct RecurrenceConfig {
    /// Maximum number of advance steps per walk, shared by the skip-ahead and
    /// emit phases of a range expansion.
    pub max_iterations: usize,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// RecurrenceManager: bounded walks over a task's occurrence dates.
///
/// Responsibilities:
/// 1. Expand a task into the sorted occurrence dates inside a window
/// 2. Decide whether a date is a legitimate occurrence of a task
/// 3. Find the next upcoming occurrence from a reference date
#[derive(Debug, Clone, Default)]
pub struct RecurrenceManager {
    config: RecurrenceConfig,
}

impl RecurrenceManager {
    /// Creates a new RecurrenceManager with the given configuration.
    pub fn new(config: RecurrenceConfig) -> Self {
        Self { config }
    }

    /// Creates a RecurrenceManager with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RecurrenceConfig::default())
    }

    /// Generates the occurrence dates of `task` inside `[start, end]`.
    ///
    /// # Behavior
    /// - The upper bound is `end`, lowered to the recurrence end date if earlier
    /// - Tasks without a due date have no occurrences
    /// - A non-recurring task yields its due date when it lies in the window
    /// - A recurring task walks from its due date: steps before `start` are
    ///   skipped, then dates are emitted until the upper bound is passed
    /// - Both phases share one step counter; reaching the cap truncates
    ///
    /// The result is strictly increasing.
    pub fn occurrences_between(&self, task: &Task, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let Some(due_date) = task.due_date else {
            return Vec::new();
        };

        let upper = match task.recurrence_end_date {
            Some(until) if until < end => until,
            _ => end,
        };
        if upper < start {
            return Vec::new();
        }

        if !task.is_recurring() {
            return if (start..=upper).contains(&due_date) {
                vec![due_date]
            } else {
                Vec::new()
            };
        }

        let max_iterations = self.config.max_iterations;
        let mut dates = Vec::new();
        let mut current = Some(due_date);
        let mut steps = 0;

        while let Some(date) = current {
            if date >= start || steps >= max_iterations {
                break;
            }
            current = next_date(task, date);
            steps += 1;
        }

        while let Some(date) = current {
            if date > upper || steps >= max_iterations {
                break;
            }
            dates.push(date);
            current = next_date(task, date);
            steps += 1;
        }

        if steps >= max_iterations && current.is_some_and(|date| date <= upper) {
            tracing::warn!(
                task_id = task.id,
                %start,
                %end,
                max_iterations,
                "recurrence walk truncated by safety cap"
            );
        }

        dates
    }

    /// Returns true if `date` is one of the task's occurrence dates.
    ///
    /// For non-recurring tasks this is equality with the due date. For
    /// recurring tasks the date must be reachable from the due date by
    /// repeated steps, without passing the recurrence end date, within the
    /// iteration cap.
    pub fn is_occurrence(&self, task: &Task, date: NaiveDate) -> bool {
        let Some(due_date) = task.due_date else {
            return false;
        };

        if task.recurrence_end_date.is_some_and(|until| date > until) {
            return false;
        }

        if !task.is_recurring() {
            return due_date == date;
        }

        if date < due_date {
            return false;
        }

        let mut current = Some(due_date);
        let mut steps = 0;
        while let Some(candidate) = current {
            if steps >= self.config.max_iterations || candidate > date {
                return false;
            }
            if candidate == date {
                return true;
            }
            current = next_date(task, candidate);
            steps += 1;
        }

        false
    }

    /// Finds the first occurrence on or after `reference`.
    ///
    /// Returns `None` when the task has no due date, when a non-recurring
    /// task is already past due, or when the recurrence ends (or the cap is
    /// reached) before `reference`.
    pub fn next_occurrence(&self, task: &Task, reference: NaiveDate) -> Option<NaiveDate> {
        let due_date = task.due_date?;

        if !task.is_recurring() {
            return (due_date >= reference).then_some(due_date);
        }

        let mut current = Some(due_date);
        let mut steps = 0;
        while let Some(candidate) = current {
            if steps >= self.config.max_iterations {
                break;
            }
            if task.recurrence_end_date.is_some_and(|until| candidate > until) {
                return None;
            }
            if candidate >= reference {
                return Some(candidate);
            }
            current = next_date(task, candidate);
            steps += 1;
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recurring(recurrence: Recurrence, interval: i64, due: NaiveDate, until: Option<NaiveDate>) -> Task {
        Task {
            id: 1,
            title: "Recurring".to_string(),
            due_date: Some(due),
            recurrence,
            recurrence_interval: interval,
            recurrence_end_date: until,
            ..Default::default()
        }
    }

    fn one_off(due: Option<NaiveDate>) -> Task {
        Task {
            id: 2,
            title: "One-off".to_string(),
            due_date: due,
            ..Default::default()
        }
    }

    mod next_date_tests {
        use super::*;

        #[rstest]
        #[case(Recurrence::Daily, 1, date(2024, 1, 1), date(2024, 1, 2))]
        #[case(Recurrence::Daily, 3, date(2024, 1, 30), date(2024, 2, 2))]
        #[case(Recurrence::Custom, 10, date(2024, 1, 1), date(2024, 1, 11))]
        #[case(Recurrence::Weekly, 1, date(2024, 1, 1), date(2024, 1, 8))]
        #[case(Recurrence::Weekly, 2, date(2024, 12, 25), date(2025, 1, 8))]
        #[case(Recurrence::Monthly, 1, date(2024, 3, 15), date(2024, 4, 15))]
        #[case(Recurrence::Monthly, 12, date(2024, 2, 29), date(2025, 2, 28))]
        #[case(Recurrence::Monthly, 1, date(2024, 1, 31), date(2024, 2, 29))]
        #[case(Recurrence::Monthly, 1, date(2023, 1, 31), date(2023, 2, 28))]
        fn steps_by_rule(
            #[case] recurrence: Recurrence,
            #[case] interval: i64,
            #[case] current: NaiveDate,
            #[case] expected: NaiveDate,
        ) {
            let task = recurring(recurrence, interval, current, None);
            assert_eq!(next_date(&task, current), Some(expected));
        }

        #[test]
        fn none_has_no_next_date() {
            let task = one_off(Some(date(2024, 1, 1)));
            assert_eq!(next_date(&task, date(2024, 1, 1)), None);
        }

        #[test]
        fn zero_interval_steps_by_one() {
            let task = recurring(Recurrence::Daily, 0, date(2024, 1, 1), None);
            assert_eq!(next_date(&task, date(2024, 1, 1)), Some(date(2024, 1, 2)));
        }
    }

    mod occurrences_between_tests {
        use super::*;

        #[test]
        fn weekly_skips_dates_before_window() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Weekly, 1, date(2024, 1, 1), None);

            let dates = manager.occurrences_between(&task, date(2024, 1, 10), date(2024, 1, 31));
            assert_eq!(dates, vec![date(2024, 1, 15), date(2024, 1, 22), date(2024, 1, 29)]);
        }

        #[test]
        fn monthly_respects_end_date() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Monthly, 1, date(2024, 3, 1), Some(date(2024, 5, 1)));

            let dates = manager.occurrences_between(&task, date(2024, 1, 1), date(2024, 12, 31));
            assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 4, 1), date(2024, 5, 1)]);
        }

        #[test]
        fn monthly_clamp_carries_forward() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Monthly, 1, date(2024, 1, 31), None);

            let dates = manager.occurrences_between(&task, date(2024, 1, 1), date(2024, 4, 30));
            assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 29), date(2024, 4, 29)]);
        }

        #[test]
        fn window_after_end_date_is_empty() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Daily, 1, date(2024, 1, 1), Some(date(2024, 1, 5)));

            assert!(manager.occurrences_between(&task, date(2024, 2, 1), date(2024, 2, 10)).is_empty());
        }

        #[test]
        fn missing_due_date_is_empty() {
            let manager = RecurrenceManager::with_defaults();
            let mut task = recurring(Recurrence::Daily, 1, date(2024, 1, 1), None);
            task.due_date = None;

            assert!(manager.occurrences_between(&task, date(2024, 1, 1), date(2024, 1, 10)).is_empty());
        }

        #[test]
        fn one_off_in_and_out_of_window() {
            let manager = RecurrenceManager::with_defaults();
            let task = one_off(Some(date(2024, 6, 1)));

            assert_eq!(manager.occurrences_between(&task, date(2024, 6, 1), date(2024, 6, 1)), vec![date(2024, 6, 1)]);
            assert!(manager.occurrences_between(&task, date(2024, 6, 2), date(2024, 6, 30)).is_empty());
            assert!(one_off(None).due_date.is_none());
            assert!(manager.occurrences_between(&one_off(None), date(2024, 1, 1), date(2024, 12, 31)).is_empty());
        }

        #[test]
        fn cap_truncates_long_ranges() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Daily, 1, date(2000, 1, 1), None);

            let dates = manager.occurrences_between(&task, date(2000, 1, 1), date(2010, 12, 31));
            assert_eq!(dates.len(), DEFAULT_MAX_ITERATIONS);
            assert_eq!(dates.last(), Some(&date(2002, 9, 26)));
        }

        #[test]
        fn skip_phase_consumes_the_cap() {
            let manager = RecurrenceManager::new(RecurrenceConfig { max_iterations: 10 });
            let task = recurring(Recurrence::Daily, 1, date(2024, 1, 1), None);

            let dates = manager.occurrences_between(&task, date(2024, 1, 8), date(2024, 1, 31));
            assert_eq!(dates, vec![date(2024, 1, 8), date(2024, 1, 9), date(2024, 1, 10)]);

            assert!(manager.occurrences_between(&task, date(2024, 3, 1), date(2024, 3, 31)).is_empty());
        }
    }

    mod is_occurrence_tests {
        use super::*;

        #[test]
        fn reachable_dates_belong() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Weekly, 2, date(2024, 1, 1), None);

            assert!(manager.is_occurrence(&task, date(2024, 1, 1)));
            assert!(manager.is_occurrence(&task, date(2024, 1, 15)));
            assert!(!manager.is_occurrence(&task, date(2024, 1, 8)));
            assert!(!manager.is_occurrence(&task, date(2023, 12, 18)));
        }

        #[test]
        fn end_date_excludes_later_dates() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Daily, 1, date(2024, 1, 1), Some(date(2024, 1, 3)));

            assert!(manager.is_occurrence(&task, date(2024, 1, 3)));
            assert!(!manager.is_occurrence(&task, date(2024, 1, 4)));
        }

        #[test]
        fn one_off_matches_due_date_only() {
            let manager = RecurrenceManager::with_defaults();
            let task = one_off(Some(date(2024, 6, 1)));

            assert!(manager.is_occurrence(&task, date(2024, 6, 1)));
            assert!(!manager.is_occurrence(&task, date(2024, 6, 2)));
            assert!(!manager.is_occurrence(&one_off(None), date(2024, 6, 1)));
        }

        #[test]
        fn dates_beyond_cap_do_not_belong() {
            let manager = RecurrenceManager::new(RecurrenceConfig { max_iterations: 5 });
            let task = recurring(Recurrence::Daily, 1, date(2024, 1, 1), None);

            assert!(manager.is_occurrence(&task, date(2024, 1, 5)));
            assert!(!manager.is_occurrence(&task, date(2024, 1, 6)));
        }
    }

    mod next_occurrence_tests {
        use super::*;

        #[test]
        fn finds_first_date_on_or_after_reference() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Weekly, 1, date(2024, 1, 1), None);

            assert_eq!(manager.next_occurrence(&task, date(2024, 1, 8)), Some(date(2024, 1, 8)));
            assert_eq!(manager.next_occurrence(&task, date(2024, 1, 9)), Some(date(2024, 1, 15)));
            assert_eq!(manager.next_occurrence(&task, date(2023, 6, 1)), Some(date(2024, 1, 1)));
        }

        #[test]
        fn ended_series_has_none() {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(Recurrence::Daily, 1, date(2024, 1, 1), Some(date(2024, 1, 10)));

            assert_eq!(manager.next_occurrence(&task, date(2024, 2, 1)), None);
        }

        #[test]
        fn one_off_past_due_has_none() {
            let manager = RecurrenceManager::with_defaults();
            let task = one_off(Some(date(2024, 6, 1)));

            assert_eq!(manager.next_occurrence(&task, date(2024, 5, 1)), Some(date(2024, 6, 1)));
            assert_eq!(manager.next_occurrence(&task, date(2024, 6, 2)), None);
        }
    }

    fn recurrence_strategy() -> impl Strategy<Value = Recurrence> {
        prop_oneof![
            Just(Recurrence::Daily),
            Just(Recurrence::Weekly),
            Just(Recurrence::Monthly),
            Just(Recurrence::Custom),
        ]
    }

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (0i64..3650).prop_map(|offset| date(2020, 1, 1) + chrono::Duration::days(offset))
    }

    proptest! {
        #[test]
        fn next_date_is_strictly_increasing(
            recurrence in recurrence_strategy(),
            interval in 1i64..40,
            due in date_strategy(),
        ) {
            let task = recurring(recurrence, interval, due, None);
            let mut current = due;
            for _ in 0..50 {
                let next = next_date(&task, current).unwrap();
                prop_assert!(next > current);
                current = next;
            }
        }

        #[test]
        fn range_stays_inside_bounds(
            recurrence in recurrence_strategy(),
            interval in 0i64..20,
            due in date_strategy(),
            start in date_strategy(),
            span in 0i64..4000,
            until in proptest::option::of(date_strategy()),
        ) {
            let manager = RecurrenceManager::with_defaults();
            let task = recurring(recurrence, interval, due, until);
            let end = start + chrono::Duration::days(span);

            let dates = manager.occurrences_between(&task, start, end);
            let upper = until.map_or(end, |u| u.min(end));

            prop_assert!(dates.len() <= DEFAULT_MAX_ITERATIONS);
            prop_assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
            for d in &dates {
                prop_assert!(*d >= start && *d <= upper);
                prop_assert!(manager.is_occurrence(&task, *d) || dates.len() == DEFAULT_MAX_ITERATIONS);
            }
        }

        #[test]
        fn one_off_range_is_empty_or_due_date(
            due in date_strategy(),
            start in date_strategy(),
            span in 0i64..400,
        ) {
            let manager = RecurrenceManager::with_defaults();
            let task = one_off(Some(due));
            let dates = manager.occurrences_between(&task, start, start + chrono::Duration::days(span));
            prop_assert!(dates.is_empty() || dates == vec![due]);
        }
    }
}
