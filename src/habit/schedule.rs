//! Schedule evaluation — pure functions from (recurrence rule, date) to
//! "due" decisions. No I/O, no hidden state.

use chrono::{Datelike, NaiveDate};

use crate::habit::types::{parse_day_set, Frequency, Habit};

/// Whether `date` is a scheduled occurrence of `habit`.
///
/// Weekly habits match on the ISO weekday number (Mon=1..Sun=7), monthly
/// habits on the day-of-month. An absent or empty day-set means never due.
/// No day-of-month clamping: a monthly set of `{31}` simply never matches
/// in a 30-day month.
pub fn is_due(habit: &Habit, date: NaiveDate) -> bool {
    match habit.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => match habit.weekly_days.as_deref() {
            Some(days) => parse_day_set(days).contains(&date.weekday().number_from_monday()),
            None => false,
        },
        Frequency::Monthly => match habit.monthly_days.as_deref() {
            Some(days) => parse_day_set(days).contains(&date.day()),
            None => false,
        },
    }
}

/// All scheduled occurrences of `habit` between `from` and `to`, both
/// inclusive, ascending. Empty when `from > to`.
///
/// Walks day by day, so cost is linear in the calendar span; callers keep
/// the span bounded (it is "days since last check" in practice).
pub fn due_between(habit: &Habit, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut due = Vec::new();
    let mut current = from;
    while current <= to {
        if is_due(habit, current) {
            due.push(current);
        }
        current = current.succ_opt().expect("date out of range");
    }
    due
}
