use chrono::{Days, Months, NaiveDate};
use model::Frequency;

/// Returns the date one period after `date`.
///
/// Months and years are calendar steps: the day of month is kept when the
/// target month has it and clamped to the month's last day otherwise, so
/// Jan 31 + 1 month is Feb 28 (Feb 29 in leap years) and Feb 29 + 1 year is Feb 28.
///
/// An unknown frequency, or a step past the end of the supported calendar,
/// returns `date` unchanged.
pub fn next_date(date: NaiveDate, frequency: Option<Frequency>) -> NaiveDate {
    frequency
        .and_then(|frequency| step(date, frequency))
        .unwrap_or(date)
}

/// One period forward, or `None` if the result is not representable.
pub fn step(date: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => date.checked_add_days(Days::new(1)),
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Yearly => date.checked_add_months(Months::new(12)),
    }
}
