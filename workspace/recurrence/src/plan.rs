use chrono::NaiveDate;
use model::Frequency;
use model::entities::transaction;

use crate::frequency::next_date;

/// The occurrences a template owes as of some day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchUpPlan {
    /// Due dates to materialise, strictly increasing.
    pub due_dates: Vec<NaiveDate>,
    /// The watermark after materialising `due_dates`. Equals the starting
    /// watermark when nothing is due.
    pub watermark: NaiveDate,
}

impl CatchUpPlan {
    pub fn is_empty(&self) -> bool {
        self.due_dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.due_dates.len()
    }
}

/// Computes every period elapsed after `watermark` up to and including `today`.
///
/// The watermark itself is never part of the plan. Without a frequency the
/// plan is empty, and the walk also stops as soon as a step fails to move the
/// date forward, so it always terminates.
pub fn plan_catch_up(
    watermark: NaiveDate,
    frequency: Option<Frequency>,
    today: NaiveDate,
) -> CatchUpPlan {
    let mut plan = CatchUpPlan {
        due_dates: Vec::new(),
        watermark,
    };
    if frequency.is_none() {
        return plan;
    }

    loop {
        let candidate = next_date(plan.watermark, frequency);
        if candidate <= plan.watermark || candidate > today {
            break;
        }
        plan.due_dates.push(candidate);
        plan.watermark = candidate;
    }

    plan
}

/// Plans a stored template from its current watermark.
pub fn plan_for(template: &transaction::Model, today: NaiveDate) -> CatchUpPlan {
    plan_catch_up(template.watermark(), template.parsed_frequency(), today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_scenario() {
        let plan = plan_catch_up(date(2024, 1, 1), Some(Frequency::Weekly), date(2024, 1, 22));
        assert_eq!(
            plan.due_dates,
            vec![date(2024, 1, 8), date(2024, 1, 15), date(2024, 1, 22)]
        );
        assert_eq!(plan.watermark, date(2024, 1, 22));
    }

    #[test]
    fn test_daily_gap_back_fill() {
        let today = date(2024, 3, 10);
        let plan = plan_catch_up(date(2024, 3, 7), Some(Frequency::Daily), today);
        assert_eq!(
            plan.due_dates,
            vec![date(2024, 3, 8), date(2024, 3, 9), date(2024, 3, 10)]
        );
        assert_eq!(plan.watermark, today);
    }

    #[test]
    fn test_no_premature_emission() {
        let plan = plan_catch_up(date(2024, 1, 15), Some(Frequency::Monthly), date(2024, 2, 14));
        assert!(plan.is_empty());
        assert_eq!(plan.watermark, date(2024, 1, 15));
    }

    #[test]
    fn test_watermark_is_never_emitted() {
        let plan = plan_catch_up(date(2024, 1, 15), Some(Frequency::Daily), date(2024, 1, 15));
        assert!(plan.is_empty());

        let plan = plan_catch_up(date(2024, 1, 15), Some(Frequency::Daily), date(2024, 1, 16));
        assert_eq!(plan.due_dates, vec![date(2024, 1, 16)]);
    }

    #[test]
    fn test_month_end_anchor() {
        let plan = plan_catch_up(date(2024, 1, 31), Some(Frequency::Monthly), date(2024, 3, 31));
        // The clamped day becomes the new watermark, so later steps follow it.
        assert_eq!(plan.due_dates, vec![date(2024, 2, 29), date(2024, 3, 29)]);

        let plan = plan_catch_up(date(2023, 1, 31), Some(Frequency::Monthly), date(2023, 2, 28));
        assert_eq!(plan.due_dates, vec![date(2023, 2, 28)]);
    }

    #[test]
    fn test_inert_frequency_terminates() {
        let plan = plan_catch_up(date(2020, 1, 1), None, date(2024, 1, 1));
        assert!(plan.is_empty());
        assert_eq!(plan.watermark, date(2020, 1, 1));
    }

    #[test]
    fn test_end_of_calendar_terminates() {
        let plan = plan_catch_up(NaiveDate::MAX, Some(Frequency::Daily), NaiveDate::MAX);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_today_before_watermark() {
        let plan = plan_catch_up(date(2024, 6, 1), Some(Frequency::Daily), date(2024, 5, 1));
        assert!(plan.is_empty());
    }
}
