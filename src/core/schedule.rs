//! View automation scheduling.
//!
//! Each cadence derives three things from "today": the period token used in
//! the view name, the window start and the window end. All three live in
//! [`Cadence`] so that one cadence's rules can be read side by side. Nothing
//! here reads the clock; callers pass `today` and `now` in.

use crate::{
    entities::{view, view_automation},
    errors::{Error, Result},
};
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::debug;

/// Recurrence rule for automatically generated views.
///
/// The discriminants are the stored values and also the processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// One view per calendar day
    Daily = 0,
    /// One view per week, weeks start on Monday
    Weekly = 1,
    /// One view per calendar month
    Monthly = 2,
    /// One view per calendar quarter
    Quarterly = 3,
    /// One view per calendar year
    Yearly = 4,
}

impl Cadence {
    /// All cadences in processing order.
    pub const ALL: [Self; 5] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Quarterly,
        Self::Yearly,
    ];

    /// The stored value of this cadence.
    #[must_use]
    pub const fn index(self) -> i32 {
        self as i32
    }

    /// Period token used after the colon in generated view names.
    ///
    /// The quarterly token divides the zero-based month by 4, so May is
    /// `Quarter #1` and December is `Quarter #2`. Existing view names depend
    /// on this exact string; the window itself uses calendar quarters.
    #[must_use]
    pub fn period_token(self, today: NaiveDate) -> String {
        match self {
            Self::Daily => today.format("%y%m%d").to_string(),
            Self::Weekly => format!("({}) Week #{}", today.year(), week_of_year(today)),
            Self::Monthly => today.format("%y%m").to_string(),
            Self::Quarterly => format!("({}) Quarter #{}", today.year(), today.month0() / 4),
            Self::Yearly => today.format("%Y").to_string(),
        }
    }

    /// First day of the period containing `today`.
    #[must_use]
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => today,
            Self::Weekly => {
                today - Days::new(u64::from(today.weekday().num_days_from_monday()))
            }
            Self::Monthly => first_of_month(today),
            Self::Quarterly => first_of_month(today) - Months::new(today.month0() % 3),
            Self::Yearly => today - Days::new(u64::from(today.ordinal0())),
        }
    }

    /// First day after the period containing `today`.
    #[must_use]
    pub fn end(self, today: NaiveDate) -> NaiveDate {
        let start = self.start(today);
        match self {
            Self::Daily => start + Days::new(1),
            Self::Weekly => start + Days::new(7),
            Self::Monthly => start + Months::new(1),
            Self::Quarterly => start + Months::new(3),
            Self::Yearly => start + Months::new(12),
        }
    }

    /// Canonical name of the view generated for `template_name` on `today`.
    #[must_use]
    pub fn view_name(self, template_name: &str, today: NaiveDate) -> String {
        format!("{template_name}:{}", self.period_token(today))
    }
}

impl TryFrom<i32> for Cadence {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|cadence| cadence.index() == value)
            .ok_or(Error::InvalidCadence { value })
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

/// Week number where week 1 contains January 1 and weeks start on Monday.
#[must_use]
pub fn week_of_year(date: NaiveDate) -> u32 {
    let jan_first = date - Days::new(u64::from(date.ordinal0()));
    let offset = jan_first.weekday().num_days_from_monday();
    (date.ordinal0() + offset) / 7 + 1
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// An enabled automation rule with a known cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationRule {
    /// Template to materialize views for
    pub template_name: String,
    /// How often
    pub cadence: Cadence,
}

impl AutomationRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(template_name: impl Into<String>, cadence: Cadence) -> Self {
        Self {
            template_name: template_name.into(),
            cadence,
        }
    }
}

impl TryFrom<view_automation::Model> for AutomationRule {
    type Error = Error;

    fn try_from(model: view_automation::Model) -> Result<Self> {
        Ok(Self {
            cadence: Cadence::try_from(model.cadence)?,
            template_name: model.template_name,
        })
    }
}

/// A view an automation wants to exist, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedView {
    /// Canonical view name
    pub name: String,
    /// Template the view reports on
    pub template_name: String,
    /// Inclusive window start (midnight)
    pub start_time: NaiveDateTime,
    /// Exclusive window end (midnight)
    pub end_time: NaiveDateTime,
    /// Creation timestamp
    pub create_time: NaiveDateTime,
}

impl PlannedView {
    /// Converts into an insertable active model.
    #[must_use]
    pub fn into_active_model(self) -> view::ActiveModel {
        view::ActiveModel {
            name: Set(self.name),
            template_name: Set(self.template_name),
            start_time: Set(self.start_time),
            end_time: Set(self.end_time),
            create_time: Set(self.create_time),
        }
    }
}

/// Plans the current period's view for `rule`, unless its name already exists.
#[must_use]
pub fn check_out(
    rule: &AutomationRule,
    existing_view_names: &HashSet<String>,
    today: NaiveDate,
    now: NaiveDateTime,
) -> Option<PlannedView> {
    let name = rule.cadence.view_name(&rule.template_name, today);
    if existing_view_names.contains(&name) {
        return None;
    }

    Some(PlannedView {
        name,
        template_name: rule.template_name.clone(),
        start_time: midnight(rule.cadence.start(today)),
        end_time: midnight(rule.cadence.end(today)),
        create_time: now,
    })
}

/// Plans every missing view for `rules`, cadence group by cadence group.
///
/// Groups run from daily to yearly. When a weekly group exists and plans
/// nothing, the coarser groups are skipped for this pass. That shortcut can
/// leave a due monthly, quarterly or yearly view missing until a later pass
/// in which some weekly view is created.
#[must_use]
pub fn reconcile_all(
    rules: &[AutomationRule],
    existing_view_names: &HashSet<String>,
    today: NaiveDate,
    now: NaiveDateTime,
) -> Vec<PlannedView> {
    let mut groups: BTreeMap<Cadence, Vec<&AutomationRule>> = BTreeMap::new();
    for rule in rules {
        groups.entry(rule.cadence).or_default().push(rule);
    }

    let mut known = existing_view_names.clone();
    let mut planned = Vec::new();

    for (cadence, group) in groups {
        let before = planned.len();
        for rule in group {
            if let Some(view) = check_out(rule, &known, today, now) {
                known.insert(view.name.clone());
                planned.push(view);
            }
        }

        if cadence == Cadence::Weekly && planned.len() == before {
            debug!("No new weekly views, skipping coarser cadences");
            break;
        }
    }

    planned
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(2024, 5, 15).and_hms_opt(12, 34, 56).unwrap()
    }

    fn names(views: &[PlannedView]) -> Vec<&str> {
        views.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_daily_window_and_name() {
        let today = date(2024, 2, 29);
        assert_eq!(Cadence::Daily.view_name("Food", today), "Food:240229");
        assert_eq!(Cadence::Daily.start(today), today);
        assert_eq!(Cadence::Daily.end(today), date(2024, 3, 1));
    }

    #[test]
    fn test_weekly_starts_on_monday() {
        // 2024-02-15 is a Thursday
        let today = date(2024, 2, 15);
        assert_eq!(Cadence::Weekly.start(today), date(2024, 2, 12));
        assert_eq!(Cadence::Weekly.end(today), date(2024, 2, 19));
        assert_eq!(Cadence::Weekly.view_name("Food", today), "Food:(2024) Week #7");

        let monday = date(2024, 2, 12);
        assert_eq!(Cadence::Weekly.start(monday), monday);
    }

    #[test]
    fn test_week_of_year_first_day_rule() {
        // 2025-01-01 is a Wednesday; week 2 starts on Monday 2025-01-06
        assert_eq!(week_of_year(date(2025, 1, 1)), 1);
        assert_eq!(week_of_year(date(2025, 1, 5)), 1);
        assert_eq!(week_of_year(date(2025, 1, 6)), 2);
        // 2024-01-01 is a Monday
        assert_eq!(week_of_year(date(2024, 1, 7)), 1);
        assert_eq!(week_of_year(date(2024, 1, 8)), 2);
        assert_eq!(week_of_year(date(2024, 12, 31)), 53);
    }

    #[test]
    fn test_weekly_window_crosses_year() {
        // 2025-01-01 is a Wednesday
        let today = date(2025, 1, 1);
        assert_eq!(Cadence::Weekly.start(today), date(2024, 12, 30));
        assert_eq!(Cadence::Weekly.end(today), date(2025, 1, 6));
    }

    #[test]
    fn test_monthly_window_and_name() {
        let today = date(2024, 12, 31);
        assert_eq!(Cadence::Monthly.view_name("Food", today), "Food:2412");
        assert_eq!(Cadence::Monthly.start(today), date(2024, 12, 1));
        assert_eq!(Cadence::Monthly.end(today), date(2025, 1, 1));
    }

    #[test]
    fn test_quarterly_in_may() {
        let today = date(2024, 5, 20);
        assert_eq!(Cadence::Quarterly.start(today), date(2024, 4, 1));
        assert_eq!(Cadence::Quarterly.end(today), date(2024, 7, 1));
        assert_eq!(
            Cadence::Quarterly.view_name("Food", today),
            "Food:(2024) Quarter #1"
        );
    }

    #[test]
    fn test_quarterly_token_divides_by_four() {
        let tokens: Vec<String> = (1..=12)
            .map(|m| Cadence::Quarterly.period_token(date(2023, m, 1)))
            .collect();
        assert_eq!(tokens[0], "(2023) Quarter #0");
        assert_eq!(tokens[3], "(2023) Quarter #0");
        assert_eq!(tokens[4], "(2023) Quarter #1");
        assert_eq!(tokens[8], "(2023) Quarter #2");
        assert_eq!(tokens[11], "(2023) Quarter #2");
    }

    #[test]
    fn test_quarterly_windows_follow_calendar_quarters() {
        assert_eq!(Cadence::Quarterly.start(date(2023, 3, 31)), date(2023, 1, 1));
        assert_eq!(Cadence::Quarterly.start(date(2023, 4, 1)), date(2023, 4, 1));
        assert_eq!(Cadence::Quarterly.start(date(2023, 9, 30)), date(2023, 7, 1));
        assert_eq!(Cadence::Quarterly.start(date(2023, 11, 15)), date(2023, 10, 1));
        assert_eq!(Cadence::Quarterly.end(date(2023, 11, 15)), date(2024, 1, 1));
    }

    #[test]
    fn test_yearly_window_and_name() {
        let today = date(2024, 7, 4);
        assert_eq!(Cadence::Yearly.view_name("Food", today), "Food:2024");
        assert_eq!(Cadence::Yearly.start(today), date(2024, 1, 1));
        assert_eq!(Cadence::Yearly.end(today), date(2025, 1, 1));
    }

    #[test]
    fn test_every_window_is_non_empty_and_contains_today() {
        let mut day = date(2023, 1, 1);
        while day < date(2025, 1, 1) {
            for cadence in Cadence::ALL {
                let start = cadence.start(day);
                let end = cadence.end(day);
                assert!(start <= day && day < end, "{cadence} on {day}");
            }
            day = day + Days::new(1);
        }
    }

    #[test]
    fn test_cadence_from_stored_value() {
        assert_eq!(Cadence::try_from(3).unwrap(), Cadence::Quarterly);
        assert!(matches!(
            Cadence::try_from(999),
            Err(Error::InvalidCadence { value: 999 })
        ));
    }

    #[test]
    fn test_check_out_is_idempotent() {
        let rule = AutomationRule::new("Food", Cadence::Daily);
        let today = date(2024, 5, 15);
        let mut existing = HashSet::new();

        let first = check_out(&rule, &existing, today, now()).unwrap();
        assert_eq!(first.name, "Food:240515");
        assert_eq!(first.create_time, now());
        existing.insert(first.name);

        assert!(check_out(&rule, &existing, today, now()).is_none());
    }

    #[test]
    fn test_reconcile_all_creates_every_cadence() {
        let rules: Vec<_> = Cadence::ALL
            .into_iter()
            .rev()
            .map(|c| AutomationRule::new("Food", c))
            .collect();

        let planned = reconcile_all(&rules, &HashSet::new(), date(2024, 5, 15), now());

        assert_eq!(
            names(&planned),
            vec![
                "Food:240515",
                "Food:(2024) Week #20",
                "Food:2405",
                "Food:(2024) Quarter #1",
                "Food:2024",
            ]
        );
    }

    #[test]
    fn test_reconcile_all_weekly_short_circuit() {
        let today = date(2024, 5, 15);
        let rules = vec![
            AutomationRule::new("Food", Cadence::Weekly),
            AutomationRule::new("Food", Cadence::Monthly),
            AutomationRule::new("Food", Cadence::Yearly),
        ];
        let existing = HashSet::from([Cadence::Weekly.view_name("Food", today)]);

        let planned = reconcile_all(&rules, &existing, today, now());

        assert!(planned.is_empty());
    }

    #[test]
    fn test_reconcile_all_without_weekly_group_runs_coarser_groups() {
        let today = date(2024, 5, 15);
        let rules = vec![
            AutomationRule::new("Food", Cadence::Daily),
            AutomationRule::new("Food", Cadence::Monthly),
        ];
        let existing = HashSet::from([Cadence::Daily.view_name("Food", today)]);

        let planned = reconcile_all(&rules, &existing, today, now());

        assert_eq!(names(&planned), vec!["Food:2405"]);
    }

    #[test]
    fn test_reconcile_all_second_pass_is_empty() {
        let today = date(2024, 5, 15);
        let rules = vec![
            AutomationRule::new("Food", Cadence::Daily),
            AutomationRule::new("Rent", Cadence::Daily),
            AutomationRule::new("Food", Cadence::Monthly),
        ];

        let first = reconcile_all(&rules, &HashSet::new(), today, now());
        assert_eq!(first.len(), 3);

        let existing: HashSet<String> = first.into_iter().map(|v| v.name).collect();
        assert!(reconcile_all(&rules, &existing, today, now()).is_empty());
    }
}
