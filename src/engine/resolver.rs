//! Resolution of the single availability source for an `(owner, date)`
//! pair.
//!
//! Precedence, first match terminal: block exception > override exception >
//! active date-specific rules > active weekly rules > unavailable.

use chrono::{NaiveDate, NaiveTime};
use ulid::Ulid;

use crate::model::{AvailabilityRule, BookingPolicy, ExceptionKind, TimeInterval};
use crate::store::{ExceptionStore, RuleStore};
use crate::timemath;

/// The one source governing a day's availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySource {
    /// A block exception closes the whole day.
    Blocked,
    /// An override exception replaces every rule for the day.
    Override {
        start_time: NaiveTime,
        end_time: NaiveTime,
        slot_duration_minutes: i64,
    },
    /// Active rules pinned to this exact date.
    DateSpecific(Vec<AvailabilityRule>),
    /// Active recurring rules for this weekday.
    Weekly(Vec<AvailabilityRule>),
    /// Nothing applies; the day has no bookable time.
    Unavailable,
}

/// A resolved source applied to a concrete date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    /// Raw rule intervals, not yet merged.
    pub intervals: Vec<TimeInterval>,
    pub slot_duration_minutes: i64,
    pub policy: BookingPolicy,
}

impl DaySource {
    /// Project the source onto `date`. `None` means the day is closed.
    ///
    /// Rules sharing a date are expected to share a slot duration; on
    /// divergence the first rule's value wins.
    pub fn into_plan(self, date: NaiveDate) -> Option<DayPlan> {
        match self {
            DaySource::Blocked | DaySource::Unavailable => None,
            DaySource::Override {
                start_time,
                end_time,
                slot_duration_minutes,
            } => Some(DayPlan {
                intervals: vec![TimeInterval::new(
                    timemath::at(date, start_time),
                    timemath::at(date, end_time),
                )],
                slot_duration_minutes,
                policy: BookingPolicy::default(),
            }),
            DaySource::DateSpecific(rules) | DaySource::Weekly(rules) => Some(DayPlan {
                intervals: rules.iter().map(|r| r.interval_on(date)).collect(),
                slot_duration_minutes: rules[0].slot_duration_minutes,
                policy: rules[0].policy,
            }),
        }
    }
}

/// Resolve the availability source for one owner and date.
///
/// Inactive rules are dropped before the existence check: a date whose
/// specific rules are all inactive falls through to the weekly level, and
/// a weekday whose rules are all inactive falls through to `Unavailable`.
pub async fn resolve(
    rules: &dyn RuleStore,
    exceptions: &dyn ExceptionStore,
    owner_id: Ulid,
    date: NaiveDate,
) -> DaySource {
    if let Some(exception) = exceptions.find_by_owner_and_date(owner_id, date).await {
        match exception.kind {
            ExceptionKind::Block => return DaySource::Blocked,
            ExceptionKind::Override {
                start_time,
                end_time,
                slot_duration_minutes,
            } => {
                return DaySource::Override {
                    start_time,
                    end_time,
                    slot_duration_minutes,
                };
            }
        }
    }

    let specific: Vec<AvailabilityRule> = rules
        .find_by_owner_and_date(owner_id, date)
        .await
        .into_iter()
        .filter(|r| r.is_active)
        .collect();
    if !specific.is_empty() {
        return DaySource::DateSpecific(specific);
    }

    let weekly: Vec<AvailabilityRule> = rules
        .find_by_owner_and_weekday(owner_id, timemath::weekday(date))
        .await
        .into_iter()
        .filter(|r| r.is_active)
        .collect();
    if !weekly.is_empty() {
        return DaySource::Weekly(weekly);
    }

    DaySource::Unavailable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AvailabilityException, RuleSchedule};
    use crate::store::{InMemoryExceptionStore, InMemoryRuleStore};
    use crate::timemath::{parse_date, parse_time};

    fn weekly(owner: Ulid, weekday: u8, active: bool, slot: i64) -> AvailabilityRule {
        AvailabilityRule {
            id: Ulid::new(),
            owner_id: owner,
            schedule: RuleSchedule::Weekly { weekday },
            start_time: parse_time("09:00").unwrap(),
            end_time: parse_time("17:00").unwrap(),
            slot_duration_minutes: slot,
            is_active: active,
            policy: BookingPolicy::default(),
        }
    }

    fn dated(owner: Ulid, date: NaiveDate, active: bool, slot: i64) -> AvailabilityRule {
        AvailabilityRule {
            id: Ulid::new(),
            owner_id: owner,
            schedule: RuleSchedule::SpecificDate { date },
            start_time: parse_time("10:00").unwrap(),
            end_time: parse_time("14:00").unwrap(),
            slot_duration_minutes: slot,
            is_active: active,
            policy: BookingPolicy::default(),
        }
    }

    // 2026-03-02 is a Monday.
    fn monday() -> NaiveDate {
        parse_date("2026-03-02").unwrap()
    }

    #[tokio::test]
    async fn block_exception_wins_over_everything() {
        let owner = Ulid::new();
        let rules = InMemoryRuleStore::new();
        let exceptions = InMemoryExceptionStore::new();
        rules.insert(weekly(owner, 1, true, 60));
        rules.insert(dated(owner, monday(), true, 60));
        exceptions.upsert(AvailabilityException {
            id: Ulid::new(),
            owner_id: owner,
            date: monday(),
            kind: ExceptionKind::Block,
            reason: Some("holiday".into()),
        });

        let source = resolve(&rules, &exceptions, owner, monday()).await;
        assert_eq!(source, DaySource::Blocked);
        assert_eq!(source.into_plan(monday()), None);
    }

    #[tokio::test]
    async fn override_exception_replaces_rules() {
        let owner = Ulid::new();
        let rules = InMemoryRuleStore::new();
        let exceptions = InMemoryExceptionStore::new();
        rules.insert(weekly(owner, 1, true, 60));
        exceptions.upsert(AvailabilityException {
            id: Ulid::new(),
            owner_id: owner,
            date: monday(),
            kind: ExceptionKind::Override {
                start_time: parse_time("08:00").unwrap(),
                end_time: parse_time("12:00").unwrap(),
                slot_duration_minutes: 30,
            },
            reason: None,
        });

        let plan = resolve(&rules, &exceptions, owner, monday())
            .await
            .into_plan(monday())
            .unwrap();
        assert_eq!(plan.slot_duration_minutes, 30);
        assert_eq!(plan.intervals.len(), 1);
        assert_eq!(timemath::extract_time(plan.intervals[0].start), "08:00");
        assert_eq!(timemath::extract_time(plan.intervals[0].end), "12:00");
    }

    #[tokio::test]
    async fn date_specific_beats_weekly() {
        let owner = Ulid::new();
        let rules = InMemoryRuleStore::new();
        let exceptions = InMemoryExceptionStore::new();
        rules.insert(weekly(owner, 1, true, 60));
        rules.insert(dated(owner, monday(), true, 45));

        let source = resolve(&rules, &exceptions, owner, monday()).await;
        assert!(matches!(source, DaySource::DateSpecific(_)));
        let plan = source.into_plan(monday()).unwrap();
        assert_eq!(plan.slot_duration_minutes, 45);
    }

    #[tokio::test]
    async fn inactive_date_rules_fall_through_to_weekly() {
        let owner = Ulid::new();
        let rules = InMemoryRuleStore::new();
        let exceptions = InMemoryExceptionStore::new();
        rules.insert(dated(owner, monday(), false, 45));
        rules.insert(weekly(owner, 1, true, 60));

        let source = resolve(&rules, &exceptions, owner, monday()).await;
        assert!(matches!(source, DaySource::Weekly(_)));
    }

    #[tokio::test]
    async fn all_inactive_resolves_unavailable() {
        let owner = Ulid::new();
        let rules = InMemoryRuleStore::new();
        let exceptions = InMemoryExceptionStore::new();
        rules.insert(dated(owner, monday(), false, 45));
        rules.insert(weekly(owner, 1, false, 60));

        let source = resolve(&rules, &exceptions, owner, monday()).await;
        assert_eq!(source, DaySource::Unavailable);
    }

    #[tokio::test]
    async fn no_rules_resolves_unavailable() {
        let owner = Ulid::new();
        let rules = InMemoryRuleStore::new();
        let exceptions = InMemoryExceptionStore::new();
        let source = resolve(&rules, &exceptions, owner, monday()).await;
        assert_eq!(source, DaySource::Unavailable);
    }

    #[tokio::test]
    async fn first_rule_slot_duration_wins() {
        let owner = Ulid::new();
        let rules = InMemoryRuleStore::new();
        let exceptions = InMemoryExceptionStore::new();
        let mut first = dated(owner, monday(), true, 30);
        first.id = Ulid::nil(); // sorts ahead of any generated id
        rules.insert(first);
        rules.insert(dated(owner, monday(), true, 90));

        let plan = resolve(&rules, &exceptions, owner, monday())
            .await
            .into_plan(monday())
            .unwrap();
        assert_eq!(plan.slot_duration_minutes, 30);
    }
}
