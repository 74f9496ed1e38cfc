//! Soft-constraint evaluation.
//!
//! Every student's week is reduced to the sorted list of periods of their
//! assigned events, and three kinds of violations are counted on it:
//! - a day with exactly one event,
//! - three strictly consecutive period numbers (over the whole week, so a run
//!   may cross a day boundary),
//! - an event in the last period of a day.
//!
//! Unassigned events contribute nothing to a student's week. They are only
//! penalised when [`SolverConfig::penalize_unassigned`] is set.

use crate::config::SolverConfig;
use crate::data::{Instance, Period, ScoreBreakdown, Solution, StudentId, UnmetSoftConstraint};
use itertools::Itertools;

/// Weighted penalty of `solution`; lower is better and zero is perfect.
pub fn score(solution: &Solution, instance: &Instance, config: &SolverConfig) -> f64 {
    evaluate(solution, instance, config).total
}

/// Per-kind violation counts along with the weighted total.
pub fn evaluate(solution: &Solution, instance: &Instance, config: &SolverConfig) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    for student in 0..instance.num_students() {
        let week = student_week(solution, instance, student);
        if week.is_empty() {
            continue;
        }
        breakdown.single_event_days += single_event_days(&week, config).len() as u64;
        breakdown.consecutive_runs += consecutive_runs(&week).len() as u64;
        breakdown.last_slots += last_slots(&week, config).len() as u64;
    }
    breakdown.unassigned_events = solution.unassigned_count() as u64;

    let weights = &config.weights;
    breakdown.total = weights.single_event_day * breakdown.single_event_days as f64
        + weights.consecutive_run * breakdown.consecutive_runs as f64
        + weights.last_slot * breakdown.last_slots as f64;
    if config.penalize_unassigned {
        breakdown.total += weights.unassigned_event * breakdown.unassigned_events as f64;
    }
    breakdown
}

/// Human-readable list of every soft-constraint violation in `solution`.
pub fn unmet_soft_constraints(
    solution: &Solution,
    instance: &Instance,
    config: &SolverConfig,
) -> Vec<UnmetSoftConstraint> {
    let mut unmet = Vec::new();

    for student in 0..instance.num_students() {
        let week = student_week(solution, instance, student);
        for (day, period) in single_event_days(&week, config) {
            unmet.push(UnmetSoftConstraint {
                constraint_type: "Single Event Day".to_string(),
                description: format!(
                    "Student {} has only one event on day {} (period {}).",
                    student, day, period
                ),
            });
        }
        for first in consecutive_runs(&week) {
            unmet.push(UnmetSoftConstraint {
                constraint_type: "Three Consecutive Events".to_string(),
                description: format!(
                    "Student {} has events in periods {}, {} and {} back to back.",
                    student,
                    first,
                    first + 1,
                    first + 2
                ),
            });
        }
        for period in last_slots(&week, config) {
            unmet.push(UnmetSoftConstraint {
                constraint_type: "Last Slot Of Day".to_string(),
                description: format!(
                    "Student {} has an event in period {}, the last period of day {}.",
                    student,
                    period,
                    config.day_of(period)
                ),
            });
        }
    }

    if config.penalize_unassigned {
        for event in solution.unassigned_events() {
            unmet.push(UnmetSoftConstraint {
                constraint_type: "Unassigned Event".to_string(),
                description: format!("Event {} could not be placed in any room and period.", event),
            });
        }
    }

    unmet
}

/// Sorted periods of the student's assigned events.
fn student_week(solution: &Solution, instance: &Instance, student: StudentId) -> Vec<Period> {
    instance
        .events_of(student)
        .iter()
        .filter_map(|&event| solution.get(event).map(|slot| slot.period))
        .sorted_unstable()
        .collect()
}

/// (day, period) for each day holding exactly one of the week's periods.
fn single_event_days(week: &[Period], config: &SolverConfig) -> Vec<(usize, Period)> {
    week.iter()
        .chunk_by(|&&period| config.day_of(period))
        .into_iter()
        .filter_map(|(day, periods)| periods.exactly_one().ok().map(|&period| (day, period)))
        .collect()
}

/// First period of every window of three consecutive period numbers.
fn consecutive_runs(week: &[Period]) -> Vec<Period> {
    week.iter()
        .tuple_windows()
        .filter(|&(first, second, third)| *second == first + 1 && *third == first + 2)
        .map(|(first, _, _)| *first)
        .collect()
}

fn last_slots(week: &[Period], config: &SolverConfig) -> Vec<Period> {
    week.iter()
        .copied()
        .filter(|&period| config.is_last_slot(period))
        .collect()
}
