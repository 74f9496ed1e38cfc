use crate::config::SolverConfig;
use crate::data::{Assignment, Instance, SchedulingOutput, Solution, entry_count};
use crate::error::SolveError;
use crate::greedy::{EventOrder, construct};
use crate::local_search::{SearchOutcome, optimize};
use crate::objective::{evaluate, unmet_soft_constraints};
use crate::validation::validate;
use log::{debug, info};
use std::time::Instant;

/// A finished timetable together with its report.
#[derive(Debug, Clone)]
pub struct Solved {
    pub solution: Solution,
    pub output: SchedulingOutput,
}

/// Solves the timetabling problem with greedy construction followed by
/// first-improvement hill climbing.
///
/// The first run visits events in index order; each of the `config.restarts`
/// extra runs starts from a shuffled order seeded with `config.seed + i`
/// for the i-th restart.
/// The run with the fewest unassigned events wins, then the lowest score, then
/// the earliest run.
pub fn solve(instance: &Instance, config: &SolverConfig) -> Result<Solved, SolveError> {
    config.validate()?;
    entry_count("room occupancy", instance.num_rooms(), config.num_periods())?;
    entry_count("student occupancy", instance.num_students(), config.num_periods())?;
    let start_time = Instant::now();
    info!(
        "Solving timetable with {} events, {} rooms, {} students and {} periods...",
        instance.num_events(),
        instance.num_rooms(),
        instance.num_students(),
        config.num_periods()
    );

    let mut best = run(instance, EventOrder::Identity, config);
    for restart in 1..=config.restarts {
        let order = EventOrder::Shuffled {
            seed: config.seed.wrapping_add(restart as u64),
        };
        let outcome = run(instance, order, config);
        if rank(&outcome) < rank(&best) {
            best = outcome;
        }
    }

    debug_assert_eq!(validate(&best.solution, instance, config), Ok(()));
    let duration = start_time.elapsed();
    info!("Solution found in {:.2?}", duration);

    let breakdown = evaluate(&best.solution, instance, config);
    let unassigned_events: Vec<_> = best.solution.unassigned_events().collect();
    if !unassigned_events.is_empty() {
        info!("{} event(s) could not be placed", unassigned_events.len());
    }
    info!(
        "Score {} ({} single-event days, {} consecutive runs, {} last slots)",
        breakdown.total, breakdown.single_event_days, breakdown.consecutive_runs, breakdown.last_slots
    );

    // build the final output
    let assignments = best
        .solution
        .assigned()
        .map(|(event_id, slot)| Assignment {
            event_id,
            period: slot.period,
            room_id: slot.room,
        })
        .collect();
    let output = SchedulingOutput {
        assignments,
        unassigned_events,
        score: breakdown,
        status: best.status,
        improvements: best.improvements,
        unmet_soft_constraints: unmet_soft_constraints(&best.solution, instance, config),
    };

    Ok(Solved {
        solution: best.solution,
        output,
    })
}

fn run(instance: &Instance, order: EventOrder, config: &SolverConfig) -> SearchOutcome {
    let construction = construct(instance, order, config);
    let outcome = optimize(construction.solution, instance, config);
    debug!(
        "Run {:?}: {} unassigned, score {} after {} moves",
        order, construction.unassigned_count, outcome.score, outcome.improvements
    );
    outcome
}

fn rank(outcome: &SearchOutcome) -> (usize, f64) {
    (outcome.solution.unassigned_count(), outcome.score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SearchStatus, Slot, fixtures};
    use crate::error::InstanceError;
    use crate::objective::score;
    use crate::testing::random_instance;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_single_event() {
        let instance = fixtures::instance(&[1], &[&[1]], &[&[]], &[&[]]);
        let solved = solve(&instance, &SolverConfig::default()).unwrap();
        assert_eq!(solved.solution.get(0), Some(Slot::new(0, 0)));
        // a lone event always makes a single-event day
        assert_eq!(solved.output.score.single_event_days, 1);
        assert_eq!(solved.output.score.consecutive_runs, 0);
        assert_eq!(solved.output.score.last_slots, 0);
        assert_eq!(solved.output.status, SearchStatus::LocallyOptimal);
        assert_eq!(
            solved.output.assignments,
            vec![Assignment {
                event_id: 0,
                period: 0,
                room_id: 0
            }]
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let instance = fixtures::instance(&[1], &[&[1]], &[&[]], &[&[]]);
        let config = SolverConfig {
            days: 0,
            ..SolverConfig::default()
        };
        assert!(matches!(solve(&instance, &config), Err(SolveError::Config(_))));
    }

    #[test]
    fn test_rejects_oversized_occupancy() {
        let capacities = vec![1; 2_000];
        let rooms: Vec<&[u8]> = vec![&[]; 2_000];
        let instance = fixtures::instance(&capacities, &[&[1]], &rooms, &[&[]]);
        let config = SolverConfig {
            days: 100,
            periods_per_day: 100,
            ..SolverConfig::default()
        };
        assert!(matches!(
            solve(&instance, &config),
            Err(SolveError::Instance(InstanceError::DimensionOverflow {
                what: "room occupancy",
                ..
            }))
        ));
    }

    #[test]
    fn test_reports_unassigned_events() {
        let instance = fixtures::instance(&[1], &[&[1, 0], &[1, 1]], &[&[]], &[&[], &[]]);
        let solved = solve(&instance, &SolverConfig::default()).unwrap();
        assert_eq!(solved.output.unassigned_events, vec![0]);
        assert_eq!(solved.output.score.unassigned_events, 1);
        assert_eq!(solved.output.assignments.len(), 1);
    }

    #[test]
    fn test_restarts_never_lose_to_first_run() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        for seed in 0..10 {
            let instance = random_instance(&mut rng);
            let base = SolverConfig {
                days: 2,
                periods_per_day: 3,
                seed,
                ..SolverConfig::default()
            };
            let single = solve(&instance, &base).unwrap();
            let multi = solve(
                &instance,
                &SolverConfig {
                    restarts: 4,
                    ..base.clone()
                },
            )
            .unwrap();

            let key = |solved: &Solved| (solved.solution.unassigned_count(), solved.output.score.total);
            assert!(key(&multi) <= key(&single));
            assert_eq!(multi.output.score.total, score(&multi.solution, &instance, &base));
            assert_eq!(validate(&multi.solution, &instance, &base), Ok(()));

            let repeat = solve(
                &instance,
                &SolverConfig {
                    restarts: 4,
                    ..base.clone()
                },
            )
            .unwrap();
            assert_eq!(repeat.solution, multi.solution);
        }
    }
}
