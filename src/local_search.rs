//! Hill climbing with a first-improvement policy.
//!
//! The neighbourhood of a timetable is every relocation of one assigned event
//! to another feasible (period, room) pair. Events are visited in index order
//! and candidate slots in increasing (period, room) order; the first move that
//! strictly lowers the score is committed and the scan starts over from event
//! zero. Equal or worse moves are never taken, so the search stops in the first
//! local optimum it reaches.

use crate::config::SolverConfig;
use crate::data::{Instance, SearchStatus, Solution};
use crate::feasibility::Timetable;
use crate::objective::score;
use log::{debug, trace};

/// Result of one optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub solution: Solution,
    pub score: f64,
    /// Number of accepted moves.
    pub improvements: usize,
    pub status: SearchStatus,
}

/// Improves a feasible `solution` until no single-event relocation helps or
/// `config.max_improvements` moves have been accepted.
pub fn optimize(solution: Solution, instance: &Instance, config: &SolverConfig) -> SearchOutcome {
    HillClimber::new(instance, config, solution).run()
}

struct HillClimber<'a> {
    timetable: Timetable<'a>,
    current: f64,
    improvements: usize,
}

impl<'a> HillClimber<'a> {
    fn new(instance: &'a Instance, config: &'a SolverConfig, solution: Solution) -> Self {
        let current = score(&solution, instance, config);
        Self {
            timetable: Timetable::from_solution(instance, config, solution),
            current,
            improvements: 0,
        }
    }

    fn run(mut self) -> SearchOutcome {
        let initial = self.current;
        let budget = self.timetable.config().max_improvements;

        let status = loop {
            if self.improvements >= budget {
                break SearchStatus::BudgetExhausted;
            }
            if !self.improve_once() {
                break SearchStatus::LocallyOptimal;
            }
        };

        debug!(
            "Local search went from {} to {} with {} moves ({:?})",
            initial, self.current, self.improvements, status
        );
        SearchOutcome {
            solution: self.timetable.into_solution(),
            score: self.current,
            improvements: self.improvements,
            status,
        }
    }

    /// Scans events in index order and commits the first strictly improving
    /// relocation. Returns false when a full pass finds none, in which case the
    /// timetable is left exactly as it was.
    fn improve_once(&mut self) -> bool {
        let instance = self.timetable.instance();
        let config = self.timetable.config();

        for event in 0..instance.num_events() {
            let Some(origin) = self.timetable.unassign(event) else {
                continue;
            };

            for slot in self.timetable.slots() {
                if slot == origin || !self.timetable.is_feasible(event, slot) {
                    continue;
                }
                self.timetable.assign(event, slot);
                let candidate = score(self.timetable.solution(), instance, config);
                if candidate < self.current {
                    trace!(
                        "Moved event {} from {:?} to {:?}: {} -> {}",
                        event, origin, slot, self.current, candidate
                    );
                    self.current = candidate;
                    self.improvements += 1;
                    return true;
                }
                self.timetable.unassign(event);
            }

            self.timetable.assign(event, origin);
        }

        false
    }
}
