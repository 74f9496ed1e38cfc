use crate::config::SolverConfig;
use crate::data::{EventId, Instance, Solution};
use crate::feasibility::Timetable;
use log::{debug, trace};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Order in which the constructor visits events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrder {
    /// Event 0 first, then 1, 2, ...
    Identity,
    /// A uniformly shuffled permutation drawn from the given seed.
    Shuffled { seed: u64 },
}

impl EventOrder {
    pub fn permutation(&self, num_events: usize) -> Vec<EventId> {
        let mut events: Vec<EventId> = (0..num_events).collect();
        if let EventOrder::Shuffled { seed } = *self {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            events.shuffle(&mut rng);
        }
        events
    }
}

/// Result of greedy construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construction {
    pub solution: Solution,
    /// Events for which no feasible slot was left.
    pub unassigned_count: usize,
}

/// Places each event, in the given order, into the first feasible slot when
/// scanning periods and then rooms in increasing order.
///
/// Events with no feasible slot stay unassigned; the caller decides whether a
/// partial timetable is acceptable.
pub fn construct(instance: &Instance, order: EventOrder, config: &SolverConfig) -> Construction {
    let mut timetable = Timetable::empty(instance, config);

    for event in order.permutation(instance.num_events()) {
        let first_fit = timetable
            .slots()
            .find(|&slot| timetable.is_feasible(event, slot));
        match first_fit {
            Some(slot) => timetable.assign(event, slot),
            None => trace!("No feasible slot for event {}", event),
        }
    }

    let solution = timetable.into_solution();
    let unassigned_count = solution.unassigned_count();
    debug!(
        "Greedy construction ({:?}) placed {} of {} events",
        order,
        instance.num_events() - unassigned_count,
        instance.num_events()
    );
    Construction {
        solution,
        unassigned_count,
    }
}
