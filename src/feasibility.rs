//! Hard-constraint checking.
//!
//! [`is_feasible`] answers whether an event may be placed in a slot given the
//! current solution. It reads the [`Occupancy`] index instead of rescanning the
//! attendance matrix, so callers have to keep the index in step with the
//! solution; [`Timetable`] does that for them.

use crate::config::SolverConfig;
use crate::data::{EventId, Instance, Period, RoomId, Slot, Solution, StudentId};

/// Cache of which slots are taken and how busy each student is per period.
///
/// Derived entirely from a [`Solution`]; the solution stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    num_periods: usize,
    /// `room * num_periods + period` -> event holding the slot
    rooms: Vec<Option<EventId>>,
    /// `student * num_periods + period` -> number of the student's events in that period
    students: Vec<u32>,
}

impl Occupancy {
    pub fn new(instance: &Instance, config: &SolverConfig) -> Self {
        let num_periods = config.num_periods();
        Self {
            num_periods,
            rooms: vec![None; instance.num_rooms() * num_periods],
            students: vec![0; instance.num_students() * num_periods],
        }
    }

    /// Rebuilds the index from the assignments of `solution`.
    pub fn from_solution(instance: &Instance, solution: &Solution, config: &SolverConfig) -> Self {
        let mut occupancy = Self::new(instance, config);
        for (event, slot) in solution.assigned() {
            occupancy.place(instance, event, slot);
        }
        occupancy
    }

    pub fn occupant(&self, room: RoomId, period: Period) -> Option<EventId> {
        self.rooms[room * self.num_periods + period]
    }

    pub fn is_taken(&self, room: RoomId, period: Period) -> bool {
        self.occupant(room, period).is_some()
    }

    pub fn student_load(&self, student: StudentId, period: Period) -> u32 {
        self.students[student * self.num_periods + period]
    }

    pub fn place(&mut self, instance: &Instance, event: EventId, slot: Slot) {
        self.rooms[slot.room * self.num_periods + slot.period] = Some(event);
        for &student in instance.attendees(event) {
            self.students[student * self.num_periods + slot.period] += 1;
        }
    }

    pub fn vacate(&mut self, instance: &Instance, event: EventId, slot: Slot) {
        let cell = &mut self.rooms[slot.room * self.num_periods + slot.period];
        debug_assert_eq!(*cell, Some(event));
        *cell = None;
        for &student in instance.attendees(event) {
            self.students[student * self.num_periods + slot.period] -= 1;
        }
    }
}

/// Can `event` be placed at `slot` given the current solution?
///
/// Checks run cheapest first and stop at the first failure:
/// 1. the room is free in that period (or held by `event` itself),
/// 2. the room has every characteristic the event requires,
/// 3. the room holds all attendees,
/// 4. no attendee has another event in that period.
///
/// `occupancy` must describe `solution`.
pub fn is_feasible(
    instance: &Instance,
    solution: &Solution,
    occupancy: &Occupancy,
    event: EventId,
    slot: Slot,
) -> bool {
    if occupancy
        .occupant(slot.room, slot.period)
        .is_some_and(|other| other != event)
    {
        return false;
    }
    if !instance.room_suits(event, slot.room) {
        return false;
    }
    if !instance.room_fits(event, slot.room) {
        return false;
    }
    // the event's own placement in this period shows up in its attendees' loads
    let own = u32::from(solution.get(event).is_some_and(|s| s.period == slot.period));
    instance
        .attendees(event)
        .iter()
        .all(|&student| occupancy.student_load(student, slot.period) <= own)
}

/// A solution together with the occupancy index describing it.
///
/// All mutation goes through [`Timetable::assign`] and [`Timetable::unassign`]
/// so the two never drift apart.
#[derive(Debug, Clone)]
pub struct Timetable<'a> {
    instance: &'a Instance,
    config: &'a SolverConfig,
    solution: Solution,
    occupancy: Occupancy,
}

impl<'a> Timetable<'a> {
    pub fn empty(instance: &'a Instance, config: &'a SolverConfig) -> Self {
        Self::from_solution(instance, config, Solution::unassigned(instance.num_events()))
    }

    pub fn from_solution(instance: &'a Instance, config: &'a SolverConfig, solution: Solution) -> Self {
        let occupancy = Occupancy::from_solution(instance, &solution, config);
        Self {
            instance,
            config,
            solution,
            occupancy,
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn config(&self) -> &'a SolverConfig {
        self.config
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    pub fn into_solution(self) -> Solution {
        self.solution
    }

    pub fn is_feasible(&self, event: EventId, slot: Slot) -> bool {
        is_feasible(self.instance, &self.solution, &self.occupancy, event, slot)
    }

    /// Places `event` at `slot`, moving it if it was already assigned.
    /// Does not check feasibility.
    pub fn assign(&mut self, event: EventId, slot: Slot) {
        self.unassign(event);
        self.occupancy.place(self.instance, event, slot);
        self.solution.set(event, Some(slot));
    }

    /// Removes `event` from the timetable, returning where it was.
    pub fn unassign(&mut self, event: EventId) -> Option<Slot> {
        let previous = self.solution.get(event);
        if let Some(slot) = previous {
            self.occupancy.vacate(self.instance, event, slot);
            self.solution.set(event, None);
        }
        previous
    }

    /// Every (period, room) pair in increasing period, then room, order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + use<> {
        let num_rooms = self.instance.num_rooms();
        (0..self.config.num_periods())
            .flat_map(move |period| (0..num_rooms).map(move |room| Slot::new(period, room)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::testing::random_instance;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Same contract as `is_feasible`, evaluated straight from the matrices.
    fn is_feasible_by_scan(instance: &Instance, solution: &Solution, event: EventId, slot: Slot) -> bool {
        let taken = solution
            .assigned()
            .any(|(other, s)| other != event && s == slot);
        if taken {
            return false;
        }
        let suits = (0..instance.num_characteristics())
            .all(|c| !instance.event_requires(event, c) || instance.room_has(slot.room, c));
        if !suits {
            return false;
        }
        let attending = (0..instance.num_students())
            .filter(|&s| instance.attends(s, event))
            .count();
        if attending > instance.capacity(slot.room) as usize {
            return false;
        }
        (0..instance.num_students())
            .filter(|&s| instance.attends(s, event))
            .all(|s| {
                (0..instance.num_events()).all(|other| {
                    other == event
                        || !instance.attends(s, other)
                        || solution.get(other).is_none_or(|o| o.period != slot.period)
                })
            })
    }

    #[test]
    fn test_checks_each_hard_constraint() {
        // events 0 and 1 share student 0; event 2 needs characteristic 0
        let instance = fixtures::instance(
            &[2, 1],
            &[&[1, 1, 0], &[1, 0, 1]],
            &[&[0], &[1]],
            &[&[0], &[0], &[1]],
        );
        let config = SolverConfig::default();
        let mut timetable = Timetable::empty(&instance, &config);
        timetable.assign(0, Slot::new(0, 0));

        // occupied room
        assert!(!timetable.is_feasible(1, Slot::new(0, 0)));
        // wrong characteristics
        assert!(!timetable.is_feasible(2, Slot::new(3, 0)));
        assert!(timetable.is_feasible(2, Slot::new(3, 1)));
        // capacity: event 0 has two attendees, room 1 holds one
        assert!(!timetable.is_feasible(0, Slot::new(5, 1)));
        // student 0 already busy in period 0
        assert!(!timetable.is_feasible(1, Slot::new(0, 1)));
        assert!(timetable.is_feasible(1, Slot::new(1, 1)));
        // an event never conflicts with itself
        assert!(timetable.is_feasible(0, Slot::new(0, 0)));
    }

    #[test]
    fn test_room_extras_are_irrelevant() {
        let instance = fixtures::instance(&[10], &[&[1]], &[&[1, 1]], &[&[0, 1]]);
        let config = SolverConfig::default();
        let timetable = Timetable::empty(&instance, &config);
        assert!(timetable.is_feasible(0, Slot::new(0, 0)));
    }

    #[test]
    fn test_assign_and_unassign_keep_index_in_step() {
        let instance = fixtures::instance(&[5, 5], &[&[1, 1]], &[&[], &[]], &[&[], &[]]);
        let config = SolverConfig::default();
        let mut timetable = Timetable::empty(&instance, &config);

        timetable.assign(0, Slot::new(4, 1));
        assert_eq!(timetable.occupancy().occupant(1, 4), Some(0));
        assert_eq!(timetable.occupancy().student_load(0, 4), 1);

        timetable.assign(0, Slot::new(7, 0));
        assert!(!timetable.occupancy().is_taken(1, 4));
        assert_eq!(timetable.occupancy().student_load(0, 4), 0);
        assert_eq!(timetable.occupancy().student_load(0, 7), 1);

        assert_eq!(timetable.unassign(0), Some(Slot::new(7, 0)));
        assert_eq!(timetable.unassign(0), None);
        assert_eq!(
            *timetable.occupancy(),
            Occupancy::from_solution(&instance, timetable.solution(), &config)
        );
    }

    #[test]
    fn test_index_matches_matrix_scan() {
        let config = SolverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let instance = random_instance(&mut rng);
            let mut timetable = Timetable::empty(&instance, &config);
            // scatter events over random slots without checking anything
            for event in 0..instance.num_events() {
                if rng.random_bool(0.7) {
                    let slot = Slot::new(
                        rng.random_range(0..config.num_periods()),
                        rng.random_range(0..instance.num_rooms()),
                    );
                    if !timetable.occupancy().is_taken(slot.room, slot.period) {
                        timetable.assign(event, slot);
                    }
                }
            }
            for event in 0..instance.num_events() {
                for slot in timetable.slots() {
                    assert_eq!(
                        timetable.is_feasible(event, slot),
                        is_feasible_by_scan(&instance, timetable.solution(), event, slot),
                        "event {event} at {slot:?}"
                    );
                }
            }
        }
    }
}
