use crate::error::InstanceError;
use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type EventId = usize;
pub type RoomId = usize;
pub type StudentId = usize;
pub type CharacteristicId = usize;
pub type Period = usize;

/// Upper bound on any header dimension and on the size of each matrix.
pub const MAX_ENTRIES: usize = 1 << 24;

/// The immutable description of one timetabling problem.
///
/// All three boolean matrices are stored flat and row-major:
/// - attendance: `student * num_events + event`
/// - room characteristics: `room * num_characteristics + characteristic`
/// - event characteristics: `event * num_characteristics + characteristic`
///
/// The per-event attendee lists and per-student event lists are derived once
/// at construction time and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    num_events: usize,
    num_rooms: usize,
    num_characteristics: usize,
    num_students: usize,
    room_capacities: Vec<u32>,
    attendance: Vec<bool>,
    room_characteristics: Vec<bool>,
    event_characteristics: Vec<bool>,
    attendees: Vec<Vec<StudentId>>,
    enrolments: Vec<Vec<EventId>>,
}

impl Instance {
    /// Builds an instance from its header dimensions and flat matrices.
    ///
    /// Fails when a dimension or matrix size exceeds [`MAX_ENTRIES`], or when a
    /// capacity list or matrix does not have the size implied by the dimensions.
    #[allow(clippy::too_many_arguments)]
    pub fn from_matrices(
        num_events: usize,
        num_rooms: usize,
        num_characteristics: usize,
        num_students: usize,
        room_capacities: Vec<u32>,
        attendance: Vec<bool>,
        room_characteristics: Vec<bool>,
        event_characteristics: Vec<bool>,
    ) -> Result<Self, InstanceError> {
        entry_count("number of events", num_events, 1)?;
        entry_count("number of students", num_students, 1)?;
        check_len(
            "room capacities",
            entry_count("number of rooms", num_rooms, 1)?,
            room_capacities.len(),
        )?;
        check_len(
            "attendance matrix",
            entry_count("attendance matrix", num_students, num_events)?,
            attendance.len(),
        )?;
        check_len(
            "room characteristic matrix",
            entry_count("room characteristic matrix", num_rooms, num_characteristics)?,
            room_characteristics.len(),
        )?;
        check_len(
            "event characteristic matrix",
            entry_count("event characteristic matrix", num_events, num_characteristics)?,
            event_characteristics.len(),
        )?;

        let mut attendees = vec![Vec::new(); num_events];
        let mut enrolments = vec![Vec::new(); num_students];
        for student in 0..num_students {
            for event in 0..num_events {
                if attendance[student * num_events + event] {
                    attendees[event].push(student);
                    enrolments[student].push(event);
                }
            }
        }

        Ok(Self {
            num_events,
            num_rooms,
            num_characteristics,
            num_students,
            room_capacities,
            attendance,
            room_characteristics,
            event_characteristics,
            attendees,
            enrolments,
        })
    }

    pub fn num_events(&self) -> usize {
        self.num_events
    }

    pub fn num_rooms(&self) -> usize {
        self.num_rooms
    }

    pub fn num_characteristics(&self) -> usize {
        self.num_characteristics
    }

    pub fn num_students(&self) -> usize {
        self.num_students
    }

    pub fn capacity(&self, room: RoomId) -> u32 {
        self.room_capacities[room]
    }

    pub fn attends(&self, student: StudentId, event: EventId) -> bool {
        self.attendance[student * self.num_events + event]
    }

    pub fn room_has(&self, room: RoomId, characteristic: CharacteristicId) -> bool {
        self.room_characteristics[room * self.num_characteristics + characteristic]
    }

    pub fn event_requires(&self, event: EventId, characteristic: CharacteristicId) -> bool {
        self.event_characteristics[event * self.num_characteristics + characteristic]
    }

    /// Students attending `event`, in increasing id order.
    pub fn attendees(&self, event: EventId) -> &[StudentId] {
        &self.attendees[event]
    }

    pub fn attendee_count(&self, event: EventId) -> usize {
        self.attendees[event].len()
    }

    /// Events attended by `student`, in increasing id order.
    pub fn events_of(&self, student: StudentId) -> &[EventId] {
        &self.enrolments[student]
    }

    /// True when the room possesses every characteristic the event requires.
    /// Characteristics the room has but the event does not need are ignored.
    pub fn room_suits(&self, event: EventId, room: RoomId) -> bool {
        (0..self.num_characteristics)
            .all(|c| !self.event_requires(event, c) || self.room_has(room, c))
    }

    pub fn room_fits(&self, event: EventId, room: RoomId) -> bool {
        self.attendee_count(event) <= self.capacity(room) as usize
    }
}

/// `rows * columns`, as long as it stays within [`MAX_ENTRIES`].
pub(crate) fn entry_count(
    what: &'static str,
    rows: usize,
    columns: usize,
) -> Result<usize, InstanceError> {
    rows.checked_mul(columns)
        .filter(|&len| len <= MAX_ENTRIES)
        .ok_or(InstanceError::DimensionOverflow {
            what,
            limit: MAX_ENTRIES,
        })
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), InstanceError> {
    if expected == actual {
        Ok(())
    } else {
        Err(InstanceError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// A (period, room) pair an event can be placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub period: Period,
    pub room: RoomId,
}

impl Slot {
    pub fn new(period: Period, room: RoomId) -> Self {
        Self { period, room }
    }
}

/// Event index to assignment. `None` is the "unassigned" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Solution {
    slots: Vec<Option<Slot>>,
}

impl Solution {
    /// A solution of `num_events` unassigned events.
    pub fn unassigned(num_events: usize) -> Self {
        Self {
            slots: vec![None; num_events],
        }
    }

    pub fn from_slots(slots: Vec<Option<Slot>>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, event: EventId) -> Option<Slot> {
        self.slots[event]
    }

    pub fn set(&mut self, event: EventId, slot: Option<Slot>) {
        self.slots[event] = slot;
    }

    /// All assignments in event index order.
    pub fn slots(&self) -> &[Option<Slot>] {
        &self.slots
    }

    pub fn assigned(&self) -> impl Iterator<Item = (EventId, Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(event, slot)| slot.map(|s| (event, s)))
    }

    pub fn unassigned_events(&self) -> impl Iterator<Item = EventId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(event, _)| event)
    }

    pub fn unassigned_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }
}

/// Instance as it arrives over the wire: header dimensions and 0/1 matrices.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInput {
    pub num_events: usize,
    pub num_rooms: usize,
    pub num_characteristics: usize,
    pub num_students: usize,
    pub room_capacities: Vec<u32>,
    pub attendance: Vec<u8>,
    pub room_characteristics: Vec<u8>,
    pub event_characteristics: Vec<u8>,
}

impl TryFrom<InstanceInput> for Instance {
    type Error = InstanceError;

    fn try_from(input: InstanceInput) -> Result<Self, Self::Error> {
        Instance::from_matrices(
            input.num_events,
            input.num_rooms,
            input.num_characteristics,
            input.num_students,
            input.room_capacities,
            to_flags("attendance matrix", &input.attendance)?,
            to_flags("room characteristic matrix", &input.room_characteristics)?,
            to_flags("event characteristic matrix", &input.event_characteristics)?,
        )
    }
}

fn to_flags(what: &'static str, values: &[u8]) -> Result<Vec<bool>, InstanceError> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(InstanceError::NotBinary {
                what,
                index,
                value: u64::from(value),
            }),
        })
        .collect()
}

/// A single scheduled event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub event_id: EventId,
    pub period: Period,
    pub room_id: RoomId,
}

/// Describes a soft constraint that was not met in the final timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmetSoftConstraint {
    pub constraint_type: String,
    pub description: String,
}

impl fmt::Display for UnmetSoftConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.constraint_type, self.description)
    }
}

/// Raw soft-constraint counts and their weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub single_event_days: u64,
    pub consecutive_runs: u64,
    pub last_slots: u64,
    pub unassigned_events: u64,
    pub total: f64,
}

/// How the local search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchStatus {
    /// No single-event relocation strictly improves the score.
    LocallyOptimal,
    /// The improvement cap was reached before a local optimum was confirmed.
    BudgetExhausted,
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingOutput {
    pub assignments: Vec<Assignment>,
    pub unassigned_events: Vec<EventId>,
    pub score: ScoreBreakdown,
    pub status: SearchStatus,
    pub improvements: usize,
    pub unmet_soft_constraints: Vec<UnmetSoftConstraint>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_lookups() {
        // two students, three events, two characteristics, two rooms
        let instance = fixtures::instance(
            &[1, 5],
            &[&[1, 0, 1], &[1, 1, 0]],
            &[&[1, 0], &[1, 1]],
            &[&[0, 0], &[0, 1], &[1, 0]],
        );
        assert_eq!(instance.attendees(0), &[0, 1]);
        assert_eq!(instance.attendees(1), &[1]);
        assert_eq!(instance.events_of(0), &[0, 2]);
        assert_eq!(instance.attendee_count(0), 2);
        assert!(instance.attends(1, 1));
        assert!(!instance.attends(0, 1));

        assert!(instance.room_suits(0, 0));
        assert!(!instance.room_suits(1, 0));
        assert!(instance.room_suits(1, 1));
        assert!(instance.room_suits(2, 0));

        assert!(!instance.room_fits(0, 0));
        assert!(instance.room_fits(0, 1));
    }

    #[test]
    fn test_dimension_mismatch() {
        let result = Instance::from_matrices(2, 1, 0, 1, vec![10], vec![true], vec![], vec![]);
        assert!(matches!(
            result,
            Err(InstanceError::DimensionMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_oversized_dimensions() {
        let result = Instance::from_matrices(usize::MAX, 1, 0, 2, vec![5], vec![], vec![], vec![]);
        assert!(matches!(
            result,
            Err(InstanceError::DimensionOverflow {
                what: "number of events",
                ..
            })
        ));

        // no students and no characteristics keep every matrix empty
        let result = Instance::from_matrices(MAX_ENTRIES + 1, 0, 0, 0, vec![], vec![], vec![], vec![]);
        assert!(matches!(result, Err(InstanceError::DimensionOverflow { .. })));

        let result = Instance::from_matrices(1 << 13, 1, 0, 1 << 12, vec![5], vec![], vec![], vec![]);
        assert!(matches!(
            result,
            Err(InstanceError::DimensionOverflow {
                what: "attendance matrix",
                ..
            })
        ));
    }

    #[test]
    fn test_input_rejects_non_binary() {
        let input = InstanceInput {
            num_events: 1,
            num_rooms: 1,
            num_characteristics: 0,
            num_students: 1,
            room_capacities: vec![3],
            attendance: vec![2],
            room_characteristics: vec![],
            event_characteristics: vec![],
        };
        assert!(matches!(
            Instance::try_from(input),
            Err(InstanceError::NotBinary { value: 2, .. })
        ));
    }

    #[test]
    fn test_solution_bookkeeping() {
        let mut solution = Solution::unassigned(3);
        assert_eq!(solution.unassigned_count(), 3);
        solution.set(1, Some(Slot::new(4, 0)));
        assert_eq!(solution.get(1), Some(Slot::new(4, 0)));
        assert_eq!(solution.assigned().collect::<Vec<_>>(), vec![(1, Slot::new(4, 0))]);
        assert_eq!(solution.unassigned_events().collect::<Vec<_>>(), vec![0, 2]);
    }
}
