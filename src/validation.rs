//! Hard-constraint validation of complete timetables.
//!
//! Checks every assignment of a solution straight against the instance
//! matrices, without the occupancy index the search relies on. Detects:
//! - slots outside the week or rooms that do not exist
//! - two events in the same room and period
//! - rooms lacking a required characteristic
//! - rooms too small for their event
//! - students booked into two events in the same period

use crate::config::SolverConfig;
use crate::data::{EventId, Instance, Slot, Solution, StudentId};
use itertools::Itertools;

/// Validation result.
pub type ValidationResult = Result<(), Vec<Violation>>;

/// A violated hard constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    OutOfRange { event: EventId, slot: Slot },
    SlotClash { slot: Slot, events: Vec<EventId> },
    MissingCharacteristic { event: EventId, characteristic: usize },
    OverCapacity { event: EventId, attendees: usize, capacity: u32 },
    StudentClash { student: StudentId, period: usize, events: Vec<EventId> },
}

/// Validates every hard constraint of `solution`. Unassigned events are
/// always valid.
pub fn validate(solution: &Solution, instance: &Instance, config: &SolverConfig) -> ValidationResult {
    let mut violations = Vec::new();

    let (in_range, out_of_range): (Vec<_>, Vec<_>) = solution.assigned().partition(|&(_, slot)| {
        slot.period < config.num_periods() && slot.room < instance.num_rooms()
    });
    violations.extend(
        out_of_range
            .into_iter()
            .map(|(event, slot)| Violation::OutOfRange { event, slot }),
    );

    let by_slot = in_range.iter().map(|&(event, slot)| (slot, event)).into_group_map();
    violations.extend(
        by_slot
            .into_iter()
            .filter(|(_, events)| events.len() > 1)
            .sorted()
            .map(|(slot, events)| Violation::SlotClash { slot, events }),
    );

    for &(event, slot) in &in_range {
        for characteristic in 0..instance.num_characteristics() {
            if instance.event_requires(event, characteristic)
                && !instance.room_has(slot.room, characteristic)
            {
                violations.push(Violation::MissingCharacteristic {
                    event,
                    characteristic,
                });
            }
        }

        let attendees = (0..instance.num_students())
            .filter(|&student| instance.attends(student, event))
            .count();
        let capacity = instance.capacity(slot.room);
        if attendees > capacity as usize {
            violations.push(Violation::OverCapacity {
                event,
                attendees,
                capacity,
            });
        }
    }

    for student in 0..instance.num_students() {
        let by_period = in_range
            .iter()
            .filter(|&&(event, _)| instance.attends(student, event))
            .map(|&(event, slot)| (slot.period, event))
            .into_group_map();
        violations.extend(
            by_period
                .into_iter()
                .filter(|(_, events)| events.len() > 1)
                .sorted()
                .map(|(period, events)| Violation::StudentClash {
                    student,
                    period,
                    events,
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
