//! Shared helpers for unit tests.

use crate::data::Instance;
use rand::Rng;

/// A small random instance; dense enough that some events cannot be placed.
pub fn random_instance<R: Rng>(rng: &mut R) -> Instance {
    let num_events = rng.random_range(1..=12);
    let num_rooms = rng.random_range(1..=3);
    let num_characteristics = rng.random_range(0..=3);
    let num_students = rng.random_range(1..=8);

    let room_capacities = (0..num_rooms).map(|_| rng.random_range(1..=6)).collect();
    let attendance = (0..num_students * num_events)
        .map(|_| rng.random_bool(0.35))
        .collect();
    let room_characteristics = (0..num_rooms * num_characteristics)
        .map(|_| rng.random_bool(0.6))
        .collect();
    let event_characteristics = (0..num_events * num_characteristics)
        .map(|_| rng.random_bool(0.25))
        .collect();

    Instance::from_matrices(
        num_events,
        num_rooms,
        num_characteristics,
        num_students,
        room_capacities,
        attendance,
        room_characteristics,
        event_characteristics,
    )
    .expect("generated matrices match their dimensions")
}
