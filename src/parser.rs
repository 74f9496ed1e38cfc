use crate::data::{Instance, entry_count};
use crate::error::InstanceError;
use std::fs::read_to_string;
use std::path::Path;

/// Whitespace-separated non-negative integers, consumed front to back.
struct Tokens<'a> {
    inner: std::iter::Enumerate<std::str::SplitWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace().enumerate(),
        }
    }

    fn next_value<T: TryFrom<u64>>(&mut self, what: &'static str) -> Result<T, InstanceError> {
        let (position, token) = self.inner.next().ok_or(InstanceError::MissingValue { what })?;
        token
            .parse::<u64>()
            .ok()
            .and_then(|value| T::try_from(value).ok())
            .ok_or_else(|| InstanceError::InvalidToken {
                token: token.to_string(),
                position,
            })
    }

    fn next_matrix(&mut self, what: &'static str, len: usize) -> Result<Vec<bool>, InstanceError> {
        (0..len)
            .map(|index| match self.next_value::<u64>(what)? {
                0 => Ok(false),
                1 => Ok(true),
                value => Err(InstanceError::NotBinary { what, index, value }),
            })
            .collect()
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}

/// Parses an instance in the `.tim` integer stream format:
///
/// ```text
/// numEvents numRooms numCharacteristics numStudents
/// <numRooms room capacities>
/// <numStudents x numEvents attendance matrix, row-major by student>
/// <numRooms x numCharacteristics room characteristic matrix, row-major by room>
/// <numEvents x numCharacteristics event characteristic matrix, row-major by event>
/// ```
pub fn parse_instance(text: &str) -> Result<Instance, InstanceError> {
    let mut tokens = Tokens::new(text);

    let num_events: usize = tokens.next_value("number of events")?;
    let num_rooms: usize = tokens.next_value("number of rooms")?;
    let num_characteristics: usize = tokens.next_value("number of characteristics")?;
    let num_students: usize = tokens.next_value("number of students")?;

    let attendance_len = entry_count("attendance matrix", num_students, num_events)?;
    let room_len = entry_count("room characteristic matrix", num_rooms, num_characteristics)?;
    let event_len = entry_count("event characteristic matrix", num_events, num_characteristics)?;

    let room_capacities = (0..entry_count("number of rooms", num_rooms, 1)?)
        .map(|_| tokens.next_value::<u32>("room capacities"))
        .collect::<Result<Vec<_>, _>>()?;
    let attendance = tokens.next_matrix("attendance matrix", attendance_len)?;
    let room_characteristics = tokens.next_matrix("room characteristic matrix", room_len)?;
    let event_characteristics = tokens.next_matrix("event characteristic matrix", event_len)?;

    let trailing = tokens.remaining();
    if trailing > 0 {
        return Err(InstanceError::TrailingData { count: trailing });
    }

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
}

pub fn read_instance(path: impl AsRef<Path>) -> Result<Instance, InstanceError> {
    let text = read_to_string(path)?;
    parse_instance(&text)
}
