use crate::data::{Slot, Solution};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes one `"<period> <room>"` line per event in index order, `-1 -1` for
/// unassigned events.
pub fn write_solution<W: Write>(mut writer: W, solution: &Solution) -> io::Result<()> {
    for &slot in solution.slots() {
        writeln!(writer, "{}", format_slot(slot))?;
    }
    writer.flush()
}

pub fn format_solution(solution: &Solution) -> String {
    solution
        .slots()
        .iter()
        .map(|&slot| format_slot(slot) + "\n")
        .collect()
}

fn format_slot(slot: Option<Slot>) -> String {
    match slot {
        Some(slot) => format!("{} {}", slot.period, slot.room),
        None => "-1 -1".to_string(),
    }
}

pub fn write_solution_file(path: impl AsRef<Path>, solution: &Solution) -> io::Result<()> {
    let file = File::create(path)?;
    write_solution(BufWriter::new(file), solution)
}
