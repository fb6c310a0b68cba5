use crate::{
    SimError,
    core::{Process, ProcessSet},
};

/// Parses one `pid arrival burst` triple per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_processes(text: &str) -> Result<ProcessSet, SimError> {
    let mut processes = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        let &[pid, arrival, burst] = fields.as_slice() else {
            return Err(SimError::Parse {
                line,
                reason: format!("expected `pid arrival burst`, got {} fields", fields.len()),
            });
        };

        let number = |name: &str, value: &str| {
            value.parse::<u64>().map_err(|e| SimError::Parse {
                line,
                reason: format!("bad {name} '{value}': {e}"),
            })
        };

        processes.push(Process::new(
            number("pid", pid)?,
            number("arrival", arrival)?,
            number("burst", burst)?,
        ));
    }

    ProcessSet::new(processes)
}
