//! Input-file commands, the context they fill and the data-file reader.
pub mod data_reader;
pub mod input_file;
pub mod simulation_context;

/// Whitespace-separated tokens of `line` up to the first `#`.
pub fn uncommented_tokens(line: &str) -> Vec<&str> {
    line.split_once('#')
        .map(|(before, _)| before)
        .unwrap_or(line)
        .split_whitespace()
        .collect()
}
