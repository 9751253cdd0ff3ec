//! Session defaults and fixed status-log texts.

/// Initial rows-per-file text.
pub const C_ROWS_PER_FILE_DEFAULT: &str = "50";

/// Lines shown when a session starts.
pub const L_WELCOME_LINES: [&str; 2] = [
    "Welcome to the spreadsheet splitter!",
    "Select a spreadsheet file, set the rows per output file, then start the split.",
];

/// Marker logged before a preview is recomputed.
pub const C_RECALCULATE_MARKER: &str = "--- Recalculating split info ---";

/// Width of the text progress bar drawn by the terminal shell.
pub const N_WIDTH_PROGRESS_BAR: usize = 40;
