//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success (FAIL lines do not change this without --strict) |
//! | 1    | Report contains FAIL lines and `--strict` was given      |
//! | 2    | CLI usage error (bad args, bad flag value)               |
//! | 3    | Input tables could not be loaded                         |
//! | 4    | Invalid config file or answer key                        |
//! | 5    | Report or JSON output could not be written               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - the report was produced.
pub const EXIT_SUCCESS: u8 = 0;

/// At least one report line failed and `--strict` is set.
pub const EXIT_CHECKS_FAILED: u8 = 1;

/// Usage error - bad arguments, out-of-range flag values.
/// Matches the code clap itself uses for parse errors.
pub const EXIT_USAGE: u8 = 2;

/// A CSV input is missing, unreadable, or malformed.
pub const EXIT_LOAD_FAILED: u8 = 3;

/// Config file or answer key failed to read, parse, or validate.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Writing the report to stdout or `--output` failed.
pub const EXIT_WRITE_FAILED: u8 = 5;
