//! CLI Exit Code Registry
//!
//! Single source of truth for `shoprec` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 2    | Usage error (bad args, missing input file)           |
//! | 3    | Invalid config (TOML parse or validation)            |
//! | 4    | Input could not be read or decoded, or its totals    |
//! |      | do not fit the amount type                           |
//! | 5    | Input schema error (required column missing)         |
//! | 6    | Output could not be written                          |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, or one of the two input files not provided.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 3;

/// Input file unreadable, not delimited text, or holding amounts too large to total.
pub const EXIT_INPUT: u8 = 4;

/// Input lacks a required column. The run produces no report.
pub const EXIT_SCHEMA: u8 = 5;

/// Report file or stdout could not be written.
pub const EXIT_OUTPUT: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &shoprec_recon::ReconError) -> u8 {
    use shoprec_recon::ReconError;
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::MissingColumn { .. } => EXIT_SCHEMA,
        ReconError::Csv { .. } | ReconError::Overflow { .. } => EXIT_INPUT,
        ReconError::Output(_) => EXIT_OUTPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoprec_recon::ReconError;

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_USAGE, EXIT_CONFIG, EXIT_INPUT, EXIT_SCHEMA, EXIT_OUTPUT];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn engine_errors_map_to_codes() {
        let missing = ReconError::MissingColumn { table: "orders".into(), column: "Taxes".into() };
        assert_eq!(recon_exit_code(&missing), EXIT_SCHEMA);
        assert_eq!(recon_exit_code(&ReconError::ConfigParse("x".into())), EXIT_CONFIG);
        assert_eq!(recon_exit_code(&ReconError::Output("x".into())), EXIT_OUTPUT);
        let overflow = ReconError::Overflow {
            track: "cash".into(),
            column: "Net Cash Received".into(),
            month: shoprec_recon::Month::new(2024, 1),
        };
        assert_eq!(recon_exit_code(&overflow), EXIT_INPUT);
    }
}
