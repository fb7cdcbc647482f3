//! Environment variable validation with helpful warnings
//!
//! Invalid values never abort a deploy: the previous value is kept and a
//! warning is collected for the CLI to print.

use std::path::PathBuf;

use super::loader::ConfigWarning;

/// Validator for one environment variable
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    expected: &'a str,
}

impl<'a> EnvVarValidator<'a> {
    /// `expected` describes valid values, e.g. "a TCP port (1-65535)"
    pub fn new(var_name: &'a str, expected: &'a str) -> Self {
        Self { var_name, expected }
    }

    /// Parse a value, returning `default` (and recording a warning) if invalid
    pub fn parse<T, F>(
        &self,
        value: &str,
        parser: F,
        default: T,
        warnings: &mut Vec<ConfigWarning>,
    ) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        match parser(value) {
            Some(parsed) => parsed,
            None => {
                warnings.push(ConfigWarning {
                    key: self.var_name.to_string(),
                    file: PathBuf::from(format!("${}", self.var_name)),
                    line: None,
                    message: format!(
                        "invalid value '{}', expected {}; keeping the configured value",
                        value, self.expected
                    ),
                    suggestion: None,
                });
                default
            }
        }
    }
}

/// Simple Levenshtein distance for typo detection
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let a_len = a_bytes.len();
    let b_len = b_bytes.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, a_char) in a_bytes.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_bytes.iter().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
