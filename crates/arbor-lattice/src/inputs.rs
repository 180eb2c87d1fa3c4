//! Parsing of per-step rate and volatility inputs.

use arbor_core::{ArborError, ArborResult};

/// Parses a textual per-step input.
///
/// Accepts either a single number, broadcast to every step, or a
/// comma-separated list with exactly `steps` entries.
///
/// # Example
///
/// ```rust
/// use arbor_lattice::parse_step_values;
///
/// assert_eq!(parse_step_values("0.05", 3).unwrap(), vec![0.05; 3]);
/// assert_eq!(parse_step_values("0.1, 0.2", 2).unwrap(), vec![0.1, 0.2]);
/// assert!(parse_step_values("0.1,0.2", 3).is_err());
/// ```
pub fn parse_step_values(input: &str, steps: usize) -> ArborResult<Vec<f64>> {
    let values = input
        .split(',')
        .map(str::trim)
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| ArborError::configuration(format!("'{s}' is not a number")))
        })
        .collect::<ArborResult<Vec<f64>>>()?;

    match values.as_slice() {
        [single] => Ok(vec![*single; steps]),
        _ if values.len() == steps => Ok(values),
        _ => Err(ArborError::configuration(format!(
            "expected a single value or {steps} comma-separated values, got {}",
            values.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast() {
        assert_eq!(parse_step_values(" 0.2 ", 4).unwrap(), vec![0.2; 4]);
    }

    #[test]
    fn test_list() {
        let values = parse_step_values("0.01,0.02,0.03", 3).unwrap();
        assert_eq!(values, vec![0.01, 0.02, 0.03]);
    }

    #[test]
    fn test_wrong_length() {
        let err = parse_step_values("0.01,0.02", 3).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_not_a_number() {
        assert!(parse_step_values("five%", 1).is_err());
        assert!(parse_step_values("0.1,,0.2", 3).is_err());
    }
}
