//! Key-renaming extraction from pre-values into typed configurations.

use crate::model::PreValues;

/// A configuration type whose fields can be assigned from raw legacy values.
pub trait PreValueTarget {
    /// Assign `raw` to the field named `field`.
    ///
    /// Returns `false` when the field is unknown or the value does not parse;
    /// the field then keeps its current value.
    fn assign(&mut self, field: &str, raw: &str) -> bool;
}

/// Build a configuration by copying legacy values through a mapping table.
///
/// `mappings` pairs a legacy pre-value alias with a target field name. The
/// table is applied in order, so when two legacy keys map to the same field
/// the later one wins if both are present. Fields without a present legacy
/// value keep their `Default`.
pub fn map_pre_values<T>(pre_values: &PreValues, mappings: &[(&str, &str)]) -> T
where
    T: PreValueTarget + Default,
{
    let mut target = T::default();
    for (legacy, field) in mappings {
        if let Some(raw) = pre_values.get(legacy) {
            if !target.assign(field, raw) {
                tracing::trace!(legacy = %legacy, field = %field, "pre-value not assigned");
            }
        }
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::prevalues::parse_int;

    #[derive(Debug, Default, PartialEq)]
    struct Limits {
        low: i64,
        high: i64,
    }

    impl PreValueTarget for Limits {
        fn assign(&mut self, field: &str, raw: &str) -> bool {
            let Some(value) = parse_int(raw) else {
                return false;
            };
            match field {
                "Low" => self.low = value,
                "High" => self.high = value,
                _ => return false,
            }
            true
        }
    }

    #[test]
    fn test_later_mapping_overwrites_earlier() {
        let pre_values = PreValues::new().with("precision", "2").with("step", "5");
        let limits: Limits = map_pre_values(&pre_values, &[("precision", "High"), ("step", "High")]);
        assert_eq!(limits.high, 5);
    }

    #[test]
    fn test_absent_and_malformed_keep_default() {
        let pre_values = PreValues::new().with("lo", "abc");
        let limits: Limits = map_pre_values(&pre_values, &[("lo", "Low"), ("hi", "High")]);
        assert_eq!(limits, Limits::default());
    }
}
