//! Set helpers over translation key collections.

use crate::types::LocaleMapping;

/// Keys of `probe` that are already present in `base`, in `probe` order.
///
/// Used for duplicate-key detection: `base` is the accumulated mapping and
/// `probe` the fragment about to be merged into it.
#[must_use]
pub fn intersection(base: &LocaleMapping, probe: &LocaleMapping) -> Vec<String> {
    probe.keys().filter(|key| base.contains_key(*key)).cloned().collect()
}

/// Keys of `probe` that are absent from `base`, in `probe` order.
///
/// Used for missing-key detection: `probe` is the reference locale and
/// `base` the locale being checked against it.
#[must_use]
pub fn difference(base: &LocaleMapping, probe: &LocaleMapping) -> Vec<String> {
    probe.keys().filter(|key| !base.contains_key(*key)).cloned().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::types::LocaleMapping;

    fn mapping(value: serde_json::Value) -> LocaleMapping {
        match value {
            serde_json::Value::Object(map) => map,
            _ => LocaleMapping::new(),
        }
    }

    #[rstest]
    fn test_intersection_disjoint_is_empty() {
        let base = mapping(json!({"a": "1", "b": "2"}));
        let probe = mapping(json!({"c": "3"}));

        assert_that!(intersection(&base, &probe), is_empty());
    }

    #[rstest]
    fn test_intersection_keeps_probe_order() {
        let base = mapping(json!({"a": "1", "b": "2", "c": "3"}));
        let probe = mapping(json!({"c": "x", "a": "y", "z": "z"}));

        assert_that!(intersection(&base, &probe), elements_are![eq("c"), eq("a")]);
    }

    #[rstest]
    fn test_difference_keeps_probe_order() {
        let base = mapping(json!({"a": "1", "b": "2"}));
        let probe = mapping(json!({"a": "x", "c": "y", "d": "z"}));

        assert_that!(difference(&base, &probe), elements_are![eq("c"), eq("d")]);
    }

    #[rstest]
    fn test_difference_of_subset_is_empty() {
        let base = mapping(json!({"a": "1", "b": "2", "c": "3"}));
        let probe = mapping(json!({"a": "x", "b": "y"}));

        assert_that!(difference(&base, &probe), is_empty());
    }
}
