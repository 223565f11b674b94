//! Property-based tests for the path canonicalizer.
//!
//! These tests use proptest to generate random inputs and verify that
//! the canonicalization invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::canon::canonicalize;
    use proptest::prelude::*;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    /// Strategy: an absolute path built from arbitrary segments, including
    /// empty runs, `.`, `..`, and dotfile names.
    fn messy_absolute_path() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                Just(String::new()),
                Just(".".to_string()),
                Just("..".to_string()),
                "[a-zA-Z0-9._-]{1,8}",
            ],
            0..8,
        )
        .prop_map(|segments| format!("/{}", segments.join("/")))
    }

    /// Strategy: an absolute path that is already in canonical form.
    fn clean_absolute_path() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-zA-Z0-9_-]{1,8}", 0..8).prop_map(|segments| {
            if segments.is_empty() {
                "/".to_string()
            } else {
                format!("/{}", segments.join("/"))
            }
        })
    }

    proptest! {
        /// Property: canonicalization is idempotent.
        #[test]
        fn canonicalize_is_idempotent(input in messy_absolute_path()) {
            let once = canonicalize(Path::new(&input)).unwrap();
            let twice = canonicalize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: canonical output is always absolute.
        #[test]
        fn output_is_absolute(input in messy_absolute_path()) {
            let result = canonicalize(Path::new(&input)).unwrap();
            prop_assert!(result.is_absolute());
        }

        /// Property: canonical output contains no empty, `.`, or `..`
        /// segments.
        #[test]
        fn output_has_no_special_segments(input in messy_absolute_path()) {
            let result = canonicalize(Path::new(&input)).unwrap();
            let bytes = result.as_os_str().as_bytes();
            // Skip the single leading '/'; every remaining segment must be
            // a real name.
            for segment in bytes[1..].split(|&b| b == b'/') {
                if bytes.len() > 1 {
                    prop_assert!(!segment.is_empty(), "empty segment in {:?}", result);
                }
                prop_assert_ne!(segment, b".");
                prop_assert_ne!(segment, b"..");
            }
        }

        /// Property: already-canonical absolute input is returned unchanged.
        #[test]
        fn clean_input_is_identity(input in clean_absolute_path()) {
            let result = canonicalize(Path::new(&input)).unwrap();
            prop_assert_eq!(result, Path::new(&input));
        }

        /// Property: canonicalization never lengthens an absolute input.
        #[test]
        fn output_never_longer_than_absolute_input(input in messy_absolute_path()) {
            let result = canonicalize(Path::new(&input)).unwrap();
            prop_assert!(result.as_os_str().len() <= input.len().max(1));
        }
    }
}
