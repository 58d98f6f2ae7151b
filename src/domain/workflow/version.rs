//! Version Calculator - next version from the current one and a change class.

use crate::domain::document::{ChangeClass, VersionNumber};

/// Pure version arithmetic. Total over all inputs; parsing happens elsewhere.
pub struct VersionCalculator;

impl VersionCalculator {
    /// `none` keeps the version, `minor` bumps the minor part, `major` bumps
    /// the major part and resets minor.
    pub fn next(current: VersionNumber, change: ChangeClass) -> VersionNumber {
        match change {
            ChangeClass::None => current,
            ChangeClass::Minor => {
                VersionNumber::new(current.major(), current.minor().saturating_add(1))
            }
            ChangeClass::Major => VersionNumber::new(current.major().saturating_add(1), 0),
        }
    }

    /// Version for a submit-for-review.
    ///
    /// A document that has never been versioned always enters its first
    /// review at `0.1`, whatever change class was requested.
    pub fn for_submission(current: VersionNumber, change: ChangeClass) -> VersionNumber {
        if current.is_initial() {
            VersionNumber::new(0, 1)
        } else {
            Self::next(current, change)
        }
    }

    /// Like [`Self::next`] for a stored value that may be absent.
    pub fn next_from(current: Option<VersionNumber>, change: ChangeClass) -> VersionNumber {
        Self::next(current.unwrap_or(VersionNumber::INITIAL), change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(major: u32, minor: u32) -> VersionNumber {
        VersionNumber::new(major, minor)
    }

    #[test]
    fn none_keeps_initial_version() {
        assert_eq!(VersionCalculator::next(v(0, 0), ChangeClass::None), v(0, 0));
    }

    #[test]
    fn minor_bumps_minor() {
        assert_eq!(VersionCalculator::next(v(1, 3), ChangeClass::Minor), v(1, 4));
    }

    #[test]
    fn major_bumps_major_and_resets_minor() {
        assert_eq!(VersionCalculator::next(v(1, 3), ChangeClass::Major), v(2, 0));
    }

    #[test]
    fn absent_version_counts_as_initial() {
        assert_eq!(VersionCalculator::next_from(None, ChangeClass::Minor), v(0, 1));
        assert_eq!(VersionCalculator::next_from(None, ChangeClass::Major), v(1, 0));
    }

    #[test]
    fn first_submission_is_always_zero_one() {
        for change in [ChangeClass::None, ChangeClass::Minor, ChangeClass::Major] {
            assert_eq!(VersionCalculator::for_submission(v(0, 0), change), v(0, 1));
        }
    }

    #[test]
    fn later_submissions_follow_change_class() {
        assert_eq!(VersionCalculator::for_submission(v(0, 1), ChangeClass::None), v(0, 1));
        assert_eq!(VersionCalculator::for_submission(v(0, 1), ChangeClass::Major), v(1, 0));
    }

    #[test]
    fn saturates_at_the_top() {
        assert_eq!(VersionCalculator::next(v(u32::MAX, 2), ChangeClass::Major), v(u32::MAX, 0));
        assert_eq!(VersionCalculator::next(v(3, u32::MAX), ChangeClass::Minor), v(3, u32::MAX));
    }

    fn change_class() -> impl Strategy<Value = ChangeClass> {
        prop_oneof![
            Just(ChangeClass::None),
            Just(ChangeClass::Minor),
            Just(ChangeClass::Major),
        ]
    }

    proptest! {
        #[test]
        fn result_never_goes_backwards(
            major in 0u32..10_000,
            minor in 0u32..10_000,
            change in change_class(),
        ) {
            let current = v(major, minor);
            let next = VersionCalculator::next(current, change);
            prop_assert!(next >= current);
            prop_assert_eq!(next == current, change == ChangeClass::None);
        }

        #[test]
        fn submission_never_leaves_a_document_unversioned(
            major in 0u32..100,
            minor in 0u32..100,
            change in change_class(),
        ) {
            let next = VersionCalculator::for_submission(v(major, minor), change);
            prop_assert!(!next.is_initial());
        }
    }
}
