//! Whole-queue dependency validation.
//!
//! After parsing queues its options, [`validate_queue`] checks every queued
//! option's requires/conflicts sets against the other queued names, plus
//! the registry-wide required flags. All set math goes through [`BTreeSet`]
//! difference/intersection, so reported name lists are sorted and
//! deterministic regardless of input order. Any violation discards the
//! entire queue: no callback runs, including the offender's own.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::option::OptionSpec;

/// A single dependency violation found in one run's queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    /// One combined report of every required co-option absent from the queue.
    #[error("option '{option}' requires option(s) not given: {}", .missing.join(", "))]
    MissingRequired { option: String, missing: Vec<String> },
    /// One combined report of every forbidden co-option present in the queue.
    #[error("option '{option}' cannot be combined with: {}", .conflicting.join(", "))]
    Conflict {
        option: String,
        conflicting: Vec<String>,
    },
    /// A registered required option never appeared in the input.
    #[error("required option '{option}' was not given")]
    RequiredOmitted { option: String },
}

/// Validates one run's queue against each queued option's dependency sets
/// and the registry's required flags.
///
/// `queued` is the parse queue in discovery order (duplicates collapse to
/// set semantics); `registered` is every option the registry knows, used
/// for the required-flag check.
///
/// # Examples
///
/// ```
/// use optline_core::{validate_queue, DependencyError, OptionSpec};
///
/// let reset = OptionSpec::new("reset").exclusive();
/// let verbose = OptionSpec::new("verbose");
///
/// // standalone option queued alongside another one
/// let errors = validate_queue(&[&reset, &verbose], [&reset, &verbose]);
/// assert_eq!(
///     errors,
///     vec![DependencyError::Conflict {
///         option: "reset".to_string(),
///         conflicting: vec!["verbose".to_string()],
///     }],
/// );
///
/// // alone it is fine
/// assert!(validate_queue(&[&reset], [&reset, &verbose]).is_empty());
/// ```
pub fn validate_queue<'a>(
    queued: &[&'a OptionSpec],
    registered: impl IntoIterator<Item = &'a OptionSpec>,
) -> Vec<DependencyError> {
    let present: BTreeSet<&str> = queued.iter().map(|spec| spec.name()).collect();
    let mut errors = Vec::new();
    let mut checked: BTreeSet<&str> = BTreeSet::new();

    for spec in queued {
        if !checked.insert(spec.name()) {
            continue;
        }

        let mut others = present.clone();
        others.remove(spec.name());

        let requires: BTreeSet<&str> = spec.requires().iter().map(String::as_str).collect();
        let missing: Vec<String> = requires
            .difference(&others)
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            errors.push(DependencyError::MissingRequired {
                option: spec.name().to_string(),
                missing,
            });
        }

        let conflicting: Vec<String> = if spec.is_exclusive() {
            others.iter().map(|name| name.to_string()).collect()
        } else {
            let conflicts: BTreeSet<&str> = spec.conflicts().iter().map(String::as_str).collect();
            conflicts
                .intersection(&others)
                .map(|name| name.to_string())
                .collect()
        };
        if !conflicting.is_empty() {
            errors.push(DependencyError::Conflict {
                option: spec.name().to_string(),
                conflicting,
            });
        }
    }

    for spec in registered {
        if spec.is_required() && !present.contains(spec.name()) {
            errors.push(DependencyError::RequiredOmitted {
                option: spec.name().to_string(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> OptionSpec {
        OptionSpec::new(name)
    }

    fn requiring(name: &str, names: &[&str]) -> OptionSpec {
        let mut spec = OptionSpec::new(name);
        spec.add_requires(names.iter().copied());
        spec
    }

    fn conflicting(name: &str, names: &[&str]) -> OptionSpec {
        let mut spec = OptionSpec::new(name);
        spec.add_conflicts(names.iter().copied());
        spec
    }

    #[test]
    fn test_missing_requirements_reported_once_sorted() {
        let a_b = requiring("a_b", &["bb", "a"]);
        let errors = validate_queue(&[&a_b], [&a_b]);
        assert_eq!(
            errors,
            vec![DependencyError::MissingRequired {
                option: "a_b".to_string(),
                missing: vec!["a".to_string(), "bb".to_string()],
            }],
        );
    }

    #[test]
    fn test_satisfied_requirements_pass() {
        let a_b = requiring("a_b", &["a", "bb"]);
        let a = spec("a");
        let bb = spec("bb");
        assert!(validate_queue(&[&a_b, &a, &bb], [&a_b, &a, &bb]).is_empty());
    }

    #[test]
    fn test_conflicts_report_only_present_names() {
        let quiet = conflicting("quiet", &["verbose", "debug"]);
        let verbose = spec("verbose");
        let errors = validate_queue(&[&quiet, &verbose], [&quiet, &verbose]);
        assert_eq!(
            errors,
            vec![DependencyError::Conflict {
                option: "quiet".to_string(),
                conflicting: vec!["verbose".to_string()],
            }],
        );
    }

    #[test]
    fn test_exclusive_conflicts_with_every_other_queued_name() {
        let reset = spec("reset").exclusive();
        let a = spec("a");
        let b = spec("b");
        let errors = validate_queue(&[&a, &reset, &b], [&a, &reset, &b]);
        assert_eq!(
            errors,
            vec![DependencyError::Conflict {
                option: "reset".to_string(),
                conflicting: vec!["a".to_string(), "b".to_string()],
            }],
        );
    }

    #[test]
    fn test_exclusive_alone_passes() {
        let reset = spec("reset").exclusive();
        assert!(validate_queue(&[&reset], [&reset]).is_empty());
    }

    #[test]
    fn test_required_option_must_be_queued() {
        let must = spec("must").required();
        let other = spec("other");
        let errors = validate_queue(&[&other], [&must, &other]);
        assert_eq!(
            errors,
            vec![DependencyError::RequiredOmitted {
                option: "must".to_string(),
            }],
        );
        assert!(validate_queue(&[&must], [&must, &other]).is_empty());
    }

    #[test]
    fn test_duplicate_queue_entries_checked_once() {
        let solo = requiring("solo", &["gone"]);
        let errors = validate_queue(&[&solo, &solo], [&solo]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_empty_queue_with_no_required_options_passes() {
        let a = spec("a");
        assert!(validate_queue(&[], [&a]).is_empty());
    }
}
