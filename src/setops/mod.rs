//! Set algebra over datasets.
//!
//! The combining operations ([`difference`], [`union`], [`intersection`],
//! [`symmetric_difference`]) key files by their canonical `LFN:`/`PFN:`
//! name, so an LFN and a PFN with the same path are different files. The
//! containment tests ([`is_subset`], [`is_superset`]) compare bare names
//! instead, so the same pair counts as equal there. Callers depend on both
//! behaviours; keep them as they are.
//!
//! Results are new datasets that inherit only `depth` from the left
//! operand. Files appear sorted by canonical name.

mod report;

pub use report::{CompareCounts, CompareDetail, CompareReport};

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::dataset::{parse_data_file, Dataset};
use crate::error::LhcbDataError;

/// A combining set operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOp {
    Difference,
    Union,
    Intersection,
    SymmetricDifference,
}

impl FromStr for SetOp {
    type Err = LhcbDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "difference" | "diff" => Ok(SetOp::Difference),
            "union" => Ok(SetOp::Union),
            "intersection" => Ok(SetOp::Intersection),
            "symmetric-difference" | "symmetric_difference" | "symdiff" => {
                Ok(SetOp::SymmetricDifference)
            }
            other => Err(LhcbDataError::UnsupportedOperation(format!(
                "'{}' (supported: difference, union, intersection, symmetric-difference)",
                other
            ))),
        }
    }
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SetOp::Difference => "difference",
            SetOp::Union => "union",
            SetOp::Intersection => "intersection",
            SetOp::SymmetricDifference => "symmetric-difference",
        })
    }
}

/// Applies `op` to `a` and `b`.
pub fn combine(op: SetOp, a: &Dataset, b: &Dataset) -> Result<Dataset, LhcbDataError> {
    let names_a = canonical_names(a);
    let names_b = canonical_names(b);

    let names: Vec<&String> = match op {
        SetOp::Difference => names_a.difference(&names_b).collect(),
        SetOp::Union => names_a.union(&names_b).collect(),
        SetOp::Intersection => names_a.intersection(&names_b).collect(),
        SetOp::SymmetricDifference => names_a.symmetric_difference(&names_b).collect(),
    };

    let files = names
        .into_iter()
        .map(|name| parse_data_file(name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::from_files(files).with_depth(a.depth))
}

/// Files in `a` that are not in `b`.
pub fn difference(a: &Dataset, b: &Dataset) -> Result<Dataset, LhcbDataError> {
    combine(SetOp::Difference, a, b)
}

/// Files in either `a` or `b`.
pub fn union(a: &Dataset, b: &Dataset) -> Result<Dataset, LhcbDataError> {
    combine(SetOp::Union, a, b)
}

/// Files common to `a` and `b`.
pub fn intersection(a: &Dataset, b: &Dataset) -> Result<Dataset, LhcbDataError> {
    combine(SetOp::Intersection, a, b)
}

/// Files in exactly one of `a` and `b`.
pub fn symmetric_difference(a: &Dataset, b: &Dataset) -> Result<Dataset, LhcbDataError> {
    combine(SetOp::SymmetricDifference, a, b)
}

/// Is every file name of `a` also a file name of `b`? Ignores the file kind.
pub fn is_subset(a: &Dataset, b: &Dataset) -> bool {
    bare_names(a).is_subset(&bare_names(b))
}

/// Is every file name of `b` also a file name of `a`? Ignores the file kind.
pub fn is_superset(a: &Dataset, b: &Dataset) -> bool {
    bare_names(a).is_superset(&bare_names(b))
}

/// Compare options.
#[derive(Clone, Debug)]
pub struct CompareOptions {
    pub detail: bool,
    pub max_items: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            detail: false,
            max_items: 20,
        }
    }
}

/// Summarises how `a` and `b` overlap.
pub fn compare(a: &Dataset, b: &Dataset, opts: &CompareOptions) -> CompareReport {
    let names_a = canonical_names(a);
    let names_b = canonical_names(b);

    let only_in_a: Vec<String> = names_a.difference(&names_b).cloned().collect();
    let only_in_b: Vec<String> = names_b.difference(&names_a).cloned().collect();

    let detail = if opts.detail {
        Some(CompareDetail {
            only_in_a: only_in_a.iter().take(opts.max_items).cloned().collect(),
            only_in_b: only_in_b.iter().take(opts.max_items).cloned().collect(),
            max_items: opts.max_items,
        })
    } else {
        None
    };

    CompareReport {
        files: CompareCounts {
            shared: names_a.intersection(&names_b).count(),
            only_in_a: only_in_a.len(),
            only_in_b: only_in_b.len(),
        },
        a_is_subset: is_subset(a, b),
        a_is_superset: is_superset(a, b),
        detail,
    }
}

fn canonical_names(dataset: &Dataset) -> BTreeSet<String> {
    dataset.full_file_names().into_iter().collect()
}

fn bare_names(dataset: &Dataset) -> BTreeSet<String> {
    dataset.file_names().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Persistency;

    fn ds(specs: &[&str]) -> Dataset {
        Dataset::from_specs(specs.iter().copied()).expect("build dataset")
    }

    #[test]
    fn difference_and_intersection() {
        let a = ds(&["lfn:/a", "lfn:/b", "pfn:/c"]);
        let b = ds(&["lfn:/b", "pfn:/d"]);

        assert_eq!(
            difference(&a, &b).expect("diff").full_file_names(),
            vec!["LFN:/a", "PFN:/c"]
        );
        assert_eq!(
            intersection(&a, &b).expect("intersection").full_file_names(),
            vec!["LFN:/b"]
        );
        assert_eq!(
            symmetric_difference(&a, &b)
                .expect("symdiff")
                .full_file_names(),
            vec!["LFN:/a", "PFN:/c", "PFN:/d"]
        );
    }

    #[test]
    fn rebuilt_files_keep_surrounding_whitespace() {
        use crate::dataset::DataFile;

        let a = Dataset::from_files(vec![DataFile::logical("/x "), DataFile::physical(" /y")]);
        let u = union(&a, &Dataset::new()).expect("union");

        let before: BTreeSet<String> = a.file_names().into_iter().collect();
        let after: BTreeSet<String> = u.file_names().into_iter().collect();
        assert_eq!(after, before);
        assert!(u.files().contains(&DataFile::logical("/x ")));
    }

    #[test]
    fn union_collapses_duplicates() {
        let a = ds(&["lfn:/a", "lfn:/a"]);
        let u = union(&a, &a).expect("union");
        assert_eq!(u.full_file_names(), vec!["LFN:/a"]);
    }

    #[test]
    fn kind_matters_for_combination_but_not_containment() {
        let a = ds(&["lfn:/same"]);
        let b = ds(&["pfn:/same"]);

        assert!(intersection(&a, &b).expect("intersection").is_empty());
        assert_eq!(union(&a, &b).expect("union").len(), 2);
        assert!(is_subset(&a, &b));
        assert!(is_superset(&a, &b));
    }

    #[test]
    fn derived_dataset_copies_only_depth() {
        let mut a = ds(&["lfn:/a"])
            .with_depth(4)
            .with_persistency(Persistency::Root)
            .with_xml_catalogue_slice("/tmp/slice.xml");
        a.extend(["lfn:/b"], false).expect("extend");
        let b = Dataset::new().with_depth(9);

        let result = union(&a, &b).expect("union");
        assert_eq!(result.depth, 4);
        assert!(result.persistency.is_none());
        assert!(result.xml_catalogue_slice.is_none());
        assert!(result.metadata().is_none());
    }

    #[test]
    fn containment_edge_cases() {
        let empty = Dataset::new();
        let a = ds(&["lfn:/a", "pfn:/b"]);

        assert!(is_subset(&empty, &a));
        assert!(!is_superset(&empty, &a));
        assert!(is_subset(&a, &a));
        assert!(is_superset(&a, &a));
    }

    #[test]
    fn set_op_parsing() {
        assert_eq!("union".parse::<SetOp>().expect("parse"), SetOp::Union);
        assert_eq!(
            "symmetric-difference".parse::<SetOp>().expect("parse"),
            SetOp::SymmetricDifference
        );
        assert!("xor".parse::<SetOp>().is_err());
    }

    #[test]
    fn compare_counts_and_detail() {
        let a = ds(&["lfn:/a", "lfn:/b"]);
        let b = ds(&["lfn:/b", "pfn:/a"]);

        let report = compare(
            &a,
            &b,
            &CompareOptions {
                detail: true,
                ..Default::default()
            },
        );
        assert_eq!(
            report.files,
            CompareCounts {
                shared: 1,
                only_in_a: 1,
                only_in_b: 1
            }
        );
        assert!(report.a_is_subset);
        let detail = report.detail.expect("detail requested");
        assert_eq!(detail.only_in_a, vec!["LFN:/a"]);
        assert_eq!(detail.only_in_b, vec!["PFN:/a"]);
    }
}
