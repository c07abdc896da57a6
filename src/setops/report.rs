//! Comparison report types and text formatting.

use serde::Serialize;
use std::fmt;

/// Summary of how two datasets relate.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CompareReport {
    /// Counts over canonical (`LFN:`/`PFN:`) names.
    pub files: CompareCounts,
    /// Every bare name of A appears in B.
    pub a_is_subset: bool,
    /// Every bare name of B appears in A.
    pub a_is_superset: bool,
    /// Optional detail section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<CompareDetail>,
}

/// Shared / only-in-A / only-in-B counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompareCounts {
    pub shared: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
}

/// Optional detail section for text/json output.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CompareDetail {
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
    pub max_items: usize,
}

impl fmt::Display for CompareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Files:    {} shared, {} only in A, {} only in B",
            self.files.shared, self.files.only_in_a, self.files.only_in_b
        )?;
        writeln!(
            f,
            "Subset:   {} (by bare name)",
            if self.a_is_subset { "yes" } else { "no" }
        )?;
        writeln!(
            f,
            "Superset: {} (by bare name)",
            if self.a_is_superset { "yes" } else { "no" }
        )?;

        if let Some(detail) = &self.detail {
            write_names(f, "Only in A", &detail.only_in_a, detail.max_items)?;
            write_names(f, "Only in B", &detail.only_in_b, detail.max_items)?;
        }

        Ok(())
    }
}

fn write_names(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    names: &[String],
    max_items: usize,
) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title} (showing first {max_items}):")?;
    if names.is_empty() {
        return writeln!(f, "  - (none)");
    }
    for name in names {
        writeln!(f, "  - {name}")?;
    }
    Ok(())
}
