//! Gaudi job options for a dataset.
//!
//! Two dialects are generated. The new style hands every file to
//! `IOExtension(...).inputFiles([...])`; the old style sets
//! `EventSelector().Input` with one `DATAFILE='...' <datatype>` entry per
//! file. With ROOT persistency only the new style is emitted. Otherwise the
//! new style is wrapped in `try:` and the old style follows under
//! `except ImportError:` for older software stacks.

mod datatype;

pub use datatype::{compile_glob, glob_matches, DatatypeMatcher};

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::dataset::{Dataset, Persistency};
use crate::error::LhcbDataError;

const NEW_STYLE_ROOT: &str =
    "\n#new method\nfrom GaudiConf import IOExtension\nIOExtension(\"ROOT\").inputFiles([";
const NEW_STYLE_POOL: &str = "\ntry:\n    #new method\n    from GaudiConf import IOExtension\n    IOExtension(\"POOL\").inputFiles([";
const NEW_STYLE_DEFAULT: &str = "\ntry:\n    #new method\n    from GaudiConf import IOExtension\n    IOExtension().inputFiles([";
const OLD_STYLE: &str = "\nexcept ImportError:\n    #Use previous method\n    from Gaudi.Configuration import EventSelector\n    EventSelector().Input=[";
const ENTRY_INDENT: &str = "\n        ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dialect {
    Root,
    Pool,
    Default,
}

impl Dialect {
    fn resolve(persistency: Option<&Persistency>) -> Self {
        match persistency {
            Some(Persistency::Root) => Dialect::Root,
            Some(Persistency::Pool) => Dialect::Pool,
            None => Dialect::Default,
            Some(Persistency::Other(value)) => {
                warn!(
                    persistency = %value,
                    "unknown dataset persistency technology, reverting to none"
                );
                Dialect::Default
            }
        }
    }

    fn new_style_header(self) -> &'static str {
        match self {
            Dialect::Root => NEW_STYLE_ROOT,
            Dialect::Pool => NEW_STYLE_POOL,
            Dialect::Default => NEW_STYLE_DEFAULT,
        }
    }

    fn new_style_footer(self) -> &'static str {
        match self {
            Dialect::Root => "\n], clear=True)",
            _ => "\n    ], clear=True)",
        }
    }
}

/// Rendered option blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedOptions {
    /// `IOExtension` block, including its header.
    pub new_style: String,
    /// `except ImportError:` fallback; absent for ROOT persistency.
    pub old_style: Option<String>,
}

impl RenderedOptions {
    pub fn into_string(self) -> String {
        match self.old_style {
            Some(old) => self.new_style + &old,
            None => self.new_style,
        }
    }
}

/// Renders both option blocks, or `None` for an empty dataset.
///
/// `persistency` overrides the dataset's own setting when given.
pub fn render_options(
    dataset: &Dataset,
    matcher: &DatatypeMatcher,
    persistency: Option<&Persistency>,
) -> Option<RenderedOptions> {
    if dataset.is_empty() {
        return None;
    }

    let dialect = Dialect::resolve(persistency.or(dataset.persistency.as_ref()));

    let mut new_entries = String::new();
    let mut old_entries = String::new();
    for file in dataset.iter() {
        let full_name = file.full_name();
        let datatype = matcher.datatype_for(file.name());

        new_entries.push_str(ENTRY_INDENT);
        new_entries.push_str(&format!(" \"{}\",", full_name));
        old_entries.push_str(ENTRY_INDENT);
        old_entries.push_str(&format!(" \"DATAFILE='{}' {}\",", full_name, datatype));
    }

    new_entries.pop();
    new_entries.push_str(dialect.new_style_footer());
    old_entries.pop();
    old_entries.push_str("\n    ]");

    let new_style = format!("{}{}", dialect.new_style_header(), new_entries);
    let old_style = match dialect {
        Dialect::Root => None,
        _ => Some(format!("{}{}", OLD_STYLE, old_entries)),
    };

    Some(RenderedOptions {
        new_style,
        old_style,
    })
}

/// Returns the Gaudi options for the dataset; empty for an empty dataset.
pub fn options_string(
    dataset: &Dataset,
    matcher: &DatatypeMatcher,
    persistency: Option<&Persistency>,
) -> String {
    render_options(dataset, matcher, persistency)
        .map(RenderedOptions::into_string)
        .unwrap_or_default()
}

/// Writes the Gaudi options for the dataset to `path`.
///
/// With ROOT persistency only the new-style block is written. An empty
/// dataset writes nothing and creates no file; the return value says
/// whether a file was written.
pub fn write_options(
    dataset: &Dataset,
    matcher: &DatatypeMatcher,
    persistency: Option<&Persistency>,
    path: &Path,
) -> Result<bool, LhcbDataError> {
    let Some(rendered) = render_options(dataset, matcher, persistency) else {
        tracing::debug!(path = %path.display(), "empty dataset, no options file written");
        return Ok(false);
    };
    fs::write(path, rendered.into_string())?;
    Ok(true)
}
