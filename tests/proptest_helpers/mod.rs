#![allow(dead_code)]

use std::collections::BTreeSet;

use lhcbdata::{DataFile, Dataset};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// File names drawn from a small pool so that generated datasets overlap.
pub fn arb_file_name() -> impl Strategy<Value = String> {
    (0u8..4, 0u16..12).prop_map(|(dir, n)| format!("/lhcb/data/{dir}/{n:05}.dst"))
}

pub fn arb_data_file() -> impl Strategy<Value = DataFile> {
    (any::<bool>(), arb_file_name()).prop_map(|(logical, name)| {
        if logical {
            DataFile::logical(name)
        } else {
            DataFile::physical(name)
        }
    })
}

pub fn arb_dataset(max_files: usize) -> impl Strategy<Value = Dataset> {
    (prop::collection::vec(arb_data_file(), 0..=max_files), 0u32..4)
        .prop_map(|(files, depth)| Dataset::from_files(files).with_depth(depth))
}

/// Like [`arb_dataset`], with names that may carry surrounding spaces.
pub fn arb_dataset_with_padding(max_files: usize) -> impl Strategy<Value = Dataset> {
    let file = (any::<bool>(), arb_file_name(), "[ \t]{0,2}", "[ \t]{0,2}").prop_map(
        |(logical, name, lead, trail)| {
            let name = format!("{lead}{name}{trail}");
            if logical {
                DataFile::logical(name)
            } else {
                DataFile::physical(name)
            }
        },
    );
    prop::collection::vec(file, 0..=max_files).prop_map(Dataset::from_files)
}

/// Canonical (`LFN:`/`PFN:`) names as a set.
pub fn canonical_set(dataset: &Dataset) -> BTreeSet<String> {
    dataset.full_file_names().into_iter().collect()
}
