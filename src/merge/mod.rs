//! Fragment discovery classification and merging.

pub mod classifier;
pub mod keyset;
mod merger;

pub use classifier::{
    LocaleClassifier,
    PathSegmentClassifier,
};
pub use merger::{
    FragmentMerger,
    MergeOutcome,
};
