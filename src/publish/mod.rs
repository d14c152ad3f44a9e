//! Artifact serialization and output routing.

mod publisher;
mod sink;

pub use publisher::ArtifactPublisher;
pub use sink::{
    ArtifactSink,
    DirectSink,
    PlacementPolicy,
    PublishError,
    RoutedSink,
    StagedSink,
};
