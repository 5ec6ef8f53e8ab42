//! Page inspection: repository identity from the URL, metadata from the markup

pub mod location;
pub mod metadata;

pub use location::{extract_repo_info, RepoExtractor, DEFAULT_HOST};
pub use metadata::{
    collect_metadata, FixedMetadata, LayeredMetadata, PageMetadataProvider, StructuredMetadata,
    TextScrapeMetadata,
};
