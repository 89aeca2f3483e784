//! Source file parsing.
//!
//! - `jsx`: JSX/TSX/TS/JS parser (swc), extracted comments, dialect selection
//!   and the per-context parse cache.

pub mod jsx;

pub use jsx::{
    Dialect, ExtractedComments, ParsedArtifact, parse, parse_cache_key, parse_source,
    parse_with_cache,
};
