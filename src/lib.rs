//! Chess rules engine: board positions, legal move generation, check,
//! checkmate and stalemate detection, and a compact positional move notation.
//! For more information, see [README].
//!
//! [README]: https://docs.rs/crate/wuki/latest/source/README.md

// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]

pub mod chess;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the engine version on startup. Goes to stderr: stdout only carries
/// command responses.
pub fn print_engine_info() {
    eprintln!("Wuki chess rules engine {}", engine_version());
    eprintln!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        eprintln!("Warning: built with uncommitted changes");
    }
}
