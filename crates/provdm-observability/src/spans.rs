//! Span constructors shared by provdm binaries.

use std::path::Path;
use tracing::{info_span, Span};

pub fn load_config(path: &Path) -> Span {
    info_span!("load_config", path = %path.display())
}

pub fn build_example_graph() -> Span {
    info_span!("build_example_graph")
}

/// `None` means the document goes to stdout.
pub fn write_document(path: Option<&Path>) -> Span {
    match path {
        Some(path) => info_span!("write_document", path = %path.display()),
        None => info_span!("write_document", path = "stdout"),
    }
}
