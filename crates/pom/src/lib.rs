//! # retropom-pom
//!
//! Maven project descriptor handling for retropom.
//!
//! Streams a POM through quick-xml to append the Apache 2.0 `<licenses>` block, re-indenting
//! the output one element per line. Also builds a base descriptor from project coordinates
//! and reads documents back into a small element tree for inspection.

mod element;
mod error;
mod generate;
mod xml_utils;

pub use element::{Element, licenses_block};
pub use error::PomError;
pub use generate::{generate_pom, project_element};
pub use xml_utils::{
    count_licenses_blocks, detect_indent, inject_license, inject_licenses, parse_document,
};
