//! SVG markup tree: parsing, querying, mutation and serialization.
//!
//! Templates are parsed once per build into an owned [`SvgElement`] tree,
//! customized in place, then serialized for export.

pub mod node;
pub mod parse;

pub use node::{SVG_NAMESPACE, SvgElement, SvgNode, css_property_name, format_number};
pub use parse::parse_fragment;
