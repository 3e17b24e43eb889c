//! Addressing fields inside `serde_json::Value` trees by dotted paths,
//! e.g. `.metadata.uid` or `.spec.ports[0].nodePort`.

mod error;
pub use error::*;
mod element;
pub use element::Element;
mod ext;
mod path;
pub use ext::FieldpathExt;
pub use path::{Path, PathBuf};
mod parse;
pub use parse::parse;

/// Construct `&'static Path` without parsing, usable in `const`/`static` items
///
/// ```
/// const UID: &fieldpath::Path = fieldpath::path!(."metadata"."uid");
/// assert_eq!(UID.len(), 2);
/// ```
#[macro_export]
macro_rules! path {
    ($(.$text:literal)+) => {{
        const PATH: &$crate::Path = &[$($crate::Element::StaticField($text)),+];
        PATH
    }};
}
