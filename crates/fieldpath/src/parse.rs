use crate::{path::PathBuf, Element};
use peg::str::LineCol;

peg::parser! {
    grammar parser() for str {
        rule bare_field() -> Element
            = "." name:$((!['.' | '[' | '"' | '\n'][_])+) {
                Element::Field(name.to_owned())
            }
        rule quoted_field() -> Element
            = ".\"" name:$(("\\\"" / !['"'][_])+) "\"" {
                Element::Field(name.replace("\\\"", "\""))
            }
        rule index() -> Element
            = "[" idx:$(['0'..='9']+) "]" {?
                idx.parse().map(Element::Index).or(Err("index"))
            }
        rule element() -> Element
            = quoted_field()
            / bare_field()
            / index()

        pub rule path() -> PathBuf
            = path:element()+ { PathBuf(path) }
    }
}

/// Parse path in `.metadata.labels."app.kubernetes.io/name"` notation
pub fn parse(input: &str) -> Result<PathBuf, peg::error::ParseError<LineCol>> {
    parser::path(input)
}
