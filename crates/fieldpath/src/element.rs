use std::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Element {
    Field(String),
    StaticField(&'static str),
    Index(usize),
}

impl Element {
    /// Object key addressed by this element, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Field(field) => Some(field),
            Self::StaticField(field) => Some(field),
            Self::Index(_) => None,
        }
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, n: &str) -> fmt::Result {
    if n.contains(|c| c == '"' || c == '.' || c == '[') {
        write!(f, ".\"{}\"", n.replace('"', "\\\""))
    } else {
        write!(f, ".{}", n)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticField(field) => write_field(f, field),
            Self::Field(field) => write_field(f, field),
            Self::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}
