use crate::{Element, Error, Path, Result};
use duplicate::duplicate_item;
use serde_json::Value;

pub trait FieldpathExt: Sized {
    fn get_comp(&self, comp: &Element) -> Result<&Self>;
    fn get_path(&self, path: &Path) -> Result<&Self>;

    fn get_comp_mut(&mut self, comp: &Element) -> Result<&mut Self>;
    fn get_path_mut(&mut self, path: &Path) -> Result<&mut Self>;

    /// Remove value at path if it exists
    ///
    /// Missing parents and type mismatches along the way are treated as
    /// "nothing to clear", so this never fails.
    fn clear_path(&mut self, path: &Path) -> Option<Self>;

    fn has_path(&self, path: &Path) -> bool;
}

fn remove_comp(this: &mut Value, comp: &Element) -> Result<Value> {
    if let Element::Index(idx) = comp {
        return match this {
            Value::Array(arr) if *idx < arr.len() => Ok(arr.remove(*idx)),
            Value::Array(_) => Err(Error::OutOfBounds),
            _ => Err(Error::NotAnArray),
        };
    }
    let key = comp.key().unwrap_or_default();
    match this {
        Value::Object(obj) => obj.remove(key).ok_or(Error::FieldNotFound),
        _ => Err(Error::NotAnObject),
    }
}

impl FieldpathExt for Value {
    #[duplicate_item(
        this_method method reference(type) ret_type;
        [get_comp] [get] [&type] [&Self];
        [get_comp_mut] [get_mut] [&mut type] [&mut Self]
    )]
    fn this_method(self: reference([Self]), comp: &Element) -> Result<ret_type> {
        match comp {
            Element::Field(field) => match self {
                Value::Object(obj) => obj.method(field.as_str()).ok_or(Error::FieldNotFound),
                _ => Err(Error::NotAnObject),
            },
            Element::StaticField(field) => match self {
                Value::Object(obj) => obj.method(*field).ok_or(Error::FieldNotFound),
                _ => Err(Error::NotAnObject),
            },
            Element::Index(idx) => match self {
                Value::Array(items) => items.method(*idx).ok_or(Error::OutOfBounds),
                _ => Err(Error::NotAnArray),
            },
        }
    }

    #[duplicate_item(
        this_method method reference(type) ret_type;
        [get_path] [get_comp] [&type] [&Self];
        [get_path_mut] [get_comp_mut] [&mut type] [&mut Self]
    )]
    fn this_method(self: reference([Self]), path: &Path) -> Result<ret_type> {
        let mut found = self;
        for (idx, elem) in path.iter().enumerate() {
            found = found
                .method(elem)
                .map_err(|e| Error::AtPath((&path[0..idx]).into(), Box::new(e)))?;
        }
        Ok(found)
    }

    fn clear_path(&mut self, path: &Path) -> Option<Self> {
        let (el, parent) = path.split_last()?;
        let this = self.get_path_mut(parent).ok()?;
        remove_comp(this, el).ok()
    }

    fn has_path(&self, path: &Path) -> bool {
        self.get_path(path).is_ok()
    }
}
