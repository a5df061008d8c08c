//! Copy-on-write edits of [`Value`] trees.
//!
//! [`modify`] starts an edit at the root of a variable; [`Modify::at`]
//! and [`Modify::key`] extend the path, and a terminal operation
//! rebuilds the containers along that path into a new tree, sharing
//! every subtree the path does not touch. Other clones of the original
//! value are never affected.
//!
//! ```
//! use exactjson::{modify, parse};
//!
//! let mut config = parse(r#"{"a":[1,2,3],"o":{}}"#)?;
//! modify(&mut config).key("a").at(2).assign(123.into())?;
//! modify(&mut config).key("o").key("foo").assign("bar".into())?;
//! assert_eq!(exactjson::encode(&config), r#"{"a":[1,2,123],"o":{"foo":"bar"}}"#);
//! # Ok::<(), exactjson::Error>(())
//! ```

use std::collections::BTreeSet;

use crate::error::{Error, ErrorKind};
use crate::value::{ObjectEntry, Value};

/// One step of an edit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// A pending edit: a target variable plus a path into it.
///
/// Created by [`modify`]; consumed by one of the terminal operations.
#[derive(Debug)]
pub struct Modify<'a> {
    root: &'a mut Value,
    path: Vec<PathSegment>,
}

/// Begin an edit of `root`.
pub fn modify(root: &mut Value) -> Modify<'_> {
    Modify {
        root,
        path: Vec::new(),
    }
}

impl Modify<'_> {
    /// Descend to an array index. The index may be beyond the end of
    /// the array; assigning there extends the array with nulls.
    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }

    /// Descend to an object key. The key need not exist yet; assigning
    /// there creates it.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.path.push(PathSegment::Key(key.into()));
        self
    }

    /// The value currently at the path. Fails where the failing access
    /// path would: wrong container kinds, absent keys, out-of-range
    /// indexes.
    pub fn current(&self) -> Result<&Value, Error> {
        let mut value: &Value = self.root;
        for segment in &self.path {
            value = match segment {
                PathSegment::Index(index) => value.element(*index)?,
                PathSegment::Key(key) => value.member(key)?,
            };
        }
        Ok(value)
    }

    /// Replace the value at the path.
    ///
    /// The final container need not already hold the addressed slot: an
    /// absent key is created, and an out-of-range index extends the
    /// array with nulls up to it. Every ancestor along the path must
    /// exist and be the right kind of container.
    pub fn assign(self, new_value: Value) -> Result<(), Error> {
        let Modify { root, path } = self;
        let rebuilt = match path.split_last() {
            None => new_value,
            Some((last, ancestors)) => {
                let mut pending = Some(new_value);
                rebuild(root, ancestors, &mut |container| {
                    let assigned = pending.take().unwrap_or_default();
                    assign_at(container, last, assigned)
                })?
            }
        };
        *root = rebuilt;
        Ok(())
    }

    /// Append one element to the array at the path.
    pub fn push(self, value: Value) -> Result<(), Error> {
        let len = self.current()?.as_array()?.len();
        self.at(len).assign(value)
    }

    /// Remove the element or member the path addresses.
    pub fn erase(self) -> Result<(), Error> {
        let Modify { root, path } = self;
        let Some((last, ancestors)) = path.split_last() else {
            return Err(Error::new(ErrorKind::TypeMismatch {
                op: "erase",
                actual: root.kind_name(),
            }));
        };
        let rebuilt = match last {
            PathSegment::Index(target) => rebuild(root, ancestors, &mut |container| {
                retain_elements(container, |index, _| index != *target)
            })?,
            PathSegment::Key(target) => rebuild(root, ancestors, &mut |container| {
                retain_members(container, |key, _| key != target)
            })?,
        };
        *root = rebuilt;
        Ok(())
    }

    /// Remove `count` elements of the array starting at the addressed
    /// index.
    pub fn erase_count(self, count: usize) -> Result<(), Error> {
        let Modify { root, path } = self;
        let Some((PathSegment::Index(start), ancestors)) = path.split_last() else {
            return Err(Error::new(ErrorKind::TypeMismatch {
                op: "erase_count",
                actual: root.kind_name(),
            }));
        };
        let rebuilt = rebuild(root, ancestors, &mut |container| {
            retain_elements(container, |index, _| {
                index < *start || index - start >= count
            })
        })?;
        *root = rebuilt;
        Ok(())
    }

    /// Remove the elements of the array at the path whose index and
    /// value satisfy the predicate.
    pub fn erase_indexes_if(
        self,
        mut predicate: impl FnMut(usize, &Value) -> bool,
    ) -> Result<(), Error> {
        let Modify { root, path } = self;
        let rebuilt = rebuild(root, &path, &mut |container| {
            retain_elements(container, |index, element| !predicate(index, element))
        })?;
        *root = rebuilt;
        Ok(())
    }

    /// Remove the members of the object at the path whose key and value
    /// satisfy the predicate.
    pub fn erase_keys_if(
        self,
        mut predicate: impl FnMut(&str, &Value) -> bool,
    ) -> Result<(), Error> {
        let Modify { root, path } = self;
        let rebuilt = rebuild(root, &path, &mut |container| {
            retain_members(container, |key, member| !predicate(key, member))
        })?;
        *root = rebuilt;
        Ok(())
    }

    /// Remove the given indexes from the array at the path.
    pub fn erase_indexes(self, indexes: &BTreeSet<usize>) -> Result<(), Error> {
        self.erase_indexes_if(|index, _| indexes.contains(&index))
    }

    /// Remove the given keys from the object at the path.
    pub fn erase_keys(self, keys: &BTreeSet<String>) -> Result<(), Error> {
        self.erase_keys_if(|key, _| keys.contains(key))
    }

    /// Splice one value into the array before the addressed index.
    pub fn insert_at(self, value: Value) -> Result<(), Error> {
        self.insert_all_at(vec![value])
    }

    /// Splice values into the array before the addressed index. An
    /// index beyond the end extends the array with nulls first.
    pub fn insert_all_at(self, values: Vec<Value>) -> Result<(), Error> {
        let Modify { root, path } = self;
        let Some((PathSegment::Index(target), ancestors)) = path.split_last() else {
            return Err(Error::new(ErrorKind::TypeMismatch {
                op: "insert_at",
                actual: root.kind_name(),
            }));
        };
        let mut pending = Some(values);
        let rebuilt = rebuild(root, ancestors, &mut |container| {
            let body = container.as_array()?;
            let inserted = pending.take().unwrap_or_default();
            let mut items: Vec<Value>;
            if *target < body.len() {
                items = Vec::with_capacity(body.len() + inserted.len());
                items.extend_from_slice(&body[..*target]);
                items.extend(inserted);
                items.extend_from_slice(&body[*target..]);
            } else {
                items = body.to_vec();
                items.resize(*target, Value::Null);
                items.extend(inserted);
            }
            Ok(Value::array(items))
        })?;
        *root = rebuilt;
        Ok(())
    }

    /// Insert or replace several members of the object at the path at
    /// once.
    pub fn assign_entries(self, new_entries: Vec<(String, Value)>) -> Result<(), Error> {
        let Modify { root, path } = self;
        let mut pending = Some(new_entries);
        let rebuilt = rebuild(root, &path, &mut |container| {
            let mut entries = container.as_object()?.to_vec();
            for (key, value) in pending.take().unwrap_or_default() {
                entries.push((key.into(), value));
            }
            Ok(Value::object_from_entries(entries))
        })?;
        *root = rebuilt;
        Ok(())
    }
}

/// Rebuild the containers along `path`, applying `leaf` to the value at
/// its end and re-wrapping the result on the way back up. Subtrees off
/// the path are shared, not copied.
fn rebuild(
    value: &Value,
    path: &[PathSegment],
    leaf: &mut dyn FnMut(&Value) -> Result<Value, Error>,
) -> Result<Value, Error> {
    let Some((segment, rest)) = path.split_first() else {
        return leaf(value);
    };
    match segment {
        PathSegment::Index(index) => {
            let body = value.as_array()?;
            let replacement = rebuild(value.element(*index)?, rest, leaf)?;
            let mut items = body.to_vec();
            items[*index] = replacement;
            Ok(Value::array(items))
        }
        PathSegment::Key(key) => {
            let body = value.as_object()?;
            let replacement = rebuild(value.member(key)?, rest, leaf)?;
            let mut entries = body.to_vec();
            entries.push((key.as_str().into(), replacement));
            Ok(Value::object_from_entries(entries))
        }
    }
}

fn assign_at(container: &Value, segment: &PathSegment, new_value: Value) -> Result<Value, Error> {
    match segment {
        PathSegment::Index(index) => {
            let body = container.as_array()?;
            let mut items = body.to_vec();
            if *index < items.len() {
                items[*index] = new_value;
            } else {
                items.resize(*index, Value::Null);
                items.push(new_value);
            }
            Ok(Value::array(items))
        }
        PathSegment::Key(key) => {
            let mut entries = container.as_object()?.to_vec();
            entries.push((key.as_str().into(), new_value));
            Ok(Value::object_from_entries(entries))
        }
    }
}

fn retain_elements(
    container: &Value,
    mut keep: impl FnMut(usize, &Value) -> bool,
) -> Result<Value, Error> {
    let body = container.as_array()?;
    let items = body
        .iter()
        .enumerate()
        .filter(|(index, element)| keep(*index, element))
        .map(|(_, element)| element.clone())
        .collect();
    Ok(Value::Array(items))
}

fn retain_members(
    container: &Value,
    mut keep: impl FnMut(&str, &Value) -> bool,
) -> Result<Value, Error> {
    let body = container.as_object()?;
    let entries: Vec<ObjectEntry> = body
        .iter()
        .filter(|(key, member)| keep(key, member))
        .cloned()
        .collect();
    // Filtering a canonical body keeps it canonical.
    Ok(Value::Object(entries.into()))
}
