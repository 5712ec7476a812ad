//! Turns the stream of table headers, array-of-tables headers and key/value pairs produced while
//! scanning a document into the final [`Table`].
//!
//! Tables and arrays-of-tables are tracked in a private shadow tree ([`Node`]) while the document
//! is being read, so that redefinitions, implicit/explicit promotion, and array-of-tables
//! collisions can be checked before anything is handed to the caller. A value that is already
//! fully formed when it is inserted (an inline table, an array literal, or a scalar) becomes an
//! opaque [`Node::Leaf`] immediately: nothing further in the document can reach back inside it,
//! which is exactly what "frozen" means for such a value, so no separate frozen flag is needed
//! for those cases.

use alloc::borrow::Cow;
use alloc::collections::btree_map::Entry;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;

use crate::{Array, Error, Table, Value};
use crate::error::SemanticError;

/// How a path should be walked while it is being resolved against the shadow tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DescendPolicy {
    /// Walking a `[table]` or `[[array-of-tables]]` header path, from the document root. An
    /// array-of-tables encountered along the way (other than at the final segment) descends into
    /// its last element, and any intermediate table created along the way may later be reopened
    /// by another header.
    Header,
    /// Walking a dotted key on a key/value line, from the current table. Tables created along the
    /// way are implicit and may never be reopened by a `[header]` later in the document. An
    /// array-of-tables may not appear along a key/value line's path at all.
    KvLine,
    /// Walking a dotted key inside an inline table literal. Behaves like `KvLine` scoped to a
    /// throwaway tree that is frozen into a `Value::Table` as soon as the literal closes.
    InlineTable,
}

#[derive(Debug)]
pub(crate) enum Node<'a> {
    Table(TableNode<'a>),
    ArrayOfTables(Vec<TableNode<'a>>),
    Leaf(Value<'a>),
}

#[derive(Debug)]
pub(crate) struct TableNode<'a> {
    children: BTreeMap<Cow<'a, str>, Node<'a>>,
    /// Set once a `[table]` header has named this table directly.
    explicit: bool,
    /// Whether this table may later be reopened by a `[header]`: true for the root, for tables
    /// created while walking a header path, and for array-of-tables elements; false for tables
    /// created implicitly by a dotted key on a key/value line.
    header_openable: bool,
}

impl<'a> TableNode<'a> {
    fn new(header_openable: bool) -> Self {
        Self {
            children: BTreeMap::new(),
            explicit: false,
            header_openable,
        }
    }
}

fn semantic<T>(message: alloc::string::String) -> Result<T, Error> {
    Err(Error::Semantic(SemanticError::new(message)))
}

/// The document under construction. `current` is the path (from `root`) of the table that
/// key/value lines are relative to; it is re-resolved from `root` on every use rather than held
/// as a live reference, since header lines always walk from `root` and can grow arrays-of-tables
/// that `current`'s path runs through.
pub(crate) struct Document<'a> {
    root: TableNode<'a>,
    current: Vec<Cow<'a, str>>,
}

impl<'a> Document<'a> {
    pub(crate) fn new() -> Self {
        Self {
            root: TableNode::new(true),
            current: Vec::new(),
        }
    }

    fn current_table_mut(&mut self) -> &mut TableNode<'a> {
        resolve(&mut self.root, &self.current)
    }

    /// Handle a `[a.b.c]` header line.
    pub(crate) fn open_table(&mut self, parts: Vec<Cow<'a, str>>) -> Result<(), Error> {
        debug_assert!(!parts.is_empty());
        let (last, init) = parts.split_last().expect("non-empty header path");
        let parent = walk_to_parent(&mut self.root, init, DescendPolicy::Header)?;
        match parent.children.entry(last.clone()) {
            Entry::Vacant(v) => {
                let mut t = TableNode::new(true);
                t.explicit = true;
                v.insert(Node::Table(t));
            }
            Entry::Occupied(mut o) => match o.get_mut() {
                Node::Table(t) => {
                    if t.explicit {
                        return semantic(format!("table `{}` is defined more than once", last));
                    }
                    if !t.header_openable {
                        return semantic(format!(
                            "table `{last}` was already defined implicitly by a dotted key and cannot be reopened with a header"
                        ));
                    }
                    t.explicit = true;
                }
                Node::ArrayOfTables(_) => {
                    return semantic(format!(
                        "`{last}` is already defined as an array of tables"
                    ));
                }
                Node::Leaf(v) => {
                    return semantic(format!(
                        "`{last}` is already defined as a {}",
                        v.type_str()
                    ));
                }
            },
        }
        self.current = parts;
        Ok(())
    }

    /// Handle a `[[a.b.c]]` header line.
    pub(crate) fn open_array_of_tables(&mut self, parts: Vec<Cow<'a, str>>) -> Result<(), Error> {
        debug_assert!(!parts.is_empty());
        let (last, init) = parts.split_last().expect("non-empty header path");
        let parent = walk_to_parent(&mut self.root, init, DescendPolicy::Header)?;
        match parent.children.entry(last.clone()) {
            Entry::Vacant(v) => {
                v.insert(Node::ArrayOfTables(alloc::vec![TableNode::new(true)]));
            }
            Entry::Occupied(mut o) => match o.get_mut() {
                Node::ArrayOfTables(elems) => {
                    elems.push(TableNode::new(true));
                }
                Node::Table(_) => {
                    return semantic(format!("`{last}` is already defined as a table"));
                }
                Node::Leaf(v) => {
                    return semantic(format!(
                        "`{last}` is already defined as a {}",
                        v.type_str()
                    ));
                }
            },
        }
        self.current = parts;
        Ok(())
    }

    /// Handle a `a.b.c = value` key/value line relative to the current table.
    pub(crate) fn assign(&mut self, parts: Vec<Cow<'a, str>>, value: Value<'a>) -> Result<(), Error> {
        debug_assert!(!parts.is_empty());
        let (last, init) = parts.split_last().expect("non-empty key path");
        let current_path = self.current.clone();
        let current = resolve(&mut self.root, &current_path);
        let parent = walk_to_parent(current, init, DescendPolicy::KvLine)?;
        if parent.children.contains_key(last.as_ref()) {
            return semantic(format!("key `{last}` is defined more than once"));
        }
        parent.children.insert(last.clone(), Node::Leaf(value));
        Ok(())
    }

    /// Consume the document, producing the final public [`Table`].
    pub(crate) fn finish(self) -> Table<'a> {
        table_from_node(self.root)
    }
}

/// Build an inline table literal (`{ ... }`) in its own throwaway tree, then freeze it.
pub(crate) struct InlineTableBuilder<'a> {
    root: TableNode<'a>,
}

impl<'a> InlineTableBuilder<'a> {
    pub(crate) fn new() -> Self {
        Self {
            root: TableNode::new(false),
        }
    }

    pub(crate) fn assign(&mut self, parts: Vec<Cow<'a, str>>, value: Value<'a>) -> Result<(), Error> {
        debug_assert!(!parts.is_empty());
        let (last, init) = parts.split_last().expect("non-empty key path");
        let parent = walk_to_parent(&mut self.root, init, DescendPolicy::InlineTable)?;
        if parent.children.contains_key(last.as_ref()) {
            return semantic(format!("key `{last}` is defined more than once"));
        }
        parent.children.insert(last.clone(), Node::Leaf(value));
        Ok(())
    }

    pub(crate) fn finish(self) -> Table<'a> {
        table_from_node(self.root)
    }
}

fn resolve<'n, 'a>(root: &'n mut TableNode<'a>, path: &[Cow<'a, str>]) -> &'n mut TableNode<'a> {
    let mut node = root;
    for part in path {
        node = match node
            .children
            .get_mut(part.as_ref())
            .expect("current path always resolves")
        {
            Node::Table(t) => t,
            Node::ArrayOfTables(elems) => elems
                .last_mut()
                .expect("array of tables is never left empty"),
            Node::Leaf(_) => unreachable!("current path never runs through a leaf"),
        };
    }
    node
}

fn walk_to_parent<'n, 'a>(
    table: &'n mut TableNode<'a>,
    parts: &[Cow<'a, str>],
    policy: DescendPolicy,
) -> Result<&'n mut TableNode<'a>, Error> {
    let mut current = table;
    for part in parts {
        current = step(current, part, policy)?;
    }
    Ok(current)
}

fn step<'n, 'a>(
    table: &'n mut TableNode<'a>,
    part: &Cow<'a, str>,
    policy: DescendPolicy,
) -> Result<&'n mut TableNode<'a>, Error> {
    match table.children.entry(part.clone()) {
        Entry::Vacant(v) => {
            let openable = matches!(policy, DescendPolicy::Header);
            match v.insert(Node::Table(TableNode::new(openable))) {
                Node::Table(t) => Ok(t),
                _ => unreachable!(),
            }
        }
        Entry::Occupied(o) => match o.into_mut() {
            Node::Table(t) => Ok(t),
            Node::ArrayOfTables(elems) => match policy {
                DescendPolicy::Header => Ok(elems
                    .last_mut()
                    .expect("array of tables is never left empty")),
                _ => semantic(format!(
                    "`{part}` is an array of tables and cannot be used as part of a dotted key"
                )),
            },
            Node::Leaf(v) => {
                let what = if v.is_table_or_array() {
                    "fixed by an inline literal"
                } else {
                    "a value"
                };
                semantic(format!("`{part}` is already defined as {what}"))
            }
        },
    }
}

fn table_from_node(node: TableNode<'_>) -> Table<'_> {
    node.children
        .into_iter()
        .map(|(k, v)| (k, value_from_node(v)))
        .collect()
}

fn value_from_node(node: Node<'_>) -> Value<'_> {
    match node {
        Node::Table(t) => Value::Table(table_from_node(t)),
        Node::ArrayOfTables(elems) => {
            Value::Array(elems.into_iter().map(|t| Value::Table(table_from_node(t))).collect::<Array<'_>>())
        }
        Node::Leaf(v) => v,
    }
}
