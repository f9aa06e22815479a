use std::collections::HashSet;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use grove_path::Path;

use crate::error::{StoreError, StoreResult};
use crate::traits::HierStore;
use crate::value::{Attributes, NodeKind, Value};

/// A node in the in-memory tree. Children keep insertion order, which is the
/// store's native ordering contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Node {
    Group {
        children: Vec<(String, Node)>,
        attrs: Attributes,
    },
    Dataset {
        value: Value,
        attrs: Attributes,
    },
}

impl Node {
    pub(crate) fn empty_group() -> Self {
        Node::Group {
            children: Vec::new(),
            attrs: Attributes::new(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Node::Group { .. } => NodeKind::Group,
            Node::Dataset { .. } => NodeKind::Dataset,
        }
    }

    fn attrs(&self) -> &Attributes {
        match self {
            Node::Group { attrs, .. } | Node::Dataset { attrs, .. } => attrs,
        }
    }

    fn attrs_mut(&mut self) -> &mut Attributes {
        match self {
            Node::Group { attrs, .. } | Node::Dataset { attrs, .. } => attrs,
        }
    }

    fn find(&self, path: &Path) -> Option<&Node> {
        let mut node = self;
        for segment in path.segments() {
            match node {
                Node::Group { children, .. } => {
                    node = children
                        .iter()
                        .find(|(name, _)| name == segment)
                        .map(|(_, child)| child)?;
                }
                Node::Dataset { .. } => return None,
            }
        }
        Some(node)
    }

    fn find_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let mut node = self;
        for segment in path.segments() {
            match node {
                Node::Group { children, .. } => {
                    node = children
                        .iter_mut()
                        .find(|(name, _)| name == segment)
                        .map(|(_, child)| child)?;
                }
                Node::Dataset { .. } => return None,
            }
        }
        Some(node)
    }
}

/// In-memory hierarchical store.
///
/// Intended for tests and embedding. Children are kept in insertion order so
/// walks are deterministic. Individual paths can be marked unreadable with
/// [`MemoryStore::poison`] to exercise tolerant-scan behavior.
pub struct MemoryStore {
    root: RwLock<Node>,
    poisoned: RwLock<HashSet<Path>>,
}

impl MemoryStore {
    /// Create a new empty store (a bare root group).
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Node::empty_group()),
            poisoned: RwLock::new(HashSet::new()),
        }
    }

    /// Mark `path` unreadable: subsequent reads and child listings on it
    /// fail with `Unreadable`, as if the region were corrupted.
    pub fn poison(&self, path: Path) {
        self.poisoned.write().expect("lock poisoned").insert(path);
    }

    fn check_readable(&self, path: &Path) -> StoreResult<()> {
        if self.poisoned.read().expect("lock poisoned").contains(path) {
            return Err(StoreError::Unreadable {
                path: path.clone(),
                reason: "simulated corrupted region".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn to_node(&self) -> Node {
        self.root.read().expect("lock poisoned").clone()
    }

    pub(crate) fn from_node(node: Node) -> Self {
        Self {
            root: RwLock::new(node),
            poisoned: RwLock::new(HashSet::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HierStore for MemoryStore {
    fn kind_of(&self, path: &Path) -> StoreResult<Option<NodeKind>> {
        let root = self.root.read().expect("lock poisoned");
        Ok(root.find(path).map(Node::kind))
    }

    fn list_children(&self, path: &Path) -> StoreResult<Vec<(String, NodeKind)>> {
        self.check_readable(path)?;
        let root = self.root.read().expect("lock poisoned");
        let node = root.find(path).ok_or_else(|| StoreError::NotFound(path.clone()))?;
        match node {
            Node::Group { children, .. } => Ok(children
                .iter()
                .map(|(name, child)| (name.clone(), child.kind()))
                .collect()),
            Node::Dataset { .. } => Err(StoreError::NotAGroup(path.clone())),
        }
    }

    fn read_dataset(&self, path: &Path) -> StoreResult<Value> {
        self.check_readable(path)?;
        let root = self.root.read().expect("lock poisoned");
        let node = root.find(path).ok_or_else(|| StoreError::NotFound(path.clone()))?;
        match node {
            Node::Dataset { value, .. } => Ok(value.clone()),
            Node::Group { .. } => Err(StoreError::NotADataset(path.clone())),
        }
    }

    fn write_dataset(&self, path: &Path, value: Value) -> StoreResult<()> {
        let name = path
            .name()
            .ok_or_else(|| StoreError::AlreadyExists(Path::root()))?
            .to_string();
        let parent = path.parent().expect("non-root path has a parent");

        let mut root = self.root.write().expect("lock poisoned");
        let parent_node = root
            .find_mut(&parent)
            .ok_or(StoreError::NotFound(parent.clone()))?;
        let children = match parent_node {
            Node::Group { children, .. } => children,
            Node::Dataset { .. } => return Err(StoreError::NotAGroup(parent)),
        };

        let fresh = Node::Dataset {
            value,
            attrs: Attributes::new(),
        };
        match children.iter_mut().find(|(n, _)| *n == name) {
            Some((_, child @ Node::Dataset { .. })) => {
                *child = fresh;
                Ok(())
            }
            Some((_, Node::Group { .. })) => Err(StoreError::AlreadyExists(path.clone())),
            None => {
                children.push((name, fresh));
                Ok(())
            }
        }
    }

    fn read_attrs(&self, path: &Path) -> StoreResult<Attributes> {
        self.check_readable(path)?;
        let root = self.root.read().expect("lock poisoned");
        let node = root.find(path).ok_or_else(|| StoreError::NotFound(path.clone()))?;
        Ok(node.attrs().clone())
    }

    fn write_attrs(&self, path: &Path, attrs: Attributes) -> StoreResult<()> {
        let mut root = self.root.write().expect("lock poisoned");
        let node = root
            .find_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;
        *node.attrs_mut() = attrs;
        Ok(())
    }

    fn create_group(&self, path: &Path) -> StoreResult<()> {
        let mut root = self.root.write().expect("lock poisoned");
        let mut node = &mut *root;
        let mut walked = Path::root();
        for segment in path.segments() {
            walked = walked.child(segment).expect("segment already validated");
            let children = match node {
                Node::Group { children, .. } => children,
                Node::Dataset { .. } => return Err(StoreError::NotAGroup(walked)),
            };
            // Index lookup rather than find() to satisfy the borrow checker.
            let pos = children.iter().position(|(n, _)| n == segment);
            let idx = match pos {
                Some(i) => i,
                None => {
                    children.push((segment.clone(), Node::empty_group()));
                    children.len() - 1
                }
            };
            node = &mut children[idx].1;
        }
        match node {
            Node::Group { .. } => Ok(()),
            Node::Dataset { .. } => Err(StoreError::AlreadyExists(path.clone())),
        }
    }

    fn remove(&self, path: &Path) -> StoreResult<()> {
        let name = path.name().ok_or(StoreError::IsRoot)?;
        let parent = path.parent().expect("non-root path has a parent");

        let mut root = self.root.write().expect("lock poisoned");
        let parent_node = root
            .find_mut(&parent)
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;
        let children = match parent_node {
            Node::Group { children, .. } => children,
            Node::Dataset { .. } => return Err(StoreError::NotFound(path.clone())),
        };
        let pos = children
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;
        children.remove(pos);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: &str) -> Path {
        Path::parse(raw).unwrap()
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    #[test]
    fn root_always_exists() {
        let store = MemoryStore::new();
        assert_eq!(store.kind_of(&Path::root()).unwrap(), Some(NodeKind::Group));
        assert!(store.list_children(&Path::root()).unwrap().is_empty());
    }

    #[test]
    fn create_group_makes_intermediates() {
        let store = MemoryStore::new();
        store.create_group(&p("/a/b/c")).unwrap();
        assert_eq!(store.kind_of(&p("/a")).unwrap(), Some(NodeKind::Group));
        assert_eq!(store.kind_of(&p("/a/b")).unwrap(), Some(NodeKind::Group));
        assert_eq!(store.kind_of(&p("/a/b/c")).unwrap(), Some(NodeKind::Group));
    }

    #[test]
    fn create_group_is_idempotent() {
        let store = MemoryStore::new();
        store.create_group(&p("/a/b")).unwrap();
        store.create_group(&p("/a/b")).unwrap();
        assert_eq!(store.list_children(&p("/a")).unwrap().len(), 1);
    }

    #[test]
    fn create_group_through_dataset_fails() {
        let store = MemoryStore::new();
        store.write_dataset(&p("/d"), Value::scalar_int(1)).unwrap();
        assert!(matches!(
            store.create_group(&p("/d/x")),
            Err(StoreError::NotAGroup(_))
        ));
        assert!(matches!(
            store.create_group(&p("/d")),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Datasets
    // -----------------------------------------------------------------------

    #[test]
    fn write_and_read_dataset() {
        let store = MemoryStore::new();
        let value = Value::float_1d(vec![1.0, 2.0]);
        store.write_dataset(&p("/x"), value.clone()).unwrap();
        assert_eq!(store.read_dataset(&p("/x")).unwrap(), value);
        assert_eq!(store.kind_of(&p("/x")).unwrap(), Some(NodeKind::Dataset));
    }

    #[test]
    fn write_dataset_requires_parent() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.write_dataset(&p("/a/x"), Value::scalar_int(0)),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn write_dataset_replaces_existing() {
        let store = MemoryStore::new();
        store.write_dataset(&p("/x"), Value::scalar_int(1)).unwrap();
        store.write_dataset(&p("/x"), Value::scalar_int(2)).unwrap();
        assert_eq!(store.read_dataset(&p("/x")).unwrap(), Value::scalar_int(2));
    }

    #[test]
    fn write_dataset_over_group_fails() {
        let store = MemoryStore::new();
        store.create_group(&p("/g")).unwrap();
        assert!(matches!(
            store.write_dataset(&p("/g"), Value::scalar_int(0)),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn read_dataset_on_group_fails() {
        let store = MemoryStore::new();
        store.create_group(&p("/g")).unwrap();
        assert!(matches!(
            store.read_dataset(&p("/g")),
            Err(StoreError::NotADataset(_))
        ));
    }

    #[test]
    fn read_missing_dataset_fails() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.read_dataset(&p("/nope")),
            Err(StoreError::NotFound(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Native ordering
    // -----------------------------------------------------------------------

    #[test]
    fn children_keep_insertion_order() {
        let store = MemoryStore::new();
        store.write_dataset(&p("/z"), Value::scalar_int(1)).unwrap();
        store.write_dataset(&p("/a"), Value::scalar_int(2)).unwrap();
        store.create_group(&p("/m")).unwrap();

        let names: Vec<String> = store
            .list_children(&Path::root())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["z", "a", "m"]);
        // Stable across calls.
        let again: Vec<String> = store
            .list_children(&Path::root())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, again);
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    #[test]
    fn remove_dataset() {
        let store = MemoryStore::new();
        store.write_dataset(&p("/x"), Value::scalar_int(1)).unwrap();
        store.remove(&p("/x")).unwrap();
        assert!(!store.exists(&p("/x")).unwrap());
    }

    #[test]
    fn remove_group_takes_subtree() {
        let store = MemoryStore::new();
        store.create_group(&p("/g/sub")).unwrap();
        store
            .write_dataset(&p("/g/sub/x"), Value::scalar_int(1))
            .unwrap();
        store.remove(&p("/g")).unwrap();
        assert!(!store.exists(&p("/g")).unwrap());
        assert!(!store.exists(&p("/g/sub/x")).unwrap());
    }

    #[test]
    fn remove_missing_fails() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.remove(&p("/nope")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn remove_root_fails() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.remove(&Path::root()),
            Err(StoreError::IsRoot)
        ));
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    #[test]
    fn attrs_round_trip() {
        let store = MemoryStore::new();
        store.create_group(&p("/g")).unwrap();
        let mut attrs = Attributes::new();
        attrs.insert("units".into(), Value::scalar_str("m"));
        store.write_attrs(&p("/g"), attrs.clone()).unwrap();
        assert_eq!(store.read_attrs(&p("/g")).unwrap(), attrs);
    }

    #[test]
    fn write_attrs_replaces_map() {
        let store = MemoryStore::new();
        store.write_dataset(&p("/x"), Value::scalar_int(1)).unwrap();
        let mut first = Attributes::new();
        first.insert("a".into(), Value::scalar_int(1));
        store.write_attrs(&p("/x"), first).unwrap();
        store.write_attrs(&p("/x"), Attributes::new()).unwrap();
        assert!(store.read_attrs(&p("/x")).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Poisoning (tolerant scan support)
    // -----------------------------------------------------------------------

    #[test]
    fn poisoned_path_is_unreadable() {
        let store = MemoryStore::new();
        store.create_group(&p("/bad")).unwrap();
        store.write_dataset(&p("/bad/x"), Value::scalar_int(1)).unwrap();
        store.poison(p("/bad"));

        assert!(matches!(
            store.list_children(&p("/bad")),
            Err(StoreError::Unreadable { .. })
        ));
        // Siblings unaffected.
        assert!(store.list_children(&Path::root()).is_ok());
    }

    #[test]
    fn poisoned_dataset_read_fails() {
        let store = MemoryStore::new();
        store.write_dataset(&p("/x"), Value::scalar_int(1)).unwrap();
        store.poison(p("/x"));
        assert!(matches!(
            store.read_dataset(&p("/x")),
            Err(StoreError::Unreadable { .. })
        ));
        // Existence checks still work; only content access fails.
        assert!(store.exists(&p("/x")).unwrap());
    }
}
