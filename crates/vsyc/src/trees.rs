//! Tree store: every loaded module's node sequence, by name

use indexmap::IndexMap;
use std::fmt;

use crate::node::Node;
use crate::symbols::Address;

/// Index of a module in the [`TreeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One source's tokenized node sequence.
#[derive(Debug, Clone)]
pub struct Module {
    id: ModuleId,
    name: String,
    nodes: Vec<Node>,
    exports: Option<Vec<Address>>,
}

impl Module {
    /// Create a module from tokenized nodes.
    pub fn new(id: ModuleId, name: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            id,
            name: name.into(),
            nodes,
            exports: None,
        }
    }

    /// The module's id.
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// The module's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node sequence.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable access to node values. The sequence itself never changes shape.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Symbol snapshot recorded by `@exportall`, if the module ran one.
    pub fn exports(&self) -> Option<&[Address]> {
        self.exports.as_deref()
    }

    pub(crate) fn set_exports(&mut self, addresses: Vec<Address>) {
        self.exports = Some(addresses);
    }
}

/// All loaded modules plus the "current module" cursor.
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    modules: IndexMap<String, Module>,
    current: Option<ModuleId>,
}

impl TreeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `nodes` under `name`. Returns `None` if the name is taken.
    pub fn insert(&mut self, name: &str, nodes: Vec<Node>) -> Option<ModuleId> {
        if self.modules.contains_key(name) {
            return None;
        }
        let id = ModuleId(self.modules.len());
        self.modules
            .insert(name.to_string(), Module::new(id, name, nodes));
        Some(id)
    }

    /// Look up a module by id.
    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get_index(id.0).map(|(_, m)| m)
    }

    /// Look up a module by id, mutably.
    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_index_mut(id.0).map(|(_, m)| m)
    }

    /// Find a module's id by name.
    pub fn id_of(&self, name: &str) -> Option<ModuleId> {
        self.modules.get_index_of(name).map(ModuleId)
    }

    /// The module currently being evaluated.
    pub fn current(&self) -> Option<ModuleId> {
        self.current
    }

    /// Move the cursor, returning where it was so callers can restore it.
    pub fn set_current(&mut self, id: Option<ModuleId>) -> Option<ModuleId> {
        std::mem::replace(&mut self.current, id)
    }

    /// Iterate over modules in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Iterate mutably over modules in load order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.values_mut()
    }

    /// Number of loaded modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if no module is loaded.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
