use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::revision::ref_name::SymRefName;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Name of the repository metadata directory
pub const KIT_DIR_NAME: &str = ".kit";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    config: Config,
    current_ref: RefCell<SymRefName>,
    reverse_refs: RefCell<HashMap<ObjectId, Vec<SymRefName>>>,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let kit_path = path.join(KIT_DIR_NAME);
        let index = Index::new(kit_path.join("index").into_boxed_path());
        let database = Database::new(kit_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(kit_path.clone().into_boxed_path());
        let config = Config::new(kit_path.join("config").into_boxed_path());
        let current_ref = refs.current_ref(None)?;

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
            config,
            current_ref: RefCell::new(current_ref),
            reverse_refs: RefCell::new(HashMap::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kit_path(&self) -> PathBuf {
        self.path.join(KIT_DIR_NAME)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_ref(&self) -> Ref<'_, SymRefName> {
        self.current_ref.borrow()
    }

    pub fn set_current_ref(&self, new_ref: SymRefName) {
        *self.current_ref.borrow_mut() = new_ref;
    }

    pub fn reverse_refs(&self) -> Ref<'_, HashMap<ObjectId, Vec<SymRefName>>> {
        self.reverse_refs.borrow()
    }

    pub fn set_reverse_refs(&self, new_reverse_refs: HashMap<ObjectId, Vec<SymRefName>>) {
        *self.reverse_refs.borrow_mut() = new_reverse_refs;
    }

    /// Flatten a stored tree into repository-relative path/entry pairs
    ///
    /// Recurses into subtrees so `flat_tree` ends up holding one entry per
    /// file, keyed by its full path.
    pub fn parse_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: Option<&Path>,
        flat_tree: &mut BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<()> {
        let tree = self
            .database
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", tree_oid))?;

        for (name, entry) in tree.into_entries() {
            let entry_path = match prefix {
                Some(prefix) => prefix.join(&name),
                None => PathBuf::from(&name),
            };

            if entry.is_tree() {
                self.parse_tree(&entry.oid, Some(entry_path.as_path()), flat_tree)?;
            } else {
                flat_tree.insert(entry_path, entry);
            }
        }

        Ok(())
    }
}
