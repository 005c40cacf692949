//! Lexical environments.
//!
//! Environments form a tree stored as an arena: every node records the id of
//! its parent, and ids are the indices into the arena. The module root is the
//! only node without a parent.

use std::collections::HashMap;

use crate::{
    ast::types::Type,
    errors::errors::{Error, ErrorImpl},
    Position,
};

pub type EnvId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    Module,
    Proc,
    Let,
}

#[derive(Debug)]
pub struct Environment {
    pub kind: EnvironmentKind,
    pub bindings: HashMap<String, Type>,
    /// Next free slot in this activation's root table. Only proc nodes count.
    pub root_slots: usize,
    pub parent: Option<EnvId>,
}

/// Where a name was found and how far away it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub ty: Type,
    pub level: usize,
    pub env_id: EnvId,
}

#[derive(Debug, Default)]
pub struct EnvironmentTree {
    environments: Vec<Environment>,
}

impl EnvironmentTree {
    pub fn new() -> Self {
        EnvironmentTree {
            environments: vec![],
        }
    }

    pub fn create(&mut self, kind: EnvironmentKind, parent: Option<EnvId>) -> EnvId {
        let id = self.environments.len();
        self.environments.push(Environment {
            kind,
            bindings: HashMap::new(),
            root_slots: 0,
            parent,
        });
        id
    }

    pub fn get(&self, env: EnvId) -> &Environment {
        &self.environments[env]
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Binds `name` in `env`. A second definition in the same environment overwrites the first.
    pub fn define(&mut self, env: EnvId, name: &str, ty: Type) {
        self.environments[env]
            .bindings
            .insert(String::from(name), ty);
    }

    pub fn lookup_local(&self, env: EnvId, name: &str) -> Option<&Type> {
        self.environments[env].bindings.get(name)
    }

    /// Walks the parent chain looking for `name`.
    ///
    /// The level is the number of parent hops taken to find the binding.
    pub fn resolve(&self, env: EnvId, name: &str) -> Option<Resolution> {
        let mut current = Some(env);
        let mut level = 0;

        while let Some(env_id) = current {
            let environment = &self.environments[env_id];
            if let Some(ty) = environment.bindings.get(name) {
                return Some(Resolution {
                    ty: ty.clone(),
                    level,
                    env_id,
                });
            }

            current = environment.parent;
            level += 1;
        }

        None
    }

    pub fn nearest_proc(&self, env: EnvId) -> Option<EnvId> {
        let mut current = Some(env);

        while let Some(env_id) = current {
            let environment = &self.environments[env_id];
            if environment.kind == EnvironmentKind::Proc {
                return Some(env_id);
            }
            current = environment.parent;
        }

        None
    }

    /// Number of parent hops from `env` to the module root.
    pub fn depth(&self, env: EnvId) -> usize {
        let mut depth = 0;
        let mut current = self.environments[env].parent;

        while let Some(env_id) = current {
            depth += 1;
            current = self.environments[env_id].parent;
        }

        depth
    }

    /// Hands out the next root slot of the activation that owns `env`.
    ///
    /// Let nodes count in their nearest proc ancestor. The module has no
    /// activation frame, so asking it for a slot is an error.
    pub fn fresh_root_slot(&mut self, env: EnvId, position: &Position) -> Result<usize, Error> {
        let owner = match self.environments[env].kind {
            EnvironmentKind::Proc => Some(env),
            EnvironmentKind::Let => self.nearest_proc(env),
            EnvironmentKind::Module => None,
        };

        let Some(owner) = owner else {
            return Err(Error::new(ErrorImpl::NoActivationFrame, position.clone()));
        };

        let slot = self.environments[owner].root_slots;
        self.environments[owner].root_slots += 1;
        Ok(slot)
    }

    pub fn root_table_size(&self, env: EnvId) -> usize {
        self.nearest_proc(env)
            .map(|owner| self.environments[owner].root_slots)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_issued_in_order() {
        let mut tree = EnvironmentTree::new();
        let module = tree.create(EnvironmentKind::Module, None);
        let proc_env = tree.create(EnvironmentKind::Proc, Some(module));
        let let_env = tree.create(EnvironmentKind::Let, Some(proc_env));

        assert_eq!((module, proc_env, let_env), (0, 1, 2));
        assert_eq!(tree.get(let_env).parent, Some(proc_env));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_resolve_levels() {
        let mut tree = EnvironmentTree::new();
        let module = tree.create(EnvironmentKind::Module, None);
        let proc_env = tree.create(EnvironmentKind::Proc, Some(module));
        let outer_let = tree.create(EnvironmentKind::Let, Some(proc_env));
        let inner_let = tree.create(EnvironmentKind::Let, Some(outer_let));

        tree.define(proc_env, "a", Type::i32());

        assert_eq!(tree.resolve(proc_env, "a").unwrap().level, 0);
        assert_eq!(tree.resolve(outer_let, "a").unwrap().level, 1);

        let resolution = tree.resolve(inner_let, "a").unwrap();
        assert_eq!(resolution.level, 2);
        assert_eq!(resolution.env_id, proc_env);
        assert_eq!(resolution.ty, Type::i32());

        assert!(tree.resolve(inner_let, "missing").is_none());
    }

    #[test]
    fn test_shadowing_and_overwrite() {
        let mut tree = EnvironmentTree::new();
        let module = tree.create(EnvironmentKind::Module, None);
        let proc_env = tree.create(EnvironmentKind::Proc, Some(module));
        let let_env = tree.create(EnvironmentKind::Let, Some(proc_env));

        tree.define(proc_env, "x", Type::i32());
        tree.define(let_env, "x", Type::str());
        assert_eq!(tree.resolve(let_env, "x").unwrap().ty, Type::str());
        assert_eq!(tree.resolve(let_env, "x").unwrap().level, 0);

        tree.define(proc_env, "x", Type::bool());
        assert_eq!(tree.lookup_local(proc_env, "x"), Some(&Type::bool()));
    }

    #[test]
    fn test_root_slots_delegate_to_proc() {
        let mut tree = EnvironmentTree::new();
        let module = tree.create(EnvironmentKind::Module, None);
        let proc_env = tree.create(EnvironmentKind::Proc, Some(module));
        let let_env = tree.create(EnvironmentKind::Let, Some(proc_env));
        let nested_let = tree.create(EnvironmentKind::Let, Some(let_env));
        let position = Position::null();

        assert_eq!(tree.fresh_root_slot(proc_env, &position).unwrap(), 0);
        assert_eq!(tree.fresh_root_slot(let_env, &position).unwrap(), 1);
        assert_eq!(tree.fresh_root_slot(nested_let, &position).unwrap(), 2);

        assert_eq!(tree.root_table_size(proc_env), 3);
        assert_eq!(tree.get(let_env).root_slots, 0);
        assert_eq!(tree.get(nested_let).root_slots, 0);
    }

    #[test]
    fn test_nested_proc_owns_its_table() {
        let mut tree = EnvironmentTree::new();
        let module = tree.create(EnvironmentKind::Module, None);
        let outer = tree.create(EnvironmentKind::Proc, Some(module));
        let let_env = tree.create(EnvironmentKind::Let, Some(outer));
        let inner = tree.create(EnvironmentKind::Proc, Some(let_env));
        let position = Position::null();

        tree.fresh_root_slot(inner, &position).unwrap();
        assert_eq!(tree.root_table_size(inner), 1);
        assert_eq!(tree.root_table_size(outer), 0);
        assert_eq!(tree.nearest_proc(let_env), Some(outer));
    }

    #[test]
    fn test_module_has_no_activation_frame() {
        let mut tree = EnvironmentTree::new();
        let module = tree.create(EnvironmentKind::Module, None);

        let error = tree.fresh_root_slot(module, &Position::null()).unwrap_err();
        assert_eq!(error.get_internal_error(), &ErrorImpl::NoActivationFrame);
    }

    #[test]
    fn test_depth() {
        let mut tree = EnvironmentTree::new();
        let module = tree.create(EnvironmentKind::Module, None);
        let proc_env = tree.create(EnvironmentKind::Proc, Some(module));
        let let_env = tree.create(EnvironmentKind::Let, Some(proc_env));

        assert_eq!(tree.depth(module), 0);
        assert_eq!(tree.depth(proc_env), 1);
        assert_eq!(tree.depth(let_env), 2);
    }
}
