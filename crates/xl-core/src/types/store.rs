use crate::error::{Error, Result};
use crate::types::{
    DeclId, TypeDeclaration, TypeDescriptor, TypeVarId, TypeVariable, TypeVariableKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub const OBJECT_QUALIFIED_NAME: &str = "java.lang.Object";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeVariableBounds {
    /// Always present; defaults to the top type.
    pub upper: TypeDescriptor,
    pub lower: Option<TypeDescriptor>,
}

/// Read-only universe of declarations and type-variable bounds for one compilation.
///
/// Populated by [`TypeStoreBuilder`] during resolution and then shared by every
/// compilation unit behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TypeStore {
    declarations: Vec<Arc<TypeDeclaration>>,
    by_name: HashMap<String, DeclId>,
    bounds: HashMap<TypeVarId, TypeVariableBounds>,
    supertypes: HashMap<DeclId, Vec<TypeDescriptor>>,
    top: TypeDescriptor,
}

impl TypeStore {
    /// Nullable `java.lang.Object`.
    pub fn top(&self) -> &TypeDescriptor {
        &self.top
    }

    pub fn declaration(&self, id: DeclId) -> Option<&Arc<TypeDeclaration>> {
        self.declarations.get(id as usize)
    }

    pub fn require_declaration(&self, qualified_name: &str) -> Result<&Arc<TypeDeclaration>> {
        match self
            .by_name
            .get(qualified_name)
            .and_then(|id| self.declaration(*id))
        {
            Some(declaration) => Ok(declaration),
            None => crate::bail!("unknown declaration {}", qualified_name),
        }
    }

    /// Direct supertypes of `declaration`, written over its own type parameters.
    pub fn supertypes(&self, declaration: &TypeDeclaration) -> &[TypeDescriptor] {
        self.supertypes
            .get(&declaration.id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn bounds(&self, variable: &TypeVariable) -> Result<&TypeVariableBounds> {
        self.bounds.get(&variable.id).ok_or_else(|| {
            Error::internal_invariant(format!(
                "type variable {} (#{}) has no bounds in the type store",
                variable.name, variable.id
            ))
        })
    }

    pub fn upper_bound(&self, variable: &TypeVariable) -> Result<&TypeDescriptor> {
        Ok(&self.bounds(variable)?.upper)
    }

    pub fn lower_bound(&self, variable: &TypeVariable) -> Result<Option<&TypeDescriptor>> {
        Ok(self.bounds(variable)?.lower.as_ref())
    }
}

pub struct TypeStoreBuilder {
    declarations: Vec<Arc<TypeDeclaration>>,
    by_name: HashMap<String, DeclId>,
    bounds: HashMap<TypeVarId, TypeVariableBounds>,
    supertypes: HashMap<DeclId, Vec<TypeDescriptor>>,
    next_type_variable: TypeVarId,
    top: TypeDescriptor,
}

impl TypeStoreBuilder {
    pub fn new() -> Self {
        let object = Arc::new(TypeDeclaration {
            id: 0,
            qualified_name: OBJECT_QUALIFIED_NAME.to_string(),
            anonymous: false,
            type_parameters: Vec::new(),
        });
        let top = TypeDescriptor::declared(&object, []).to_nullable();
        let mut by_name = HashMap::new();
        by_name.insert(OBJECT_QUALIFIED_NAME.to_string(), 0);
        Self {
            declarations: vec![object],
            by_name,
            bounds: HashMap::new(),
            supertypes: HashMap::new(),
            next_type_variable: 0,
            top,
        }
    }

    pub fn top(&self) -> TypeDescriptor {
        self.top.clone()
    }

    /// Declares a named class whose type parameters are bounded by the top type.
    ///
    /// Use [`Self::set_upper_bound`] on `declaration.type_parameters` for bounds that
    /// mention the declaration itself.
    pub fn declare_class(
        &mut self,
        qualified_name: &str,
        type_parameters: &[&str],
    ) -> Arc<TypeDeclaration> {
        self.declare(qualified_name, false, type_parameters)
    }

    pub fn declare_anonymous_class(&mut self, qualified_name: &str) -> Arc<TypeDeclaration> {
        self.declare(qualified_name, true, &[])
    }

    fn declare(
        &mut self,
        qualified_name: &str,
        anonymous: bool,
        type_parameters: &[&str],
    ) -> Arc<TypeDeclaration> {
        let type_parameters = type_parameters
            .iter()
            .map(|name| self.type_parameter(name, None))
            .collect();
        let id = self.declarations.len() as DeclId;
        let declaration = Arc::new(TypeDeclaration {
            id,
            qualified_name: qualified_name.to_string(),
            anonymous,
            type_parameters,
        });
        self.declarations.push(declaration.clone());
        self.by_name.insert(qualified_name.to_string(), id);
        declaration
    }

    pub fn type_parameter(&mut self, name: &str, upper: Option<TypeDescriptor>) -> TypeVariable {
        self.new_type_variable(name, TypeVariableKind::Parameter, upper, None)
    }

    pub fn wildcard(
        &mut self,
        upper: Option<TypeDescriptor>,
        lower: Option<TypeDescriptor>,
    ) -> TypeVariable {
        self.new_type_variable("?", TypeVariableKind::Wildcard, upper, lower)
    }

    pub fn capture(
        &mut self,
        upper: Option<TypeDescriptor>,
        lower: Option<TypeDescriptor>,
    ) -> TypeVariable {
        let name = format!("capture#{}", self.next_type_variable);
        self.new_type_variable(&name, TypeVariableKind::Capture, upper, lower)
    }

    fn new_type_variable(
        &mut self,
        name: &str,
        kind: TypeVariableKind,
        upper: Option<TypeDescriptor>,
        lower: Option<TypeDescriptor>,
    ) -> TypeVariable {
        let id = self.next_type_variable;
        self.next_type_variable += 1;
        let upper = upper.unwrap_or_else(|| self.top.clone());
        self.bounds.insert(id, TypeVariableBounds { upper, lower });
        TypeVariable {
            id,
            name: Arc::from(name),
            kind,
            nullable: false,
        }
    }

    /// Replaces the upper bound of an already created variable; this is how cyclic
    /// bounds are tied.
    pub fn set_upper_bound(&mut self, variable: &TypeVariable, upper: TypeDescriptor) {
        if let Some(bounds) = self.bounds.get_mut(&variable.id) {
            bounds.upper = upper;
        }
    }

    /// Records that `declaration` extends or implements `supertype`, e.g.
    /// `ArrayList<E>` implementing `List<E>` over `ArrayList`'s own `E`.
    pub fn add_supertype(&mut self, declaration: &TypeDeclaration, supertype: TypeDescriptor) {
        self.supertypes
            .entry(declaration.id)
            .or_default()
            .push(supertype);
    }

    pub fn build(self) -> TypeStore {
        TypeStore {
            declarations: self.declarations,
            by_name: self.by_name,
            bounds: self.bounds,
            supertypes: self.supertypes,
            top: self.top,
        }
    }
}

impl Default for TypeStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
