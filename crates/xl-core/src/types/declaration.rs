use crate::types::TypeVariable;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

pub type DeclId = u32;

/// A nominal type declaration (class, interface, enum, anonymous class).
///
/// Declarations are identified by `id`; two handles with the same id are the same
/// declaration regardless of the remaining fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub id: DeclId,
    pub qualified_name: String,
    pub anonymous: bool,
    pub type_parameters: Vec<TypeVariable>,
}

impl TypeDeclaration {
    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.type_parameters.len()
    }

    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit(['.', '$'])
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

impl PartialEq for TypeDeclaration {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDeclaration {}

impl Hash for TypeDeclaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
