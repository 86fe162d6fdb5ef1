//! Recursive queries over type descriptors shared by the normalization passes.
//!
//! Every function that follows type-variable bounds threads an explicit set of visited
//! type-variable ids; bound graphs may be cyclic (`T extends Comparable<T>`).

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use xl_core::error::Result;
use xl_core::types::{
    DeclId, DeclaredType, TypeDeclaration, TypeDescriptor, TypeStore, TypeVarId,
};

use crate::{invariant_bail, invariant_ensure};

/// Type variables already entered on the current recursion path.
pub type SeenTypeVariables = HashSet<TypeVarId>;

/// What to do when two instantiations of a declaration disagree on arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArityMismatch {
    /// Report an internal invariant violation.
    Fail,
    /// Log a warning and compare no type arguments.
    Ignore,
}

/// Returns whether `ty` can be written as an explicit cast target or type argument.
pub fn is_denotable(
    ty: &TypeDescriptor,
    store: &TypeStore,
    seen: &mut SeenTypeVariables,
) -> Result<bool> {
    match ty {
        TypeDescriptor::Primitive(_) => Ok(true),
        TypeDescriptor::Union(_) | TypeDescriptor::Intersection(_) => Ok(false),
        TypeDescriptor::Declared(declared) => {
            if declared.declaration.is_anonymous() {
                return Ok(false);
            }
            for argument in declared.type_arguments.iter() {
                if !is_denotable(argument, store, seen)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        TypeDescriptor::Array(array) => is_denotable(&array.component, store, seen),
        TypeDescriptor::TypeVariable(variable) => {
            if !variable.is_wildcard_or_capture() {
                return Ok(true);
            }
            // Cycle closed through the upper bound.
            if seen.contains(&variable.id) {
                return Ok(true);
            }
            if let Some(lower) = store.lower_bound(variable)? {
                if !is_denotable(lower, store, seen)? {
                    return Ok(false);
                }
            }
            seen.insert(variable.id);
            let upper = is_denotable(store.upper_bound(variable)?, store, seen);
            seen.remove(&variable.id);
            upper
        }
    }
}

/// Reduces a wildcard or capture to the bound that may be written in its place.
///
/// The lower bound wins when present. Anything else is returned unchanged.
pub fn project(ty: &TypeDescriptor, store: &TypeStore) -> Result<TypeDescriptor> {
    project_with(ty, store, &mut SeenTypeVariables::new())
}

fn project_with(
    ty: &TypeDescriptor,
    store: &TypeStore,
    seen: &mut SeenTypeVariables,
) -> Result<TypeDescriptor> {
    let Some(variable) = ty.as_type_variable() else {
        return Ok(ty.clone());
    };
    if !variable.is_wildcard_or_capture() {
        return Ok(ty.clone());
    }
    invariant_ensure!(
        seen.insert(variable.id),
        "wildcard bound chain of {} (#{}) loops back onto itself",
        ty,
        variable.id
    );
    match store.lower_bound(variable)? {
        Some(lower) => project_with(lower, store, seen),
        None => project_with(store.upper_bound(variable)?, store, seen),
    }
}

/// The structural type-argument list of `ty`: the arguments of a declared type, the
/// component of an array, nothing otherwise.
pub fn type_argument_descriptors(ty: &TypeDescriptor) -> &[TypeDescriptor] {
    match ty {
        TypeDescriptor::Declared(declared) => &declared.type_arguments,
        TypeDescriptor::Array(array) => std::slice::from_ref(array.component.as_ref()),
        _ => &[],
    }
}

/// `ty` viewed as an instantiation of `target`, following the recorded supertypes of its
/// declaration and substituting its type arguments along the way.
///
/// A raw `ty` lifts to the raw `target`. Returns `None` when `target` is not a
/// supertype of `ty`'s declaration.
pub fn as_supertype(
    ty: &DeclaredType,
    target: &TypeDeclaration,
    store: &TypeStore,
) -> Option<TypeDescriptor> {
    as_supertype_with(ty, target, store, &mut HashSet::new())
}

fn as_supertype_with(
    ty: &DeclaredType,
    target: &TypeDeclaration,
    store: &TypeStore,
    seen: &mut HashSet<DeclId>,
) -> Option<TypeDescriptor> {
    if *ty.declaration == *target {
        return Some(TypeDescriptor::Declared(ty.clone()));
    }
    if !seen.insert(ty.declaration.id) {
        return None;
    }
    let bindings: HashMap<TypeVarId, TypeDescriptor> = ty
        .declaration
        .type_parameters
        .iter()
        .map(|parameter| parameter.id)
        .zip(ty.type_arguments.iter().cloned())
        .collect();
    store
        .supertypes(&ty.declaration)
        .iter()
        .filter_map(|supertype| {
            let supertype = match supertype {
                TypeDescriptor::Declared(declared) if ty.is_raw() => {
                    TypeDescriptor::declared(&declared.declaration, [])
                }
                _ => supertype.substitute(&bindings),
            };
            let declared = supertype.as_declared()?;
            as_supertype_with(declared, target, store, seen)
        })
        .next()
}

/// Positional pairs of type arguments that may be compared between `from` and `to`.
///
/// Two arrays are paired by component. A declared `from` is first lifted to `to`'s
/// declaration through its supertypes. Unrelated declarations and raw types yield
/// no pairs.
pub fn paired_type_arguments(
    from: &TypeDescriptor,
    to: &TypeDescriptor,
    store: &TypeStore,
    on_mismatch: ArityMismatch,
) -> Result<Vec<(TypeDescriptor, TypeDescriptor)>> {
    let lifted = match (from, to) {
        (TypeDescriptor::Array(_), TypeDescriptor::Array(_)) => from.clone(),
        (TypeDescriptor::Declared(from_declared), TypeDescriptor::Declared(to_declared)) => {
            if from_declared.declaration == to_declared.declaration {
                from.clone()
            } else {
                let declared_arity = from_declared.declaration.arity();
                let actual_arity = from_declared.type_arguments.len();
                if actual_arity != 0 && actual_arity != declared_arity {
                    arity_mismatch(from, to, actual_arity, declared_arity, on_mismatch)?;
                    return Ok(Vec::new());
                }
                match as_supertype(from_declared, &to_declared.declaration, store) {
                    Some(lifted) => lifted,
                    None => return Ok(Vec::new()),
                }
            }
        }
        _ => return Ok(Vec::new()),
    };

    let from_arguments = type_argument_descriptors(&lifted);
    let to_arguments = type_argument_descriptors(to);
    if from_arguments.is_empty() || to_arguments.is_empty() {
        return Ok(Vec::new());
    }

    if from_arguments.len() != to_arguments.len() {
        arity_mismatch(
            &lifted,
            to,
            from_arguments.len(),
            to_arguments.len(),
            on_mismatch,
        )?;
        return Ok(Vec::new());
    }

    Ok(from_arguments
        .iter()
        .cloned()
        .zip_eq(to_arguments.iter().cloned())
        .collect())
}

fn arity_mismatch(
    from: &TypeDescriptor,
    to: &TypeDescriptor,
    from_arity: usize,
    to_arity: usize,
    on_mismatch: ArityMismatch,
) -> Result<()> {
    match on_mismatch {
        ArityMismatch::Fail => invariant_bail!(
            "type argument arity mismatch between {} and {} ({} vs {})",
            from,
            to,
            from_arity,
            to_arity
        ),
        ArityMismatch::Ignore => {
            xl_core::warn!(
                "ignoring type arguments of {} and {}: arity {} vs {}",
                from,
                to,
                from_arity,
                to_arity
            );
            Ok(())
        }
    }
}
