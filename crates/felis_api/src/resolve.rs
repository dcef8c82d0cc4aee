//! # Dependency Resolution
//!
//! Checks a mod set against its declared relations and orders it so every
//! mod initializes after the mods it requires.
//!
//! ## Checks
//!
//! 1. No mod requires or breaks itself.
//! 2. Every requirement is present in a matching version.
//! 3. No `breaks` entry matches a present mod.
//! 4. Requirements form no cycle.
//!
//! Mods without a relation between them keep their registration order.

use std::collections::BTreeMap;

use crate::error::{ApiError, ApiResult};
use crate::meta::ModMetadata;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Validates `mods` and returns their initialization order as indices.
///
/// # Errors
///
/// - [`ApiError::SelfDependency`] for a mod naming itself.
/// - [`ApiError::MissingDependency`] for a requirement nobody provides.
/// - [`ApiError::VersionMismatch`] for a requirement in the wrong version.
/// - [`ApiError::Breaks`] for a present incompatible mod.
/// - [`ApiError::CircularDependency`] for a requirement cycle.
pub fn resolve(mods: &[&ModMetadata]) -> ApiResult<Vec<usize>> {
    let by_id: BTreeMap<&str, usize> = mods
        .iter()
        .enumerate()
        .map(|(index, meta)| (meta.modid.as_str(), index))
        .collect();

    for meta in mods {
        for dep in &meta.dependencies.requires {
            if dep.modid == meta.modid {
                return Err(ApiError::SelfDependency(meta.modid.clone()));
            }
            let Some(&index) = by_id.get(dep.modid.as_str()) else {
                return Err(ApiError::MissingDependency {
                    mod_id: meta.modid.clone(),
                    dependency: dep.modid.clone(),
                    requirement: dep.version.clone(),
                });
            };
            let found = &mods[index].version;
            if !dep.version.matches(found) {
                return Err(ApiError::VersionMismatch {
                    mod_id: meta.modid.clone(),
                    dependency: dep.modid.clone(),
                    requirement: dep.version.clone(),
                    found: found.clone(),
                });
            }
        }

        for dep in &meta.dependencies.breaks {
            if dep.modid == meta.modid {
                return Err(ApiError::SelfDependency(meta.modid.clone()));
            }
            if let Some(&index) = by_id.get(dep.modid.as_str()) {
                let found = &mods[index].version;
                if dep.version.matches(found) {
                    return Err(ApiError::Breaks {
                        mod_id: meta.modid.clone(),
                        other: dep.modid.clone(),
                        requirement: dep.version.clone(),
                        found: found.clone(),
                    });
                }
            }
        }
    }

    let mut marks = vec![Mark::Unvisited; mods.len()];
    let mut order = Vec::with_capacity(mods.len());
    let mut path = Vec::new();
    for index in 0..mods.len() {
        visit(index, mods, &by_id, &mut marks, &mut path, &mut order)?;
    }
    Ok(order)
}

// Depth-first; `path` holds the chain of mods currently being visited.
fn visit(
    index: usize,
    mods: &[&ModMetadata],
    by_id: &BTreeMap<&str, usize>,
    marks: &mut [Mark],
    path: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> ApiResult<()> {
    match marks[index] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            let start = path.iter().position(|&i| i == index).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..]
                .iter()
                .map(|&i| mods[i].modid.clone())
                .collect();
            cycle.push(mods[index].modid.clone());
            return Err(ApiError::CircularDependency(cycle));
        }
        Mark::Unvisited => {}
    }

    marks[index] = Mark::Visiting;
    path.push(index);
    for dep in &mods[index].dependencies.requires {
        if let Some(&next) = by_id.get(dep.modid.as_str()) {
            visit(next, mods, by_id, marks, path, order)?;
        }
    }
    path.pop();
    marks[index] = Mark::Done;
    order.push(index);
    Ok(())
}
