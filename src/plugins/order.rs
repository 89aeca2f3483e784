//! Dependency-respecting execution order.

use std::collections::{HashMap, HashSet};

use crate::{error::ManagerError, plugins::meta::PluginMeta};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Compute the execution order of `plugins` (given in registration order).
///
/// Plugins are seeded by ascending priority (stable, so ties keep
/// registration order) and visited depth-first, dependencies in declaration
/// order first. Dependencies that are not registered are skipped. Reaching a
/// plugin that is still being visited is a cycle.
pub fn execution_order<'a, I>(plugins: I) -> Result<Vec<String>, ManagerError>
where
    I: IntoIterator<Item = &'a PluginMeta>,
{
    let mut seeds: Vec<&'a PluginMeta> = plugins.into_iter().collect();
    let by_name: HashMap<&'a str, &'a PluginMeta> = seeds
        .iter()
        .copied()
        .map(|m| (m.name.as_str(), m))
        .collect();
    seeds.sort_by_key(|m| m.priority);

    let mut marks: HashMap<&'a str, Mark> = HashMap::new();
    let mut order = Vec::with_capacity(seeds.len());
    for meta in seeds {
        visit(meta, &by_name, &mut marks, &mut order)?;
    }
    Ok(order)
}

fn visit<'a>(
    meta: &'a PluginMeta,
    by_name: &HashMap<&'a str, &'a PluginMeta>,
    marks: &mut HashMap<&'a str, Mark>,
    order: &mut Vec<String>,
) -> Result<(), ManagerError> {
    match marks.get(meta.name.as_str()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            return Err(ManagerError::CircularDependency {
                plugin: meta.name.clone(),
            });
        }
        None => {}
    }

    marks.insert(meta.name.as_str(), Mark::InProgress);
    for dependency in &meta.dependencies {
        if let Some(&dep) = by_name.get(dependency.as_str()) {
            visit(dep, by_name, marks, order)?;
        }
    }
    marks.insert(meta.name.as_str(), Mark::Done);
    order.push(meta.name.clone());
    Ok(())
}

/// Declared dependencies of `meta` that are not among `registered`.
pub fn missing_dependencies<'a>(meta: &'a PluginMeta, registered: &HashSet<&str>) -> Vec<&'a str> {
    meta.dependencies
        .iter()
        .map(String::as_str)
        .filter(|dep| !registered.contains(dep))
        .collect()
}
