use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use vault_types::ROOT_CATEGORY;

use crate::descriptor::TypeDescriptorSource;
use crate::error::RegistryError;

/// Reverse index from abstract category to the concrete types implementing it.
///
/// Built per query execution from the live set of persisted concrete type
/// names; never cached across calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Abstract category -> concrete type names reaching it.
    pub by_category: BTreeMap<String, BTreeSet<String>>,
    /// Every concrete type that resolved successfully.
    pub concrete_types: BTreeSet<String>,
    /// Per-type load failures; resolution proceeded without these types.
    pub failures: Vec<RegistryError>,
}

impl Resolution {
    /// Expand a possibly-abstract category to concrete type names.
    ///
    /// An abstract category maps to its implementing types, a known concrete
    /// name to itself, and anything else to the empty set (an unsatisfiable
    /// filter, not an error).
    pub fn expand(&self, category: &str) -> BTreeSet<String> {
        if category == ROOT_CATEGORY {
            return self.concrete_types.clone();
        }
        if let Some(types) = self.by_category.get(category) {
            return types.clone();
        }
        if self.concrete_types.contains(category) {
            return std::iter::once(category.to_string()).collect();
        }
        BTreeSet::new()
    }
}

/// Resolve the given concrete type names into a category reverse index.
///
/// For each concrete type, its descriptor's declared categories are walked
/// transitively (cycle-safe via a per-type visited set), excluding the root
/// marker category. A type whose descriptor cannot be loaded is excluded and
/// reported in [`Resolution::failures`]; the remaining types still resolve.
/// A category referenced but not itself loadable is treated as a leaf.
pub fn resolve(
    source: &dyn TypeDescriptorSource,
    concrete_type_names: &[String],
) -> Resolution {
    let mut resolution = Resolution::default();

    for concrete in concrete_type_names {
        let descriptor = match source.load(concrete) {
            Ok(d) => d,
            Err(err) => {
                resolution.failures.push(err);
                continue;
            }
        };

        resolution.concrete_types.insert(concrete.clone());

        // Transitive walk over declared categories. Category graphs are
        // expected to be acyclic, but the visited set makes cycles safe.
        let mut visited: HashSet<String> = HashSet::new();
        let mut pending: Vec<String> = descriptor.extends.clone();

        while let Some(category) = pending.pop() {
            if category == ROOT_CATEGORY || !visited.insert(category.clone()) {
                continue;
            }
            resolution
                .by_category
                .entry(category.clone())
                .or_default()
                .insert(concrete.clone());

            // Leaf category if its own descriptor is unavailable.
            if let Ok(d) = source.load(&category) {
                pending.extend(d.extends);
            }
        }
    }

    debug!(
        concrete = resolution.concrete_types.len(),
        categories = resolution.by_category.len(),
        failures = resolution.failures.len(),
        "resolved contract types"
    );
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::StaticDescriptorSource;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn direct_category_resolution() {
        let source = StaticDescriptorSource::new()
            .with_type("Cash", &["FungibleAsset"])
            .with_type("FungibleAsset", &[ROOT_CATEGORY]);

        let r = resolve(&source, &names(&["Cash"]));
        assert_eq!(r.expand("FungibleAsset"), set(&["Cash"]));
        assert!(r.failures.is_empty());
    }

    #[test]
    fn transitive_categories_accumulate() {
        let source = StaticDescriptorSource::new()
            .with_type("Cash", &["FungibleAsset"])
            .with_type("Bond", &["FungibleAsset", "DebtInstrument"])
            .with_type("FungibleAsset", &["OnLedgerAsset"])
            .with_type("DebtInstrument", &["OnLedgerAsset"])
            .with_type("OnLedgerAsset", &[ROOT_CATEGORY]);

        let r = resolve(&source, &names(&["Cash", "Bond"]));
        assert_eq!(r.expand("FungibleAsset"), set(&["Bond", "Cash"]));
        assert_eq!(r.expand("DebtInstrument"), set(&["Bond"]));
        // Reached via two paths from Bond and one from Cash; no duplicates.
        assert_eq!(r.expand("OnLedgerAsset"), set(&["Bond", "Cash"]));
    }

    #[test]
    fn root_marker_is_excluded() {
        let source = StaticDescriptorSource::new().with_type("Cash", &[ROOT_CATEGORY]);
        let r = resolve(&source, &names(&["Cash"]));
        assert!(r.by_category.is_empty());
        // The root category still expands to every concrete type.
        assert_eq!(r.expand(ROOT_CATEGORY), set(&["Cash"]));
    }

    #[test]
    fn cyclic_category_graph_terminates() {
        let source = StaticDescriptorSource::new()
            .with_type("Cash", &["A"])
            .with_type("A", &["B"])
            .with_type("B", &["A"]);

        let r = resolve(&source, &names(&["Cash"]));
        assert_eq!(r.expand("A"), set(&["Cash"]));
        assert_eq!(r.expand("B"), set(&["Cash"]));
    }

    #[test]
    fn unloadable_type_is_excluded_best_effort() {
        let source = StaticDescriptorSource::new().with_type("Cash", &["FungibleAsset"]);

        let r = resolve(&source, &names(&["Cash", "Ghost"]));
        assert_eq!(r.expand("FungibleAsset"), set(&["Cash"]));
        assert_eq!(
            r.failures,
            vec![RegistryError::UnknownType("Ghost".to_string())]
        );
        assert!(!r.concrete_types.contains("Ghost"));
    }

    #[test]
    fn unloadable_category_is_a_leaf() {
        // "Mystery" has no descriptor; the walk stops there without error.
        let source = StaticDescriptorSource::new().with_type("Cash", &["Mystery"]);
        let r = resolve(&source, &names(&["Cash"]));
        assert_eq!(r.expand("Mystery"), set(&["Cash"]));
        assert!(r.failures.is_empty());
    }

    #[test]
    fn expand_unknown_category_is_empty() {
        let source = StaticDescriptorSource::new().with_type("Cash", &[]);
        let r = resolve(&source, &names(&["Cash"]));
        assert!(r.expand("NoSuchCategory").is_empty());
    }

    #[test]
    fn expand_concrete_name_maps_to_itself() {
        let source = StaticDescriptorSource::new().with_type("Cash", &[]);
        let r = resolve(&source, &names(&["Cash"]));
        assert_eq!(r.expand("Cash"), set(&["Cash"]));
    }

    #[test]
    fn resolution_is_rebuilt_not_cached() {
        let source = StaticDescriptorSource::new().with_type("Cash", &["FungibleAsset"]);
        let r1 = resolve(&source, &names(&["Cash"]));

        // A new implementation appears between calls.
        let source = source.with_type("Tokens", &["FungibleAsset"]);
        let r2 = resolve(&source, &names(&["Cash", "Tokens"]));

        assert_eq!(r1.expand("FungibleAsset"), set(&["Cash"]));
        assert_eq!(r2.expand("FungibleAsset"), set(&["Cash", "Tokens"]));
    }
}
