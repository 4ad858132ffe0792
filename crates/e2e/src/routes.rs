//! Route registry for the web console
//!
//! Single source of truth mapping logical page names to URL paths. The tree
//! is defined once at compile time and only ever read; the derivation
//! functions flatten it into sets for test parametrization.

use std::collections::BTreeSet;

/// The one route reachable without a session.
pub const LOGIN_ROUTE: &str = "/login";

/// A node in the route tree: either a leaf path or a named group of nodes.
#[derive(Debug, Clone, Copy)]
pub enum RouteNode {
    Page(&'static str),
    Section(&'static [(&'static str, RouteNode)]),
}

use RouteNode::{Page, Section};

/// The full navigable surface of the console, grouped by module.
pub static ROUTES: RouteNode = Section(&[
    ("auth", Section(&[("login", Page("/login"))])),
    (
        "home",
        Section(&[
            ("gateway", Page("/gateway")),
            ("dashboard", Page("/dashboard")),
        ]),
    ),
    (
        "programs",
        Section(&[
            ("list", Page("/programs")),
            ("trials", Page("/trials")),
            ("trial_design", Page("/trials/design")),
            ("trial_planning", Page("/trials/planning")),
            ("trial_summary", Page("/trials/summary")),
            ("studies", Page("/studies")),
            ("locations", Page("/locations")),
        ]),
    ),
    (
        "germplasm",
        Section(&[
            ("list", Page("/germplasm")),
            ("collections", Page("/germplasm/collections")),
            ("passport", Page("/germplasm/passport")),
            ("pedigree", Page("/germplasm/pedigree")),
            ("parentage", Page("/germplasm/parentage")),
        ]),
    ),
    (
        "seed_bank",
        Section(&[
            ("inventory", Page("/seed-bank/inventory")),
            ("seed_lots", Page("/seed-bank/seed-lots")),
            ("traceability", Page("/seed-bank/traceability")),
        ]),
    ),
    (
        "crossing",
        Section(&[
            ("crosses", Page("/crosses")),
            ("planner", Page("/crossing/planner")),
            ("nursery", Page("/nursery")),
        ]),
    ),
    (
        "field",
        Section(&[
            ("layout", Page("/field/layout")),
            ("planning", Page("/field/planning")),
            ("weather", Page("/weather")),
        ]),
    ),
    (
        "analytics",
        Section(&[
            ("overview", Page("/analytics")),
            ("stability", Page("/analytics/stability")),
            ("gxe", Page("/analytics/gxe")),
            ("yield_gap", Page("/analytics/yield-gap")),
            ("breeding_value", Page("/analytics/breeding-value")),
        ]),
    ),
    (
        "genomics",
        Section(&[
            ("overview", Page("/genomics")),
            ("genotyping", Page("/genomics/genotyping")),
            ("gwas", Page("/genomics/gwas")),
            ("haplotypes", Page("/genomics/haplotypes")),
            ("selection", Page("/genomics/selection")),
        ]),
    ),
    (
        "organization",
        Section(&[
            ("people", Page("/people")),
            ("teams", Page("/teams")),
            ("reports", Page("/reports")),
            ("settings", Page("/settings")),
        ]),
    ),
]);

/// Every path reachable by walking the tree, deduplicated.
///
/// Traversal is depth-first; order is not significant and set semantics
/// remove duplicates, so the same path may appear under several sections.
pub fn all_routes() -> BTreeSet<&'static str> {
    let mut out = BTreeSet::new();
    collect(&ROUTES, &mut out);
    out
}

/// All routes that require an authenticated session.
pub fn protected_routes() -> BTreeSet<&'static str> {
    let mut routes = all_routes();
    routes.remove(LOGIN_ROUTE);
    routes
}

/// Routes reachable without a session. Exactly the login page.
pub fn public_routes() -> BTreeSet<&'static str> {
    BTreeSet::from([LOGIN_ROUTE])
}

fn collect(node: &RouteNode, out: &mut BTreeSet<&'static str>) {
    match node {
        Page(path) => {
            out.insert(path);
        }
        Section(children) => {
            for (_, child) in *children {
                collect(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn every_route_is_root_relative() {
        for route in all_routes() {
            assert!(route.starts_with('/'), "{route} is not root-relative");
        }
    }

    #[test]
    fn flattening_deduplicates() {
        // BTreeSet semantics: inserting the same leaf twice keeps one copy.
        let routes = all_routes();
        let as_vec: Vec<_> = routes.iter().collect();
        let mut deduped = as_vec.clone();
        deduped.dedup();
        assert_eq!(as_vec, deduped);
    }

    #[test]
    fn protected_and_public_partition_all() {
        let all = all_routes();
        let protected = protected_routes();
        let public = public_routes();

        assert!(protected.is_disjoint(&public));
        let union: BTreeSet<_> = protected.union(&public).copied().collect();
        assert_eq!(union, all);
    }

    #[test]
    fn public_routes_is_exactly_login() {
        assert_eq!(public_routes(), BTreeSet::from([LOGIN_ROUTE]));
    }

    #[test_case("/dashboard", true; "dashboard is protected")]
    #[test_case("/germplasm/pedigree", true; "nested germplasm page is protected")]
    #[test_case("/genomics/gwas", true; "genomics page is protected")]
    #[test_case("/login", false; "login is public")]
    fn route_classification(route: &str, protected: bool) {
        assert_eq!(protected_routes().contains(route), protected);
        assert!(all_routes().contains(route));
    }

    #[test]
    fn nested_sections_are_walked() {
        // A leaf three levels deep must surface in the flattened set.
        static DEEP: RouteNode = Section(&[(
            "a",
            Section(&[("b", Section(&[("c", Page("/deep/leaf"))]))]),
        )]);
        let mut out = BTreeSet::new();
        collect(&DEEP, &mut out);
        assert_eq!(out, BTreeSet::from(["/deep/leaf"]));
    }
}
