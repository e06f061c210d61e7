//! End-to-end filter graph tests: construction, argument parsing, and
//! pad property negotiation.

use prism::filter::{FilterGraph, FilterRegistry, PassThrough};
use prism::rational::Rational;
use prism::stream::MediaKind;
use prism::Error;

// ============================================================================
// Registry
// ============================================================================

#[test]
fn registry_provides_builtin_filters() {
    let registry = FilterRegistry::with_defaults();
    assert!(registry.names().contains(&"setsar"));
    assert!(registry.names().contains(&"passthrough"));
    assert!(registry.create("setsar").is_ok());
    assert!(registry.create("nosuchfilter").is_err());
}

// ============================================================================
// Negotiation through the graph
// ============================================================================

#[test]
fn setsar_negotiates_reduced_ratio() {
    let registry = FilterRegistry::with_defaults();
    let mut graph = FilterGraph::new();

    let sar = graph.add(&registry, "setsar", Some("4:2")).unwrap();
    let out = graph.add(&registry, "passthrough", None).unwrap();
    let link = graph.link(sar, out).unwrap();

    assert_eq!(
        graph.link_sample_aspect_ratio(link),
        Some(Rational::new(2, 1))
    );
}

#[test]
fn setsar_accepts_decimal_argument() {
    let registry = FilterRegistry::with_defaults();
    let mut graph = FilterGraph::new();

    let sar = graph.add(&registry, "setsar", Some("1.5")).unwrap();
    let out = graph.add(&registry, "passthrough", None).unwrap();
    let link = graph.link(sar, out).unwrap();

    assert_eq!(
        graph.link_sample_aspect_ratio(link),
        Some(Rational::new(3, 2))
    );
}

#[test]
fn malformed_arguments_abort_graph_construction() {
    let registry = FilterRegistry::with_defaults();

    for args in ["abc", "3:4x", "0:5", "-4:3", ""] {
        let mut graph = FilterGraph::new();
        let result = graph.add(&registry, "setsar", Some(args));
        assert!(
            matches!(result, Err(Error::Config(_))),
            "'{args}' should be a configuration error"
        );
        assert!(graph.is_empty());
    }
}

#[test]
fn unconfigured_setsar_keeps_sentinel_off_the_link() {
    let registry = FilterRegistry::with_defaults();
    let mut graph = FilterGraph::new();

    let sar = graph.add(&registry, "setsar", None).unwrap();
    let out = graph.add(&registry, "passthrough", None).unwrap();
    let link = graph.link(sar, out).unwrap();

    // Negotiation ran, but the value is the unset sentinel: downstream
    // must not treat it as a usable ratio.
    let value = graph.link_sample_aspect_ratio(link).unwrap();
    assert!(value.is_unset());
}

#[test]
fn negotiation_follows_construction_order() {
    let registry = FilterRegistry::with_defaults();
    let mut graph = FilterGraph::new();

    let first = graph.add(&registry, "setsar", Some("4:3")).unwrap();
    let middle = graph.add(&registry, "passthrough", None).unwrap();
    let last = graph.add(&registry, "passthrough", None).unwrap();

    let upstream = graph.link(first, middle).unwrap();
    let downstream = graph.link(middle, last).unwrap();

    // Each link carries its own upstream node's configuration: the setsar
    // value does not leak through the passthrough.
    assert_eq!(
        graph.link_sample_aspect_ratio(upstream),
        Some(Rational::new(4, 3))
    );
    assert!(graph
        .link_sample_aspect_ratio(downstream)
        .unwrap()
        .is_unset());
}

#[test]
fn graph_rejects_cycles() {
    let mut graph = FilterGraph::new();
    let a = graph
        .add_node("a", Box::new(PassThrough::new()), None)
        .unwrap();
    let b = graph
        .add_node("b", Box::new(PassThrough::new()), None)
        .unwrap();

    graph.link(a, b).unwrap();
    assert!(matches!(graph.link(b, a), Err(Error::Graph(_))));
}

#[test]
fn graph_rejects_kind_mismatch() {
    let mut graph = FilterGraph::new();
    let video = graph
        .add_node("v", Box::new(PassThrough::new()), None)
        .unwrap();
    let audio = graph
        .add_node("a", Box::new(PassThrough::with_kind(MediaKind::Audio)), None)
        .unwrap();

    assert!(matches!(graph.link(video, audio), Err(Error::Graph(_))));
}

#[test]
fn reconfiguration_is_the_only_rewrite_path() {
    let registry = FilterRegistry::with_defaults();
    let mut graph = FilterGraph::new();

    let sar = graph.add(&registry, "setsar", Some("4:3")).unwrap();
    let out = graph.add(&registry, "passthrough", None).unwrap();
    let link = graph.link(sar, out).unwrap();
    assert_eq!(
        graph.link_sample_aspect_ratio(link),
        Some(Rational::new(4, 3))
    );

    // Unrelated graph growth leaves the negotiated value alone.
    let extra = graph.add(&registry, "passthrough", None).unwrap();
    let _ = graph.link(out, extra).unwrap();
    assert_eq!(
        graph.link_sample_aspect_ratio(link),
        Some(Rational::new(4, 3))
    );

    // Explicit reconfiguration re-runs negotiation.
    graph.reconfigure(sar, Some("16:9")).unwrap();
    assert_eq!(
        graph.link_sample_aspect_ratio(link),
        Some(Rational::new(16, 9))
    );

    // A bad reconfiguration aborts without touching the negotiated value.
    assert!(graph.reconfigure(sar, Some("oops")).is_err());
    assert_eq!(
        graph.link_sample_aspect_ratio(link),
        Some(Rational::new(16, 9))
    );
}
