use proptest::prelude::*;

use schemaviz::{
    LayoutError,
    config::LayoutConfig,
    geometry::{Point, Size},
    graph::{Edge, Graph, Node, NodeKind},
    layout::{Engine, LayoutDriver},
    schema::{ClassDef, ClassKind, EdgeStyle, RelationDef, ScalarDef, Schema},
};

fn scalars(count: usize) -> Schema {
    Schema {
        scalars: (0..count)
            .map(|i| ScalarDef {
                name: format!("S{i}"),
                description: None,
            })
            .collect(),
        ..Schema::default()
    }
}

fn class(name: &str) -> ClassDef {
    ClassDef {
        name: name.to_string(),
        kind: ClassKind::Object,
        fields: vec![],
    }
}

fn config(seed: u64, iterations: usize) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    config.set_seed(Some(seed)).set_iterations(iterations);
    config
}

fn min_pairwise_distance(positions: &[Point]) -> f64 {
    let mut min = f64::INFINITY;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            min = min.min(a.distance(*b));
        }
    }
    min
}

fn positions(layout: &schemaviz::Layout) -> Vec<Point> {
    layout.nodes().map(Node::position).collect()
}

/// Graph of two 50x30 nodes joined by one edge.
fn connected_pair(first: Point, second: Point) -> Graph {
    let size = Size::new(50.0, 30.0);
    let mut graph = Graph::new();
    graph
        .add_node(Node::new("A", "A", NodeKind::Scalar).with_size(size).with_position(first))
        .unwrap();
    graph
        .add_node(Node::new("B", "B", NodeKind::Scalar).with_size(size).with_position(second))
        .unwrap();
    graph.add_edge(Edge::new("A", "B", "has", EdgeStyle::Plain));
    graph
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn unconnected_nodes_stay_finite_and_apart(count in 1usize..12, seed in any::<u64>()) {
        let config = config(seed, 50);
        let layout = LayoutDriver::new(&config).layout(&scalars(count)).unwrap();

        let positions = positions(&layout);
        prop_assert_eq!(positions.len(), count);
        prop_assert!(positions.iter().all(|p| p.is_finite()));
        if count > 1 {
            prop_assert!(min_pairwise_distance(&positions) >= config.min_distance());
        }
    }
}

#[test]
fn test_same_seed_gives_bit_identical_positions() {
    let mut schema = scalars(5);
    schema.classes = vec![class("A"), class("B")];
    schema.relations = vec![
        RelationDef::new("A", "B", "has", EdgeStyle::Plain),
        RelationDef::new("A", "S0", "has", EdgeStyle::Plain),
    ];

    let first = LayoutDriver::new(&config(99, 100)).layout(&schema).unwrap();
    let second = LayoutDriver::new(&config(99, 100)).layout(&schema).unwrap();

    let bits = |layout: &schemaviz::Layout| -> Vec<(u64, u64)> {
        positions(layout)
            .iter()
            .map(|p| (p.x().to_bits(), p.y().to_bits()))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_larger_ideal_length_gives_larger_distance() {
    let start = (Point::new(100.0, 100.0), Point::new(300.0, 200.0));

    let mut small = connected_pair(start.0, start.1);
    let small_report = Engine::new()
        .simulate(&mut small, Size::new(1000.0, 1000.0))
        .unwrap();
    let mut large = connected_pair(start.0, start.1);
    let large_report = Engine::new()
        .simulate(&mut large, Size::new(2000.0, 2000.0))
        .unwrap();

    assert!(large_report.ideal_edge_length() > small_report.ideal_edge_length());
    let small_distance = small.positions()[0].distance(small.positions()[1]);
    let large_distance = large.positions()[0].distance(large.positions()[1]);
    assert!(
        large_distance > small_distance,
        "{large_distance} should exceed {small_distance}"
    );
}

#[test]
fn test_pair_settles_within_twenty_percent_of_ideal_length() {
    let mut config = config(2024, 100);
    config.set_canvas(Size::new(1920.0, 1080.0));
    let mut schema = Schema::default();
    schema.classes = vec![class("A"), class("B")];
    schema.relations = vec![RelationDef::new("A", "B", "has", EdgeStyle::Plain)];

    // Seeded random start inside the canvas, then the 50x30 pair is simulated.
    let mut driver = LayoutDriver::new(&config);
    let seeded = driver.build_graph(&schema).unwrap();
    let start = seeded.positions();
    let mut graph = connected_pair(start[0], start[1]);

    let report = Engine::with_config(config.force_config())
        .simulate(&mut graph, config.canvas())
        .unwrap();

    let k = report.ideal_edge_length();
    let distance = graph.positions()[0].distance(graph.positions()[1]);
    assert!(
        (distance - k).abs() <= 0.2 * k,
        "distance {distance} not within 20% of k {k}"
    );
}

#[test]
fn test_empty_schema_fails_without_consuming_randomness() {
    let schema = scalars(3);

    let mut driver = LayoutDriver::new(&config(5, 40));
    assert_eq!(driver.layout(&Schema::default()).unwrap_err(), LayoutError::EmptyGraph);
    let after_error = driver.layout(&schema).unwrap();

    let fresh = LayoutDriver::new(&config(5, 40)).layout(&schema).unwrap();
    assert_eq!(positions(&after_error), positions(&fresh));
}

#[test]
fn test_dangling_edge_is_kept_and_ignored() {
    let schema = Schema {
        classes: vec![class("A"), class("B")],
        relations: vec![
            RelationDef::new("A", "Missing", "has", EdgeStyle::Plain),
            RelationDef::new("A", "B", "has", EdgeStyle::Plain),
        ],
        ..Schema::default()
    };

    let layout = LayoutDriver::new(&config(8, 100)).layout(&schema).unwrap();

    assert!(positions(&layout).iter().all(|p| p.is_finite()));
    assert_eq!(layout.edges().len(), 2);
    assert_eq!(layout.edges()[0].from(), "A");
    assert_eq!(layout.edges()[0].to(), "Missing");
    assert!(layout.node("Missing").is_none());
}

#[test]
fn test_ten_unconnected_nodes_spread_out() {
    let layout = LayoutDriver::new(&config(17, 100)).layout(&scalars(10)).unwrap();

    let min = min_pairwise_distance(&positions(&layout));
    assert!(min > 50.0, "closest pair only {min} apart");
}
