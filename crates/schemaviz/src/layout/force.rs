//! Force-directed layout engine
//!
//! Nodes repel each other with magnitude `k² / d` and connected nodes attract
//! with magnitude `d² / k`, where `k = sqrt(canvas_area / node_count)` is the
//! ideal edge length. Two connected nodes therefore settle at distance `k`.
//!
//! Forces of one iteration are evaluated against the positions at the start
//! of that iteration. Each node then moves by its accumulated displacement,
//! capped by a temperature that cools linearly to zero over the iteration
//! budget.
//!
//! Repulsion visits every ordered pair of nodes, so one iteration costs
//! O(N²).

use log::{debug, trace, warn};

use schemaviz_core::{
    geometry::{Point, Size},
    graph::Graph,
};

use super::LayoutError;

/// Tunable parameters of the force simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceConfig {
    /// Number of iterations to run. Must be positive.
    pub iterations: usize,
    /// Lower bound on the distance used in force formulas. Must be positive.
    pub min_distance: f64,
    /// Maximum step length in the first iteration.
    ///
    /// `None` derives it from the canvas as `max(width, height) / 10`.
    pub initial_temperature: Option<f64>,
    /// Stop early once no node moves farther than this in one iteration.
    pub convergence_threshold: Option<f64>,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            min_distance: 0.1,
            initial_temperature: None,
            convergence_threshold: None,
        }
    }
}

impl ForceConfig {
    /// Checks that every parameter is usable by the simulation.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.iterations == 0 {
            return Err(LayoutError::InvalidConfig(
                "iterations must be greater than zero".to_string(),
            ));
        }
        if !is_positive(self.min_distance) {
            return Err(LayoutError::InvalidConfig(format!(
                "min_distance must be a positive number, got {}",
                self.min_distance
            )));
        }
        if let Some(temperature) = self.initial_temperature.filter(|t| !is_positive(*t)) {
            return Err(LayoutError::InvalidConfig(format!(
                "initial_temperature must be a positive number, got {temperature}"
            )));
        }
        if let Some(threshold) = self.convergence_threshold.filter(|t| !is_positive(*t)) {
            return Err(LayoutError::InvalidConfig(format!(
                "convergence_threshold must be a positive number, got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Summary of a finished simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationReport {
    iterations: usize,
    ideal_edge_length: f64,
}

impl SimulationReport {
    /// Iterations actually run; less than the budget only on early convergence.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The ideal edge length `k` used for this run.
    pub fn ideal_edge_length(&self) -> f64 {
        self.ideal_edge_length
    }
}

/// Force-directed layout engine.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: ForceConfig,
}

impl Engine {
    /// Create an engine with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ForceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    /// Set the number of iterations for the force simulation
    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.config.iterations = iterations;
        self
    }

    /// Set the distance floor used in the force formulas
    pub fn set_min_distance(&mut self, distance: f64) -> &mut Self {
        self.config.min_distance = distance;
        self
    }

    /// Set the maximum step length of the first iteration
    pub fn set_initial_temperature(&mut self, temperature: Option<f64>) -> &mut Self {
        self.config.initial_temperature = temperature;
        self
    }

    /// Enable or disable early stopping
    pub fn set_convergence_threshold(&mut self, threshold: Option<f64>) -> &mut Self {
        self.config.convergence_threshold = threshold;
        self
    }

    /// Run the simulation, moving every node of `graph` in place.
    ///
    /// Edges whose endpoints are missing from the graph are skipped, as are
    /// self-loops. The node and edge sets are never modified.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidConfig`] for a rejected configuration or canvas.
    /// - [`LayoutError::EmptyGraph`] when the graph has no nodes.
    /// - [`LayoutError::NonFinitePosition`] when a coordinate stops being
    ///   finite. Positions may already have been updated in that case.
    pub fn simulate(
        &self,
        graph: &mut Graph,
        canvas: Size,
    ) -> Result<SimulationReport, LayoutError> {
        self.config.validate()?;
        if !is_positive(canvas.width()) || !is_positive(canvas.height()) {
            return Err(LayoutError::InvalidConfig(format!(
                "canvas must have positive finite dimensions, got {}x{}",
                canvas.width(),
                canvas.height()
            )));
        }

        let node_count = graph.len();
        if node_count == 0 {
            return Err(LayoutError::EmptyGraph);
        }

        let k = (canvas.area() / node_count as f64).sqrt();
        let initial_temperature = self
            .config
            .initial_temperature
            .unwrap_or_else(|| canvas.width().max(canvas.height()) / 10.0);
        let springs = resolve_springs(graph);

        debug!(
            nodes = node_count,
            springs = springs.len(),
            k,
            initial_temperature;
            "Starting force simulation"
        );

        let min_distance = self.config.min_distance;
        let iterations = self.config.iterations;

        for iteration in 0..iterations {
            let positions = graph.positions();
            let mut displacements = vec![Point::default(); node_count];

            // Repulsion between every ordered pair.
            for (i, &position) in positions.iter().enumerate() {
                for (j, &other) in positions.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let delta = position.sub_point(other);
                    let length = delta.hypot();
                    let distance = length.max(min_distance);
                    let force = k * k / distance;
                    let push = if length == 0.0 {
                        coincident_direction(i, j).scale(force)
                    } else {
                        delta.scale(force / distance)
                    };
                    displacements[i] = displacements[i].add_point(push);
                }
            }

            // Attraction along edges, equal and opposite.
            for &(from, to) in &springs {
                let delta = positions[to].sub_point(positions[from]);
                let distance = delta.hypot().max(min_distance);
                let force = distance * distance / k;
                let pull = delta.scale(force / distance);
                displacements[from] = displacements[from].add_point(pull);
                displacements[to] = displacements[to].sub_point(pull);
            }

            let temperature =
                initial_temperature * (1.0 - iteration as f64 / iterations as f64);
            let mut max_step: f64 = 0.0;

            for (index, displacement) in displacements.into_iter().enumerate() {
                let step = displacement.clamp_length(temperature);
                let Some(node) = graph.node_at_mut(index) else {
                    continue;
                };
                let next = node.position().add_point(step);
                if !next.is_finite() {
                    return Err(LayoutError::NonFinitePosition {
                        node: node.id().to_string(),
                        iteration,
                    });
                }
                node.set_position(next);
                max_step = max_step.max(step.hypot());
            }

            trace!(iteration, temperature, max_step; "Force iteration finished");

            if self
                .config
                .convergence_threshold
                .is_some_and(|threshold| max_step < threshold)
            {
                debug!(iteration, max_step; "Force simulation converged early");
                return Ok(SimulationReport {
                    iterations: iteration + 1,
                    ideal_edge_length: k,
                });
            }
        }

        Ok(SimulationReport {
            iterations,
            ideal_edge_length: k,
        })
    }
}

/// Resolves edges to node index pairs, dropping dangling edges and self-loops.
fn resolve_springs(graph: &Graph) -> Vec<(usize, usize)> {
    let mut springs = Vec::with_capacity(graph.edges().len());

    for edge in graph.edges() {
        match (graph.node_index(edge.from()), graph.node_index(edge.to())) {
            (Some(from), Some(to)) if from != to => springs.push((from, to)),
            (Some(_), Some(_)) => {
                trace!(node = edge.from(); "Skipping self-loop edge");
            }
            _ => warn!(
                from = edge.from(),
                to = edge.to(),
                label = edge.label();
                "Skipping edge with a missing endpoint"
            ),
        }
    }

    springs
}

/// Unit direction used to push apart two nodes at the same position.
///
/// The direction depends only on the unordered pair, and the two members of
/// the pair get opposite directions.
fn coincident_direction(i: usize, j: usize) -> Point {
    const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

    let (low, high) = if i < j { (i, j) } else { (j, i) };
    let angle = (low * 31 + high * 17) as f64 * GOLDEN_ANGLE;
    let direction = Point::new(angle.cos(), angle.sin());
    if i < j { direction } else { direction.scale(-1.0) }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
