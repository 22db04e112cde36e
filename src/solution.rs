//! Solution representation for the ant colony TSP solver.
//!
//! A solution carries the best tour found (without the duplicate closing
//! node) together with the run statistics the solver exports.

use crate::instance::TspInstance;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Represents the outcome of a solver run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The tour as a sequence of node indices, starting at the home node.
    /// The closing edge back to the start is implicit. Empty when no tour
    /// was completed.
    pub tour: Vec<usize>,
    /// Cyclic tour length, including the closing edge
    pub cost: f64,
    /// Whether the tour visits every node exactly once
    pub complete: bool,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of epochs the simulation ran (if applicable)
    pub epochs: Option<usize>,
    /// Total completed tours across the swarm
    pub ants_used: usize,
    /// Maximum completed-tour count over the individual ants
    pub round_trips: usize,
}

impl Solution {
    /// Create a new empty solution. An empty tour is a valid, reportable
    /// outcome, not an error.
    pub fn new() -> Self {
        Solution {
            tour: Vec::new(),
            cost: f64::INFINITY,
            complete: false,
            algorithm: String::new(),
            computation_time: 0.0,
            epochs: None,
            ants_used: 0,
            round_trips: 0,
        }
    }

    /// Create a solution from a tour
    pub fn from_tour(instance: &TspInstance, tour: Vec<usize>, algorithm: &str) -> Self {
        let cost = instance.tour_length(&tour);
        let complete = is_complete_tour(instance, &tour);

        Solution {
            tour,
            cost,
            complete,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            epochs: None,
            ants_used: 0,
            round_trips: 0,
        }
    }

    /// Whether any tour was completed at all
    pub fn found(&self) -> bool {
        !self.tour.is_empty()
    }
}

/// Check that a tour visits every node of the instance exactly once,
/// starting at the home node
fn is_complete_tour(instance: &TspInstance, tour: &[usize]) -> bool {
    if tour.len() != instance.dimension() || tour.first() != Some(&0) {
        return false;
    }

    let unique: HashSet<usize> = tour.iter().cloned().collect();
    unique.len() == instance.dimension()
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        if self.found() {
            writeln!(f, "  Cost: {:.2}", self.cost)?;
            writeln!(f, "  Complete: {}", self.complete)?;
        } else {
            writeln!(f, "  No tour completed")?;
        }
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(epochs) = self.epochs {
            writeln!(f, "  Epochs: {}", epochs)?;
        }
        writeln!(f, "  Ants used: {}", self.ants_used)?;
        writeln!(f, "  Round trips: {}", self.round_trips)?;
        writeln!(f, "  Tour: {:?}", self.tour)
    }
}
