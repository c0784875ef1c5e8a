//! Cost-bounded reachability over the platform graph.
//!
//! The traversal is a recursive depth-first relaxation: a platform may be
//! entered several times, each time with a spent cost, and the lowest one
//! is kept. Two guards make this converge to the same per-platform costs as
//! Dijkstra's algorithm with non-negative weights:
//!
//! - an edge is only admitted if its cost fits in the remaining budget;
//! - an edge that was already taken (in either direction) from a lower
//!   origin spent cost is pruned, since taking it again cannot improve
//!   anything downstream. Equal costs are let through so that parallel
//!   edges of different cost between the same platforms are all tried.
//!
//! Instant mode (hover) collects reached stations and same-line segments.
//! Animated mode (click) collects per-platform and per-segment arrival
//! costs, which the playback layer turns into a timed schedule.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::domain::{EdgeKey, Platform, Segment, StationName};
use crate::graph::{Cost, Edge, Graph};

/// Error from a reachability traversal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReachError {
    /// The origin (or an edge target) is not a platform of the graph
    #[error("unknown platform {0}")]
    UnknownPlatform(Platform),

    /// An edge with zero, negative or NaN cost was found.
    ///
    /// This means the graph data is corrupt; the traversal is abandoned
    /// rather than recursing forever.
    #[error("cost of edge {from} -> {to} ({cost}) should be above zero; traversal halted")]
    NonPositiveCost {
        from: Platform,
        to: Platform,
        cost: Cost,
    },
}

/// Result of an instant (hover) traversal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reachable {
    /// Stations reached, including the origin's.
    pub stations: BTreeSet<StationName>,

    /// Same-line segments taken.
    pub segments: BTreeSet<Segment>,

    /// Lowest spent cost per reached platform.
    pub platform_costs: BTreeMap<Platform, Cost>,

    /// Number of edges skipped by the already-traversed guard.
    pub pruned_edges: usize,
}

/// Result of an animated (click) traversal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exploration {
    /// Lowest arrival spent cost per reached platform. The origin is
    /// included with cost zero.
    pub platform_arrivals: BTreeMap<Platform, Cost>,

    /// Lowest arrival spent cost per same-line segment, for segments
    /// arriving under the line-draw budget.
    pub segment_arrivals: BTreeMap<Segment, Cost>,

    /// Highest arrival spent cost over all admitted edges.
    pub max_spent: Cost,

    /// Number of edges skipped by the already-traversed guard.
    pub pruned_edges: usize,
}

impl Exploration {
    /// Total animation length at the given playback speed.
    pub fn total_duration(&self, playback_speed: f64) -> Cost {
        self.max_spent * playback_speed
    }
}

/// What a traversal records each time it admits an edge.
trait Collector {
    fn admit(&mut self, origin: &Platform, edge: &Edge, arrival: Cost);
}

/// Hover: reached stations and same-line segments, immediately.
#[derive(Default)]
struct InstantCollector {
    stations: BTreeSet<StationName>,
    segments: BTreeSet<Segment>,
}

impl Collector for InstantCollector {
    fn admit(&mut self, origin: &Platform, edge: &Edge, _arrival: Cost) {
        self.stations.insert(edge.name.clone());
        if origin.line == edge.pl {
            self.segments.insert(Segment::new(
                origin.line,
                origin.station.clone(),
                edge.name.clone(),
            ));
        }
    }
}

/// Click: best arrival per segment under the line-draw budget, plus the
/// latest arrival overall.
struct AnimatedCollector {
    line_budget: Cost,
    segment_arrivals: BTreeMap<Segment, Cost>,
    max_spent: Cost,
}

impl Collector for AnimatedCollector {
    fn admit(&mut self, origin: &Platform, edge: &Edge, arrival: Cost) {
        self.max_spent = self.max_spent.max(arrival);
        if origin.line == edge.pl && arrival < self.line_budget {
            self.segment_arrivals
                .entry(Segment::new(
                    origin.line,
                    origin.station.clone(),
                    edge.name.clone(),
                ))
                .and_modify(|best| *best = best.min(arrival))
                .or_insert(arrival);
        }
    }
}

/// State owned by a single traversal; discarded when it returns.
struct Traversal<'g, C> {
    graph: &'g Graph,
    budget: Cost,
    visited: HashMap<Platform, Cost>,
    traversed: HashMap<EdgeKey, Cost>,
    pruned: usize,
    collector: C,
}

impl<'g, C: Collector> Traversal<'g, C> {
    fn new(graph: &'g Graph, budget: Cost, collector: C) -> Self {
        Self {
            graph,
            budget,
            visited: HashMap::new(),
            traversed: HashMap::new(),
            pruned: 0,
            collector,
        }
    }

    /// Enter `origin` having spent `spent` of the budget.
    fn visit(&mut self, origin: &Platform, spent: Cost) -> Result<(), ReachError> {
        self.visited
            .entry(origin.clone())
            .and_modify(|best| *best = best.min(spent))
            .or_insert(spent);

        let graph = self.graph;
        let edges = graph
            .adjacents(origin)
            .ok_or_else(|| ReachError::UnknownPlatform(origin.clone()))?;
        let remaining = self.budget - spent;

        for edge in edges {
            let target = edge.target();

            if !(edge.t > 0.0) {
                return Err(ReachError::NonPositiveCost {
                    from: origin.clone(),
                    to: target,
                    cost: edge.t,
                });
            }

            let key = EdgeKey::new(origin, &target);
            if self.traversed.get(&key).is_some_and(|&taken| taken < spent) {
                trace!(from = %origin, to = %target, spent, "Edge already taken at lower cost");
                self.pruned += 1;
                continue;
            }

            if edge.t >= remaining {
                continue;
            }

            // Only reached when the edge is new or this origin cost is lower.
            self.traversed.insert(key, spent);
            let arrival = spent + edge.t;
            self.collector.admit(origin, edge, arrival);
            self.visit(&target, arrival)?;
        }

        Ok(())
    }
}

/// Runs reachability traversals over a graph.
pub struct ReachEngine<'g> {
    graph: &'g Graph,
}

impl<'g> ReachEngine<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Stations and segments reachable from `origin` within `budget`.
    ///
    /// The origin's station is always included, even when nothing else is
    /// reachable.
    pub fn reachable(&self, origin: &Platform, budget: Cost) -> Result<Reachable, ReachError> {
        self.check_origin(origin)?;

        let mut collector = InstantCollector::default();
        collector.stations.insert(origin.station.clone());

        let mut traversal = Traversal::new(self.graph, budget, collector);
        traversal.visit(origin, 0.0)?;

        let Traversal {
            visited,
            pruned,
            collector: InstantCollector { stations, segments },
            ..
        } = traversal;

        debug!(
            origin = %origin,
            budget,
            stations = stations.len(),
            segments = segments.len(),
            pruned,
            "Instant reachability complete"
        );

        Ok(Reachable {
            stations,
            segments,
            platform_costs: visited.into_iter().collect(),
            pruned_edges: pruned,
        })
    }

    /// Arrival schedule for a click exploration from `origin`.
    ///
    /// Platforms count as reached within `station_budget`; segments are only
    /// scheduled for drawing when they arrive within `line_budget`.
    pub fn explore(
        &self,
        origin: &Platform,
        station_budget: Cost,
        line_budget: Cost,
    ) -> Result<Exploration, ReachError> {
        self.check_origin(origin)?;

        let collector = AnimatedCollector {
            line_budget,
            segment_arrivals: BTreeMap::new(),
            max_spent: 0.0,
        };

        let mut traversal = Traversal::new(self.graph, station_budget, collector);
        traversal.visit(origin, 0.0)?;

        let Traversal {
            visited,
            pruned,
            collector:
                AnimatedCollector {
                    segment_arrivals,
                    max_spent,
                    ..
                },
            ..
        } = traversal;

        debug!(
            origin = %origin,
            station_budget,
            line_budget,
            platforms = visited.len(),
            segments = segment_arrivals.len(),
            max_spent,
            pruned,
            "Exploration complete"
        );

        Ok(Exploration {
            platform_arrivals: visited.into_iter().collect(),
            segment_arrivals,
            max_spent,
            pruned_edges: pruned,
        })
    }

    fn check_origin(&self, origin: &Platform) -> Result<(), ReachError> {
        match self.graph.platform(origin) {
            Some(_) => Ok(()),
            None => Err(ReachError::UnknownPlatform(origin.clone())),
        }
    }
}
