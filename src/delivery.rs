// Minimum-cost delivery routing over a doubled road network.
//
// The network is instantiated twice, a primary and a shadow copy, and the
// two copies are joined by zero-weight connector edges at the pickup and
// dropoff cities. The search is a Dijkstra variant over the indexed heap:
// the first relaxation of the pickup -> dropoff road (in either copy)
// subtracts the delivery discount from the candidate cost, at most once per
// run. Which relaxation fires first depends on queue order, so the discount
// does not necessarily land on the globally optimal use of that road.

use crate::graph::{CityId, Cost, Graph, NodeId, Road};
use crate::heap::MinHeap;
use std::fmt::{Display, Formatter};

/// A delivery job: carry goods from `pickup` to `dropoff` for a `discount`
/// off the cost of driving that road.
#[derive(Debug, Clone, Copy)]
pub struct Delivery {
    pub pickup: CityId,
    pub dropoff: CityId,
    pub discount: Cost,
}

/// Error types for route planning.
///
/// # Errors
/// * `CityOutOfRange` - a road endpoint, terminus, or delivery city does
///   not name a city in `[0, city_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    CityOutOfRange { city: CityId, city_count: usize },
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            RouteError::CityOutOfRange { city, city_count } => {
                write!(f, "city id {} out of range for {} cities", city, city_count)
            }
        }
    }
}

impl std::error::Error for RouteError {}

fn check_city(city: CityId, city_count: usize) -> Result<(), RouteError> {
    if city < city_count {
        Ok(())
    } else {
        Err(RouteError::CityOutOfRange { city, city_count })
    }
}

/// Cheapest start-to-end route given one optional delivery job along the way.
///
/// Returns the total cost and the city sequence realizing it, start and end
/// inclusive. An unreachable `end` yields `(Cost::INFINITY, vec![])`.
/// Road weights must be non-negative; that precondition is not checked.
pub fn best_route(
    city_count: usize,
    roads: &[Road],
    start: CityId,
    end: CityId,
    delivery: Delivery,
) -> Result<(Cost, Vec<CityId>), RouteError> {
    check_city(start, city_count)?;
    check_city(end, city_count)?;
    check_city(delivery.pickup, city_count)?;
    check_city(delivery.dropoff, city_count)?;
    for &(u, v, _) in roads {
        check_city(u, city_count)?;
        check_city(v, city_count)?;
    }

    let mut graph = Graph::with_cities(city_count);
    for &(u, v, w) in roads {
        graph.add_road(u, v, w);
        graph.add_road(u + city_count, v + city_count, w);
    }
    // Zero-weight connectors: a route may change copies only at the
    // delivery endpoints.
    graph.add_road(delivery.pickup, delivery.pickup + city_count, 0.0);
    graph.add_road(delivery.dropoff, delivery.dropoff + city_count, 0.0);
    log::debug!(
        "doubled network: {} nodes, {} roads, delivery {} -> {}",
        graph.nodes.len(),
        roads.len(),
        delivery.pickup,
        delivery.dropoff
    );

    run_search(&mut graph, start, delivery);
    Ok(extract_route(&graph, end))
}

/// Modified Dijkstra over the doubled network. On exit every node holds its
/// finalized distance from `start` under the one-shot discount rule.
fn run_search(graph: &mut Graph, start: CityId, delivery: Delivery) {
    let node_count = graph.nodes.len();
    let mut heap = MinHeap::with_capacity(node_count);
    for id in 0..node_count {
        heap.insert(&mut graph.nodes, id);
    }
    let start_pos = graph.nodes[start].heap_pos;
    heap.update_key(&mut graph.nodes, start_pos, 0.0);

    // One reduction per run, spent on whichever relaxation of the
    // pickup -> dropoff road the queue reaches first.
    let mut discount_spent = false;

    while !heap.is_empty() {
        let u = heap.extract_min(&mut graph.nodes);
        let from_cost = graph.nodes[u].dist;
        for i in 0..graph.nodes[u].edges.len() {
            let edge = graph.nodes[u].edges[i];
            let mut candidate = from_cost + edge.weight;
            if !discount_spent
                && graph.original_city(u) == delivery.pickup
                && graph.original_city(edge.to) == delivery.dropoff
            {
                candidate -= delivery.discount;
                discount_spent = true;
            }
            let to = &graph.nodes[edge.to];
            if !to.visited && candidate < to.dist {
                let to_pos = to.heap_pos;
                heap.update_key(&mut graph.nodes, to_pos, candidate);
                graph.nodes[edge.to].prev = Some(u);
            }
        }
    }
}

/// Picks the cheaper of the two destination copies and backtracks its
/// predecessor chain into a start-to-end city sequence. Connector hops
/// switch copies without moving between cities and are collapsed.
fn extract_route(graph: &Graph, end: CityId) -> (Cost, Vec<CityId>) {
    let shadow_end = end + graph.city_count;
    let mut at: NodeId = if graph.nodes[end].dist <= graph.nodes[shadow_end].dist {
        end
    } else {
        shadow_end
    };
    let cost = graph.nodes[at].dist;
    if cost.is_infinite() {
        return (Cost::INFINITY, Vec::new());
    }

    let mut route = vec![graph.original_city(at)];
    while let Some(prev) = graph.nodes[at].prev {
        if prev + graph.city_count != at && at + graph.city_count != prev {
            route.push(graph.original_city(prev));
        }
        at = prev;
    }
    route.reverse();
    (cost, route)
}
