//! Minimum-cost city-to-city routing with a one-time delivery discount.
//!
//! The search runs a Dijkstra variant over a doubled road network: a primary
//! and a shadow copy of every city, joined by zero-weight connectors at the
//! delivery endpoints. The queue is a fixed-capacity indexed binary heap
//! that supports key updates in place at any known position.
//!
//! ```
//! use delivery_router::{best_route, Delivery};
//!
//! let roads = [(0, 1, 10.0), (1, 2, 1.0), (2, 3, 1.0), (0, 3, 100.0)];
//! let job = Delivery { pickup: 1, dropoff: 2, discount: 5.0 };
//! let (cost, route) = best_route(4, &roads, 0, 3, job).unwrap();
//! assert_eq!(cost, 7.0);
//! assert_eq!(route, vec![0, 1, 2, 3]);
//! ```

pub mod delivery;
pub mod dijkstra;
pub mod graph;
pub mod heap;

pub use delivery::{best_route, Delivery, RouteError};
pub use dijkstra::dijkstra_all;
pub use graph::{CityId, Cost, Road};
