use anyhow::{bail, Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, Writer};
use delivery_router::{best_route, dijkstra_all, CityId, Cost, Delivery, Road};
use fnv::FnvHashMap;
use log::info;
use ordered_float::OrderedFloat;

#[derive(Parser, Debug)]
#[command(name = "delivery-router")]
#[command(about = "Build a road network from a CSV with origin,destination,weight per row and price a delivery route.", long_about = None)]
struct Cli {
    /// Path to the .csv file
    #[arg(short, long)]
    csv: String,

    /// Start city label
    #[arg(short, long)]
    start: String,

    /// End city label
    #[arg(short, long)]
    end: String,

    /// Pickup city label for the delivery job
    #[arg(long)]
    pickup: Option<String>,

    /// Dropoff city label for the delivery job
    #[arg(long)]
    dropoff: Option<String>,

    /// Discount earned by carrying the delivery over the pickup-dropoff road
    #[arg(long, default_value_t = 0.0)]
    discount: f64,

    #[arg(short, long, default_value_t = String::from("delivery"))]
    algorithm: String,

    /// Output CSV (city,cost) of all start-relative costs. Dijkstra mode only.
    #[arg(short, long)]
    out: Option<String>,

    /// Include unreachable cities in output with infinite cost
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,
}

enum RouteAlgorithm {
    Delivery,
    Dijkstra,
}

impl RouteAlgorithm {
    fn from(string: &str) -> Self {
        match string {
            "delivery" => RouteAlgorithm::Delivery {},
            "dijkstra" => RouteAlgorithm::Dijkstra {},
            _ => panic!("Algorithm not found for input string: {}, possible options are: (\"delivery\", \"dijkstra\")", string),
        }
    }
}

/// Road list plus the label interner that maps city names to dense ids.
struct RoadTable {
    roads: Vec<Road>,
    ids: FnvHashMap<String, CityId>,
    labels: Vec<String>,
}

impl RoadTable {
    fn intern(&mut self, label: &str) -> CityId {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        id
    }

    fn resolve(&self, label: &str) -> Result<CityId> {
        match self.ids.get(label) {
            Some(&id) => Ok(id),
            None => bail!("city {:?} does not appear in the road list", label),
        }
    }
}

fn parse_roads(path: &str) -> Result<RoadTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true) // important: skip header line
        .from_path(path)
        .with_context(|| format!("opening {}", path))?;

    let mut table = RoadTable {
        roads: Vec::new(),
        ids: FnvHashMap::default(),
        labels: Vec::new(),
    };

    for result in rdr.records() {
        let record = result?;
        let origin = table.intern(&record[0]);
        let destination = table.intern(&record[1]);
        let weight: f64 = record[2]
            .parse()
            .with_context(|| format!("bad weight {:?}", &record[2]))?;
        table.roads.push((origin, destination, weight));
    }

    Ok(table)
}

fn build_adjacency_list(city_count: usize, roads: &[Road]) -> Vec<Vec<(usize, f64)>> {
    let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); city_count];
    for &(u, v, w) in roads {
        adj[u].push((v, w));
        adj[v].push((u, w));
    }
    adj
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Set the algorithm.
    let algorithm = RouteAlgorithm::from(&cli.algorithm);

    let table = parse_roads(&cli.csv)?;
    info!(
        "Parsed {} roads over {} cities",
        table.roads.len(),
        table.labels.len()
    );

    let start = table.resolve(&cli.start)?;
    let end = table.resolve(&cli.end)?;

    use std::time::SystemTime;
    let now = SystemTime::now();

    match algorithm {
        RouteAlgorithm::Delivery => {
            let pickup = cli
                .pickup
                .as_deref()
                .context("--pickup is required for the delivery algorithm")?;
            let dropoff = cli
                .dropoff
                .as_deref()
                .context("--dropoff is required for the delivery algorithm")?;
            let delivery = Delivery {
                pickup: table.resolve(pickup)?,
                dropoff: table.resolve(dropoff)?,
                discount: cli.discount,
            };
            let (cost, route) =
                best_route(table.labels.len(), &table.roads, start, end, delivery)?;
            if let Ok(elapsed) = now.elapsed() {
                info!("{} s", elapsed.as_secs_f64());
            }
            if route.is_empty() {
                println!("{} is unreachable from {}", cli.end, cli.start);
            } else {
                println!("Cost: {}", cost);
                println!(
                    "Route: {}",
                    route
                        .iter()
                        .map(|&c| table.labels[c].as_str())
                        .collect::<Vec<_>>()
                        .join(" -> ")
                );
            }
        }
        RouteAlgorithm::Dijkstra => {
            let adj = build_adjacency_list(table.labels.len(), &table.roads);
            let dist = dijkstra_all(&adj, start);
            if let Ok(elapsed) = now.elapsed() {
                info!("{} s", elapsed.as_secs_f64());
            }
            println!("Cost: {}", dist[end]);

            if let Some(out_path) = cli.out {
                let mut wtr = Writer::from_path(&out_path)
                    .with_context(|| format!("creating CSV {}", &out_path))?;
                wtr.write_record(["city", "cost"])?;
                let mut rows: Vec<(CityId, Cost)> = dist.iter().copied().enumerate().collect();
                rows.sort_by_key(|&(_, d)| OrderedFloat(d));
                let mut written = 0;
                for (city, d) in rows {
                    if d.is_finite() || cli.include_unreachable {
                        let val = if d.is_finite() {
                            format!("{:.6}", d)
                        } else {
                            String::from("inf")
                        };
                        wtr.write_record(&[table.labels[city].as_str(), val.as_str()])?;
                        written += 1;
                    }
                }
                wtr.flush()?;
                println!("Wrote costs for {} cities to {}", written, out_path);
            }
        }
    }

    Ok(())
}
