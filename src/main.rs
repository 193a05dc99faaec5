use clap::{Parser, Subcommand};
use dotenv::dotenv;
use flowforge_rs::engine::FlowError;
use flowforge_rs::workflow::graph::{match_ports, PortMatch, PortType};
use flowforge_rs::workflow::loader::GraphLoader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a saved workflow graph
    Inspect {
        /// Path to the workflow file (JSON or YAML)
        #[arg(short, long)]
        file: String,
    },
    /// List the immediate upstream and downstream steps of a node
    Neighbors {
        /// Path to the workflow file (JSON or YAML)
        #[arg(short, long)]
        file: String,

        /// Node id
        #[arg(short, long)]
        node: String,
    },
    /// Check whether a producer port type can feed a consumer port type
    MatchPorts {
        /// Producer type tag, e.g. "datasetId|modelId"
        #[arg(short, long)]
        source: String,

        /// Consumer type tag
        #[arg(short, long)]
        target: String,
    },
    /// Switch a node to one of its saved output snapshots
    SelectOutput {
        /// Path to the workflow file (JSON or YAML)
        #[arg(short, long)]
        file: String,

        /// Node id
        #[arg(short, long)]
        node: String,

        /// Snapshot id to make active
        #[arg(short, long)]
        snapshot: String,

        /// Where to write the updated graph (JSON); defaults to stdout
        #[arg(short, long)]
        out: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let loader = GraphLoader::new();

    match args.command {
        Commands::Inspect { file } => {
            let graph = loader.load_graph(&file)?;
            println!("Workflow: {} ({})", graph.name, graph.id);
            if !graph.description.is_empty() {
                println!("{}", graph.description);
            }

            println!("\nNodes ({}):", graph.nodes.len());
            for node in &graph.nodes {
                let stale = if node.is_stale() { " [stale]" } else { "" };
                println!(
                    "  - {} [{}] {:?}, {} in / {} out, {} snapshot(s){}",
                    node.id,
                    node.operation_type,
                    node.status_code,
                    node.inputs.len(),
                    node.outputs.len(),
                    node.output_snapshots.len(),
                    stale
                );
            }

            println!("\nEdges ({}):", graph.edges.len());
            for edge in &graph.edges {
                println!(
                    "  - {}:{} -> {}:{}",
                    edge.source, edge.source_port_id, edge.target, edge.target_port_id
                );
            }
        }
        Commands::Neighbors { file, node } => {
            let graph = loader.load_graph(&file)?;
            if graph.node(&node).is_none() {
                log::warn!("Node {} not found in {}", node, file);
            }

            let neighbors = graph.neighbor_nodes(&node);
            println!("Upstream:");
            for n in &neighbors.upstream_nodes {
                println!("  - {} [{}]", n.id, n.operation_type);
            }
            println!("Downstream:");
            for n in &neighbors.downstream_nodes {
                println!("  - {} [{}]", n.id, n.operation_type);
            }
        }
        Commands::MatchPorts { source, target } => {
            let producer: PortType = source.parse().map_err(FlowError::from)?;
            let consumer: PortType = target.parse().map_err(FlowError::from)?;

            match match_ports(&producer, &consumer) {
                PortMatch::Exact => println!("compatible: exact match"),
                PortMatch::Narrowed(kind) => println!("compatible: narrowed to '{}'", kind),
                PortMatch::Accepted => println!("compatible: accepted by union consumer"),
                PortMatch::Incompatible => println!("incompatible"),
            }
        }
        Commands::SelectOutput {
            file,
            node,
            snapshot,
            out,
        } => {
            let mut graph = loader.load_graph(&file)?;
            if graph.node(&node).is_none() {
                log::error!("Node {} not found in {}", node, file);
                return Err(FlowError::node_not_found(node).into());
            }
            graph.select_output(&node, &snapshot)?;

            match out {
                Some(path) => {
                    loader.save_graph(&graph, &path)?;
                    log::info!("Wrote updated workflow to {}", path);
                }
                None => println!("{}", GraphLoader::to_json(&graph)?),
            }
        }
    }

    Ok(())
}
