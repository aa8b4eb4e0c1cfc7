//! Command-line front end for offline checks of routes and motion plans.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use warehouse_bot::RobotConfig;
use warehouse_bot::motion::{CalibrationTable, CommandSelector, pixel_to_cm};
use warehouse_bot::route::RouteResolver;

/// Warehouse robot planning tools.
#[derive(Parser, Debug)]
#[command(name = "warehouse-bot", version, about)]
struct Args {
    /// JSON file overriding the default robot configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between two zones of a warehouse graph
    Route {
        /// Warehouse graph JSON
        #[arg(long)]
        graph: PathBuf,
        from: String,
        to: String,
    },
    /// Select motor commands for an offset in centimeters
    Move {
        #[arg(allow_hyphen_values = true)]
        x_cm: f64,
        #[arg(allow_hyphen_values = true)]
        y_cm: f64,
    },
    /// Convert an image pixel to centimeters and select commands for it
    Pixel { px: f64, py: f64 },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RobotConfig::from_json_file(path)?,
        None => RobotConfig::default(),
    };
    let selector = CommandSelector::new(CalibrationTable::standard(), config.selector.clone());

    match args.command {
        Command::Route { graph, from, to } => {
            let resolver = RouteResolver::from_json_file(&graph)?;
            let route = resolver.plan_route(&from, &to)?;
            info!("{} hop(s) from {from} to {to}", route.hops());

            let path: Vec<String> = route.path.iter().map(ToString::to_string).collect();
            println!("path:  {}", path.join(" -> "));
            for turn in &route.turns {
                println!("  at {}: {:?} ({})", turn.node, turn.turn, turn.turn.code());
            }
            println!("codes: {:?}", route.direction_codes());
            println!("tags:  {:?}", route.tags);
        }
        Command::Move { x_cm, y_cm } => print_plan(&selector, x_cm, y_cm),
        Command::Pixel { px, py } => {
            let (x_cm, y_cm) = pixel_to_cm(px, py);
            println!("pixel ({px}, {py}) -> ({x_cm}, {y_cm}) cm");
            print_plan(&selector, x_cm, y_cm);
        }
    }
    Ok(())
}

fn print_plan(selector: &CommandSelector, x_cm: f64, y_cm: f64) {
    let moves = selector.plan(x_cm, y_cm);
    if moves.is_empty() {
        println!("aligned, no moves ({:?})", selector.dynamic_command(x_cm, y_cm));
    }
    for m in moves {
        println!("{:?}: {} ({} cm)", m.axis, m.command, m.distance_cm);
    }
}
