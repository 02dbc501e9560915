use erdcanvas::layout::{GridPlacement, PlacementStrategy, RandomPlacement};
use erdcanvas::options::RendererOptions;
use erdcanvas::processor::SchemaProcessor;
use erdcanvas::renderer::DiagramRenderer;
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <schema.json> [options]", args[0]);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  -o, --output <file>    Output file (default: stdout)");
        eprintln!("  -s, --seed <n>         Seed for random table placement");
        eprintln!("  -g, --grid             Place tables on a grid instead of randomly");
        eprintln!("      --options <file>   Renderer options (JSON, partial allowed)");
        process::exit(1);
    }

    let input_path = &args[1];
    let mut output_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut grid = false;
    let mut options_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            "-s" | "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = Some(args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid seed: {}", args[i]);
                        process::exit(1);
                    }));
                }
            }
            "-g" | "--grid" => grid = true,
            "--options" => {
                i += 1;
                if i < args.len() {
                    options_path = Some(args[i].clone());
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input = read(input_path);

    let options = match options_path {
        Some(path) => match RendererOptions::from_json(&read(&path)) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Invalid options in {}: {}", path, e);
                process::exit(1);
            }
        },
        None => RendererOptions::default(),
    };

    let placement: Box<dyn PlacementStrategy> = match (grid, seed) {
        (true, _) => Box::new(GridPlacement::default()),
        (false, Some(seed)) => Box::new(RandomPlacement::seeded(seed)),
        (false, None) => Box::new(RandomPlacement::new()),
    };

    let renderer =
        DiagramRenderer::new(Some(input_path.clone()), options).with_placement(placement);
    let mut processor = SchemaProcessor::new(renderer);

    match processor.render_text(&input) {
        Ok(Some(summary)) => tracing::info!(
            nodes = summary.nodes,
            edges = summary.edges,
            duplicates = summary.duplicates,
            "rendered"
        ),
        Ok(None) => {
            eprintln!("No schema found in {}", input_path);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }

    let Some(svg) = processor.renderer().to_svg() else {
        eprintln!("Nothing to draw");
        process::exit(1);
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &svg) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => print!("{}", svg),
    }
}

fn read(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path, e);
            process::exit(1);
        }
    }
}
