use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use mortar_engine::{
    FiringSolver, GridReference, InterpolationMode, SolverConfig, TargetingSolution,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mortar")]
#[command(version = "0.1.0")]
#[command(about = "Bearing, range and elevation between two grid references", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base (firing position) grid reference, e.g. A1K5
    base: Option<String>,

    /// Target grid reference, e.g. C4K37
    target: Option<String>,

    #[command(flatten)]
    solver: SolverArgs,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Args)]
struct SolverArgs {
    /// Elevation interpolation between calibration points
    #[arg(long, value_enum, default_value = "spline")]
    mode: Mode,

    /// CSV calibration table replacing the built-in one; first row must be a header such as `distance,mils`
    #[arg(long, env = "MORTAR_CALIBRATION_TABLE")]
    table: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the map position of a grid reference
    Locate {
        /// Grid reference, e.g. B7K19
        grid: String,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Print the calibration table in use
    Table {
        #[command(flatten)]
        solver: SolverArgs,
    },

    /// Display grid and calibration information
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Spline,
    Linear,
}

impl From<Mode> for InterpolationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Spline => InterpolationMode::Spline,
            Mode::Linear => InterpolationMode::Linear,
        }
    }
}

impl SolverArgs {
    fn config(&self) -> SolverConfig {
        SolverConfig {
            mode: self.mode.into(),
            table_path: self.table.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SolutionReport<'a> {
    base: String,
    target: String,
    base_position: [f64; 2],
    target_position: [f64; 2],
    #[serde(flatten)]
    solution: &'a TargetingSolution,
}

#[derive(Debug, Serialize)]
struct LocationReport {
    grid: String,
    x: f64,
    y: f64,
    cell_size: f64,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Some(Commands::Locate { grid, output }) => {
            let grid: GridReference = grid.parse()?;
            display_location(&grid, output)?;
        }

        Some(Commands::Table { solver }) => {
            let solver = FiringSolver::from_config(&solver.config())?;
            display_table(&solver);
        }

        Some(Commands::Info) => display_info(),

        None => {
            let (base, target) = match (cli.base, cli.target) {
                (Some(base), Some(target)) => (base, target),
                _ => return Err("expected BASE and TARGET grid references (see --help)".into()),
            };
            let solver = FiringSolver::from_config(&cli.solver.config())?;
            let base: GridReference = base.parse()?;
            let target: GridReference = target.parse()?;
            let solution = solver.solve_refs(&base, &target);
            display_solution(&base, &target, &solution, cli.output)?;
        }
    }

    Ok(())
}

fn format_elevation(solution: &TargetingSolution) -> String {
    match solution.elevation() {
        Some(mils) => format!("{mils:.1} mils"),
        None => "N/A".to_string(),
    }
}

fn display_solution(
    base: &GridReference,
    target: &GridReference,
    solution: &TargetingSolution,
    format: OutputFormat,
) -> Result<(), serde_json::Error> {
    let base_pos = base.position();
    let target_pos = target.position();

    match format {
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║           FIRING SOLUTION              ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Base:     {:<28} ║", base.to_string());
            println!("║ Target:   {:<28} ║", target.to_string());
            println!("╠════════════════════════════════════════╣");
            println!("║ Bearing:   {:>12.1} deg              ║", solution.bearing_degrees);
            println!("║ Range:     {:>12.1} m                ║", solution.distance_units);
            println!("║ Elevation: {:>17}                ║", format_elevation(solution));
            println!("╚════════════════════════════════════════╝");
        }

        OutputFormat::Json => {
            let report = SolutionReport {
                base: base.to_string(),
                target: target.to_string(),
                base_position: [base_pos.x, base_pos.y],
                target_position: [target_pos.x, target_pos.y],
                solution,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        OutputFormat::Csv => {
            println!("base,target,bearing_deg,range,reachable,elevation_mils");
            let elevation = solution
                .elevation()
                .map(|m| format!("{m:.1}"))
                .unwrap_or_else(|| "N/A".to_string());
            println!(
                "{},{},{:.1},{:.1},{},{}",
                base, target, solution.bearing_degrees, solution.distance_units,
                solution.reachable, elevation
            );
        }
    }

    Ok(())
}

fn display_location(grid: &GridReference, format: OutputFormat) -> Result<(), serde_json::Error> {
    let pos = grid.position();

    match format {
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║ Grid:      {:<27} ║", grid.to_string());
            println!("║ X:         {:>12.2} m               ║", pos.x);
            println!("║ Y:         {:>12.2} m               ║", pos.y);
            println!("║ Cell size: {:>12.2} m               ║", grid.cell_size());
            println!("╚════════════════════════════════════════╝");
        }

        OutputFormat::Json => {
            let report = LocationReport {
                grid: grid.to_string(),
                x: pos.x,
                y: pos.y,
                cell_size: grid.cell_size(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        OutputFormat::Csv => {
            println!("grid,x,y,cell_size");
            println!("{},{:.2},{:.2},{:.2}", grid, pos.x, pos.y, grid.cell_size());
        }
    }

    Ok(())
}

fn display_table(solver: &FiringSolver) {
    println!("Calibration table ({} interpolation)", solver.mode());
    println!("┌──────────┬──────────┐");
    println!("│ Range(m) │  Mils    │");
    println!("├──────────┼──────────┤");
    for (distance, mils) in solver.table().points() {
        println!("│ {distance:>8.1} │ {mils:>8.1} │");
    }
    println!("└──────────┴──────────┘");
}

fn display_info() {
    let table = mortar_engine::ElevationTable::standard();
    println!("╔════════════════════════════════════════╗");
    println!("║         MORTAR ENGINE v0.1.0           ║");
    println!("╠════════════════════════════════════════╣");
    println!("║ Grid format: <letter><1-2 digits>      ║");
    println!("║              [K<keypad digits>]        ║");
    println!("║ Major cell:  {:>6.0} m                  ║", mortar_engine::BASE_GRID);
    println!("║ Keypads:     1 2 3 / 4 5 6 / 7 8 9     ║");
    println!("║ Bearing 0:   grid north (-y)           ║");
    println!(
        "║ Range band:  {:>5.0} - {:<5.0} m           ║",
        table.min_distance(),
        table.max_distance()
    );
    println!("╚════════════════════════════════════════╝");
}
