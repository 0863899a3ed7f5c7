use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use panel_cutsheet::cutsheet::{CutSheetRequest, CutSheetResult, generate_cut_sheet};
use panel_cutsheet::error::Result;
use panel_cutsheet::holes::{HoleLayoutRequest, layout_holes};
use panel_cutsheet::render;
use panel_cutsheet::types::{DEFAULT_KERF, DEFAULT_SHEET_HEIGHT, DEFAULT_SHEET_WIDTH};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "panel_cutsheet",
    about = "Enclosure panel cut-sheet generator"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive enclosure panels and pack them onto sheet stock
    Cutsheet(CutsheetArgs),
    /// Place driver holes on a panel from a JSON request
    Holes {
        /// JSON file with panel_width, panel_height and holes
        #[arg(long)]
        request: PathBuf,
    },
}

#[derive(Args)]
struct CutsheetArgs {
    /// JSON request file; cannot be combined with geometry or stock flags
    #[arg(
        long,
        conflicts_with_all = [
            "width", "height", "depth", "wall_thickness", "join_style", "kerf",
            "sheet_width", "sheet_height", "slot_port_height", "slot_port_width",
            "num_slot_ports", "brace_count", "brace_strip_width",
        ]
    )]
    request: Option<PathBuf>,

    /// Exterior width in inches
    #[arg(long, required_unless_present = "request")]
    width: Option<f64>,

    /// Exterior height in inches
    #[arg(long, required_unless_present = "request")]
    height: Option<f64>,

    /// Exterior depth in inches
    #[arg(long, required_unless_present = "request")]
    depth: Option<f64>,

    #[arg(long, default_value_t = 0.75)]
    wall_thickness: f64,

    /// front_back_overlap or side_overlap
    #[arg(long, default_value = "front_back_overlap")]
    join_style: String,

    /// Blade kerf in inches
    #[arg(long, default_value_t = DEFAULT_KERF)]
    kerf: f64,

    #[arg(long, default_value_t = DEFAULT_SHEET_WIDTH)]
    sheet_width: f64,

    #[arg(long, default_value_t = DEFAULT_SHEET_HEIGHT)]
    sheet_height: f64,

    /// Slot port divider height; needs --slot-port-width and --num-slot-ports
    #[arg(long, requires_all = ["slot_port_width", "num_slot_ports"])]
    slot_port_height: Option<f64>,

    #[arg(long, requires = "slot_port_height")]
    slot_port_width: Option<f64>,

    #[arg(long, requires = "slot_port_height")]
    num_slot_ports: Option<u32>,

    /// Number of vertical brace strips
    #[arg(long, default_value_t = 0)]
    brace_count: u32,

    #[arg(long, default_value_t = 2.0)]
    brace_strip_width: f64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,
}

impl CutsheetArgs {
    fn to_request(&self) -> Result<CutSheetRequest> {
        if let Some(path) = &self.request {
            return read_json(path);
        }
        // clap guarantees the geometry flags when --request is absent.
        let mut request = CutSheetRequest::new(
            self.width.unwrap_or_default(),
            self.height.unwrap_or_default(),
            self.depth.unwrap_or_default(),
        );
        request.wall_thickness = self.wall_thickness;
        request.join_style = self.join_style.clone();
        request.kerf_thickness = self.kerf;
        request.sheet_width = self.sheet_width;
        request.sheet_height = self.sheet_height;
        request.include_ports = self.slot_port_height.is_some();
        request.slot_port_height = self.slot_port_height;
        request.slot_port_width = self.slot_port_width;
        request.num_slot_ports = self.num_slot_ports;
        request.include_bracing = self.brace_count > 0;
        request.brace_count = self.brace_count;
        request.brace_strip_width = self.brace_strip_width;
        Ok(request)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn print_result(result: &CutSheetResult, layout: bool) {
    for sheet in 0..result.sheets_used() {
        println!("Sheet {}:", sheet + 1);
        for p in result.sheet_placements(sheet) {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!(
                "  {} {}x{} @ ({}, {}){}",
                p.name, p.width, p.height, p.x, p.y, rot
            );
        }
        if layout {
            print!("{}", render::render_sheet(result, sheet));
        }
        println!();
    }

    println!(
        "Summary: {} panel{}, {} sheet{} ({}x{}) used, {:.1}% utilization, kerf {:.3}",
        result.panels().len(),
        if result.panels().len() == 1 { "" } else { "s" },
        result.sheets_used(),
        if result.sheets_used() == 1 { "" } else { "s" },
        result.sheet_width(),
        result.sheet_height(),
        result.utilization_pct(),
        result.kerf(),
    );
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Cutsheet(args) => {
            let request = args.to_request()?;
            let result = generate_cut_sheet(&request)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result, args.layout);
            }
        }
        Command::Holes { request } => {
            let request: HoleLayoutRequest = read_json(&request)?;
            let layout = layout_holes(&request)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run(cli) {
        tracing::warn!(error = %e, "request rejected");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("panel_cutsheet").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_geometry_flags() {
        let cli = parse(&[
            "cutsheet", "--width", "18", "--height", "12", "--depth", "10", "--kerf", "0.25",
        ])
        .unwrap();
        let Command::Cutsheet(args) = cli.command else {
            panic!("expected cutsheet");
        };
        let request = args.to_request().unwrap();
        assert_eq!((request.width, request.height, request.depth), (18.0, 12.0, 10.0));
        assert_eq!(request.kerf_thickness, 0.25);
        assert!(!request.include_ports && !request.include_bracing);
    }

    #[test]
    fn test_request_file_alone() {
        assert!(parse(&["cutsheet", "--request", "box.json", "--json"]).is_ok());
    }

    #[test]
    fn test_request_file_rejects_stock_flags() {
        for flag in [
            ["--kerf", "0.25"],
            ["--sheet-width", "60"],
            ["--join-style", "side_overlap"],
            ["--brace-count", "2"],
        ] {
            let mut args = vec!["cutsheet", "--request", "box.json"];
            args.extend(flag);
            let err = parse(&args).err().unwrap();
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict, "{flag:?}");
        }
    }

    #[test]
    fn test_geometry_required_without_request() {
        assert!(parse(&["cutsheet", "--width", "18"]).is_err());
    }
}
