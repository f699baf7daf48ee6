use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use estimate_core::calculations::{PaintInput, PlumbingRow, TileInput};

/// Home construction cost estimator.
///
/// Builds tile, paint and plumbing estimation lists, keeps them between
/// runs, and exports plain-text summaries.
#[derive(Debug, Parser)]
#[command(name = "home-estimator", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file. Defaults to `home-estimator.toml` in the working
    /// directory when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Storage connection string. For SQLite this is a file path
    /// (e.g. `estimates.db`) or `:memory:`.
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Directory that exported reports are written to.
    #[arg(long, global = true)]
    pub export_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `estimate_core=trace`. `RUST_LOG` wins.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Floor and wall tile estimations.
    Tile {
        #[command(subcommand)]
        action: TileAction,
    },
    /// House paint estimations.
    Paint {
        #[command(subcommand)]
        action: PaintAction,
    },
    /// Plumbing fixture estimations.
    Plumbing {
        #[command(subcommand)]
        action: PlumbingAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum TileAction {
    /// Compute a tile estimation and add it to the list.
    Add(TileArgs),
    #[command(flatten)]
    List(ListAction),
}

#[derive(Debug, Subcommand)]
pub enum PaintAction {
    /// Compute a paint estimation and add it to the list.
    Add(PaintArgs),
    #[command(flatten)]
    List(ListAction),
}

#[derive(Debug, Subcommand)]
pub enum PlumbingAction {
    /// Compute a plumbing sheet and add every row with a non-zero amount.
    Add(PlumbingArgs),
    /// Show every fixture and its price tiers.
    Catalog,
    #[command(flatten)]
    List(ListAction),
}

/// Operations shared by every estimation list.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ListAction {
    /// Print the list with its total.
    List,
    /// Remove the entry at a position shown by `list` (starting at 1).
    Remove { position: usize },
    /// Remove every entry.
    Clear,
    /// Write the list report, or one entry's report, to the export directory.
    Export {
        /// Export only the entry at this position.
        #[arg(long)]
        item: Option<usize>,
    },
    /// Print the list total.
    Total,
}

#[derive(Debug, Clone, Args)]
pub struct TileArgs {
    /// Living Room, Bedroom, Kitchen, Bathroom or Parking.
    #[arg(long)]
    pub room: String,

    /// `floor` or `wall`.
    #[arg(long = "type", default_value = "floor")]
    pub tile_type: String,

    /// 1x1, 1x2, 2x2 or 2x4.
    #[arg(long, default_value = "1x1")]
    pub size: String,

    /// Area in square feet.
    #[arg(long)]
    pub area: String,

    /// Cost per square foot.
    #[arg(long)]
    pub cost: String,
}

impl From<TileArgs> for TileInput {
    fn from(args: TileArgs) -> Self {
        Self {
            room: args.room,
            tile_type: args.tile_type,
            tile_size: args.size,
            area: args.area,
            cost_per_sq_ft: args.cost,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PaintArgs {
    /// Asian Paint, Berger Paint, Nerolac Paint or Dulux.
    #[arg(long)]
    pub brand: String,

    /// Interior, Exterior, Metal Paint or Wood Paint.
    #[arg(long = "type")]
    pub paint_type: String,

    /// Area in square feet.
    #[arg(long)]
    pub area: String,

    /// Cost per litre.
    #[arg(long)]
    pub cost_per_litre: String,

    /// Square feet covered by one litre.
    #[arg(long, default_value = "")]
    pub coverage: String,

    /// `first` or `second`.
    #[arg(long, default_value = "first")]
    pub coat: String,
}

impl From<PaintArgs> for PaintInput {
    fn from(args: PaintArgs) -> Self {
        Self {
            brand: args.brand,
            paint_type: args.paint_type,
            area: args.area,
            cost_per_litre: args.cost_per_litre,
            coverage: args.coverage,
            coat: args.coat,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PlumbingArgs {
    /// A sheet row as `<fixture>:<tier>:<bathrooms>`; a blank tier picks
    /// the cheapest. Repeat for each fixture.
    #[arg(long = "row", value_parser = parse_row, required = true)]
    pub rows: Vec<PlumbingRow>,
}

/// Splits from the right so fixture names may contain anything but `:`.
pub fn parse_row(s: &str) -> Result<PlumbingRow, String> {
    let mut parts = s.rsplitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(count), Some(tier), Some(fixture)) => Ok(PlumbingRow::new(fixture, tier, count)),
        _ => Err(format!(
            "expected <fixture>:<tier>:<bathrooms>, got '{s}'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_tile_add_with_global_flags() {
        let cli = Cli::try_parse_from([
            "home-estimator",
            "tile",
            "add",
            "--room",
            "Kitchen",
            "--size",
            "2x2",
            "--area",
            "120",
            "--cost",
            "45",
            "--backend",
            "memory",
        ])
        .unwrap();

        assert_eq!(cli.global.backend.as_deref(), Some("memory"));
        match cli.command {
            Command::Tile {
                action: TileAction::Add(args),
            } => {
                let input = TileInput::from(args);
                assert_eq!(input.room, "Kitchen");
                assert_eq!(input.tile_type, "floor");
                assert_eq!(input.tile_size, "2x2");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn list_actions_are_shared() {
        let cli =
            Cli::try_parse_from(["home-estimator", "paint", "export", "--item", "2"]).unwrap();

        assert!(matches!(
            cli.command,
            Command::Paint {
                action: PaintAction::List(ListAction::Export { item: Some(2) })
            }
        ));
    }

    #[test]
    fn plumbing_rows_split_from_the_right() {
        let row = parse_row("Pipes (PVC and CPVC):10000:1").unwrap();

        assert_eq!(row.fixture, "Pipes (PVC and CPVC)");
        assert_eq!(row.tier, "10000");
        assert_eq!(row.count, "1");
    }

    #[test]
    fn plumbing_row_allows_blank_tier() {
        let row = parse_row("Geyser::2").unwrap();

        assert_eq!(row.tier, "");
        assert_eq!(row.count, "2");
    }

    #[test]
    fn malformed_plumbing_row_is_rejected() {
        assert!(parse_row("Geyser").is_err());
        assert!(
            Cli::try_parse_from(["home-estimator", "plumbing", "add", "--row", "Geyser:2"])
                .is_err()
        );
    }
}
