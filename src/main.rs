use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use log::{info, warn};
use swap_engine::{
    LevelId, MatchingConfig, ParticipantKey, Snapshot, SwapMatcher, matches_for_entry,
};

/// Find two-way and triangle swaps in a participant snapshot
#[derive(Debug, Parser)]
#[command(name = "swap-engine", version, about)]
struct Args {
    /// JSON snapshot with locations, levels and participants
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Only match participants at this level id
    #[arg(short, long)]
    level: Option<u32>,

    /// Only look for two-way swaps
    #[arg(long, conflicts_with = "triangles_only")]
    pairs_only: bool,

    /// Only look for triangle swaps
    #[arg(long)]
    triangles_only: bool,

    /// Report matches for one fast entry instead of the whole population
    #[arg(long)]
    entry: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Show progress bars during the triangle search
    #[arg(long)]
    progress: bool,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let loaded = Snapshot::from_path(&args.snapshot)
        .and_then(Snapshot::into_parts)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    info!(
        "Loaded {} counties, {} levels and {} participants",
        loaded.hierarchy.county_count(),
        loaded.levels.len(),
        loaded.participants.len()
    );

    let mut builder = MatchingConfig::builder().show_progress(args.progress);
    if args.pairs_only {
        builder = builder.pairs_only();
    } else if args.triangles_only {
        builder = builder.triangles_only();
    }
    if let Some(level) = args.level {
        builder = builder.level_filter(LevelId(level));
    }

    let matcher = SwapMatcher::new(builder.build(), &loaded.hierarchy, &loaded.levels)?;
    let run = matcher.prepare(&loaded.participants)?;

    if let Some(entry_id) = args.entry {
        let matches = matches_for_entry(&run, entry_id)
            .with_context(|| format!("No fast entry with id {entry_id} in snapshot"))?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&matches)?);
            return Ok(());
        }
        if let Some(reason) = matches.excluded {
            warn!("{} cannot be matched: {}", matches.entry, reason);
        }
        let partners = |pairs: &[swap_engine::MatchedPair]| {
            pairs
                .iter()
                .filter_map(|p| p.partner_of(matches.entry))
                .map(|side| side.key.to_string())
                .join(", ")
        };
        println!("Fast entry {}", matches.entry);
        println!("  Mutual fast entries: {}", partners(&matches.anonymous));
        println!("  Mutual teachers: {}", partners(&matches.registered));
        for triangle in &matches.triangles {
            println!(
                "  Triangle: {}",
                triangle.keys().iter().map(ParticipantKey::to_string).join(" → ")
            );
        }
        return Ok(());
    }

    let result = matcher.execute(&run);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.render(&loaded.hierarchy));
    }

    Ok(())
}
