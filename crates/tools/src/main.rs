use anyhow::{Context, Result, bail};
use cavern_core::content::showcase_cave;
use cavern_core::replay_file::load_replay_from_file;
use cavern_core::{CaveRendered, check_replays};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the replay JSONL file to verify
    #[arg(short, long)]
    replay: PathBuf,

    /// Overwrite a mismatching checksum with the freshly computed one
    #[arg(long, default_value_t = false)]
    repair: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_replay_from_file(&args.replay)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Failed to load replay file: {}", args.replay.display()))?;

    let mut cave = showcase_cave();
    if loaded.cave_name != cave.base.name {
        bail!(
            "replay was recorded against cave {:?}, only {:?} is built in",
            loaded.cave_name,
            cave.base.name
        );
    }

    println!("Replay: level {} seed {}", loaded.replay.level + 1, loaded.replay.seed);
    println!("Frames: {}", loaded.replay.len());

    let rendered = CaveRendered::new(&cave, loaded.replay.level, loaded.replay.seed);
    let computed = rendered.checksum();
    let stored = loaded.replay.checksum;

    cave.replays.push(loaded.replay);
    let wrong = check_replays(&mut cave, false, args.repair);

    println!("Stored checksum:   {stored:#010x}");
    println!("Computed checksum: {computed:#010x}");
    match (wrong, args.repair) {
        (0, _) => println!("Replay matches this cave."),
        (_, true) => println!("Replay did not match; checksum repaired."),
        (_, false) => bail!("replay does not match this cave"),
    }

    Ok(())
}
