use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Arg, ArgAction, Command};

use tunestep::config::Config;
use tunestep::pipeline::{corpus, sequences};
use tunestep::vocab::Mapping;

fn cli() -> Command {
    Command::new("tunestep")
        .about("Preprocess a folk-melody corpus into integer training sequences")
        .arg(
            Arg::new("dataset")
                .short('d')
                .long("dataset")
                .value_name("DIR")
                .help("Directory of MusicXML scores (walked recursively)"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .value_name("DIR")
                .help("Directory for per-song encoded artifacts"),
        )
        .arg(
            Arg::new("corpus-file")
                .long("corpus-file")
                .value_name("FILE")
                .help("Path for the assembled single-file corpus"),
        )
        .arg(
            Arg::new("mapping")
                .long("mapping")
                .value_name("FILE")
                .help("Path for the symbol-to-integer vocabulary"),
        )
        .arg(
            Arg::new("sequence-length")
                .short('l')
                .long("sequence-length")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Training context length (also the song-boundary run length)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only print the final summary line"),
        )
}

fn main() -> Result<()> {
    env_logger::init(); // per-song detail with RUST_LOG=debug
    let matches = cli().get_matches();

    let mut config = Config::default();
    if let Some(dir) = matches.get_one::<String>("dataset") {
        config.dataset_dir = PathBuf::from(dir);
    }
    if let Some(dir) = matches.get_one::<String>("out-dir") {
        config.encoded_dir = PathBuf::from(dir);
    }
    if let Some(file) = matches.get_one::<String>("corpus-file") {
        config.corpus_path = PathBuf::from(file);
    }
    if let Some(file) = matches.get_one::<String>("mapping") {
        config.mapping_path = PathBuf::from(file);
    }
    if let Some(&n) = matches.get_one::<usize>("sequence-length") {
        if n == 0 {
            bail!("sequence length must be at least 1");
        }
        config.sequence_length = n;
    }
    let quiet = matches.get_flag("quiet");

    let summary = corpus::build(&config)?;
    if !quiet {
        println!(
            "songs: {} accepted, {} excluded, {} failed",
            summary.accepted(),
            summary.excluded,
            summary.failed
        );
    }
    if summary.songs.is_empty() {
        bail!(
            "no scores accepted from {}; nothing to assemble",
            config.dataset_dir.display()
        );
    }

    let text = corpus::assemble(&summary, config.sequence_length, &config.corpus_path)?;
    let mapping = Mapping::build(&text);
    mapping.save(&config.mapping_path)?;

    let data = sequences::generate(&text, &mapping, config.sequence_length)?;
    println!(
        "corpus: {} tokens, vocabulary: {} symbols, inputs: {:?}, targets: {:?}",
        text.split_whitespace().count(),
        mapping.len(),
        data.inputs.dims(),
        data.targets.dims()
    );
    Ok(())
}
