use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ransom::corpus::prepare_target;
use ransom::index::{cache, stats};
use ransom::output::{print_fragments, print_json, shuffle_locations, WordResult};
use ransom::utils::{get_config_path, remove_index, AppConfig};
use ransom::FragmentDecomposer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ransom")]
#[command(about = "Decompose text into fragments sourced verbatim from a corpus")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or rebuild the index for a corpus
    Index {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Force full rebuild
        #[arg(short, long)]
        force: bool,
    },
    /// Decompose text into corpus fragments
    Decompose {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Text to decompose
        #[arg(required = true)]
        text: Vec<String>,

        /// Distinct index keys consulted per fragment
        #[arg(short, long)]
        limit: Option<usize>,

        /// Decompose the text verbatim instead of word by word
        #[arg(long)]
        raw: bool,

        /// Emit JSON instead of annotated text
        #[arg(long)]
        json: bool,

        /// Locations shown per fragment
        #[arg(long, default_value_t = 3)]
        show: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Shuffle each fragment's locations before showing them
        #[arg(long)]
        shuffle: bool,

        /// Seed for --shuffle, for reproducible output
        #[arg(long, requires = "shuffle")]
        seed: Option<u64>,
    },
    /// Show index statistics
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// List all indexed corpora
    List,
    /// Remove the cached index of a corpus
    Remove {
        /// Corpus file whose index should be removed
        corpus: PathBuf,
    },
    /// Print the effective configuration
    Config {
        /// Write the defaults to the config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus file (JSON array of records)
    corpus: PathBuf,

    /// Record fields to index, overriding the config file
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,

    /// Languages to keep, overriding the config file
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<String>>,
}

impl CorpusArgs {
    /// Config file values with command-line overrides applied
    fn config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load()?;
        if let Some(fields) = &self.fields {
            config.field_names = fields.clone();
        }
        if let Some(languages) = &self.languages {
            config.languages = languages.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Index { corpus, force } => {
            let config = corpus.config()?;
            cache::load_or_build(&corpus.corpus, &config, force, false)?;
        }
        Commands::Decompose {
            corpus,
            text,
            limit,
            raw,
            json,
            show,
            no_color,
            shuffle,
            seed,
        } => {
            let config = corpus.config()?;
            let limit = limit.unwrap_or(config.match_limit);

            let joined = text.join(" ");
            let words = if raw { vec![joined] } else { prepare_target(&joined) };
            if words.is_empty() {
                anyhow::bail!("Nothing left to decompose after removing non-letters");
            }

            let index = cache::load_or_build(&corpus.corpus, &config, false, json)?;
            let decomposer = FragmentDecomposer::new(&index, limit)?;

            let fragments = if config.parallel_decompose {
                decomposer.decompose_all(&words)?
            } else {
                words
                    .iter()
                    .map(|w| decomposer.decompose(w))
                    .collect::<ransom::Result<Vec<_>>>()?
            };

            let mut results: Vec<WordResult> = words
                .into_iter()
                .zip(fragments)
                .map(|(word, fragments)| WordResult { word, fragments })
                .collect();

            if shuffle {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                shuffle_locations(&mut results, &mut rng);
            }

            if json {
                print_json(&results)?;
            } else {
                print_fragments(&results, &index, !no_color, show)?;
            }
        }
        Commands::Stats { corpus } => {
            let config = corpus.config()?;
            stats::show_stats(&corpus.corpus, &config)?;
        }
        Commands::List => {
            stats::list_indexes()?;
        }
        Commands::Remove { corpus } => {
            let corpus = corpus.canonicalize().context("Invalid corpus path")?;
            if remove_index(&corpus)? {
                println!("Removed index for: {}", corpus.display());
            } else {
                println!("No index found for: {}", corpus.display());
            }
        }
        Commands::Config { init } => {
            let path = get_config_path()?;
            let config = AppConfig::load()?;
            if init && !path.exists() {
                config.save()?;
                println!("Wrote defaults to {}", path.display());
            }
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "ransom=warn",
        1 => "ransom=info",
        2 => "ransom=debug",
        _ => "ransom=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
