// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands: `vectorize`, `encode` and `embed`, plus
// the flags they share for locating data and batching it.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::vectorize_use_case::PipelineConfig;
use crate::data::batch_generator::BatchConfig;
use crate::data::loader::LoaderConfig;
use crate::domain::record::Split;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the vectorizer, save it, and batch one split
    Vectorize(VectorizeArgs),

    /// Print the padded encoding of a surname
    Encode(EncodeArgs),

    /// Embed the first batch of a split and report tensor shapes
    Embed(EmbedArgs),
}

/// Where the surname file is and which rows of it to use.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Delimited file with split, surname and nationality columns
    #[arg(long, default_value = "data/surnames_with_splits.csv")]
    pub surname_csv: PathBuf,

    /// Field separator of the surname file
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Keep only these nationalities (repeatable)
    #[arg(long = "nationality")]
    pub nationalities: Vec<String>,

    /// Split to vectorize: train, val or test
    #[arg(long, default_value = "train")]
    pub split: Split,

    /// Vectorizer JSON location
    #[arg(long, default_value = "model_storage/vectorizer.json")]
    pub vectorizer_file: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Rows per batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Keep the original row order
    #[arg(long)]
    pub no_shuffle: bool,

    /// Yield the final short batch instead of dropping it
    #[arg(long)]
    pub keep_last: bool,

    /// Seed for reproducible shuffling
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<BatchArgs> for BatchConfig {
    fn from(a: BatchArgs) -> Self {
        BatchConfig {
            batch_size: a.batch_size,
            shuffle:    !a.no_shuffle,
            drop_last:  !a.keep_last,
            seed:       a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct VectorizeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub batch: BatchArgs,

    /// Reuse an existing vectorizer file instead of refitting
    #[arg(long)]
    pub reload_from_files: bool,
}

/// Convert CLI args into the application-layer PipelineConfig.
/// The application layer never sees clap types.
fn pipeline_config(data: DataArgs, batch: BatchArgs, reload_from_files: bool) -> PipelineConfig {
    PipelineConfig {
        loader:            LoaderConfig::new(data.surname_csv).with_delimiter(data.delimiter),
        vectorizer_file:   data.vectorizer_file,
        split:             data.split,
        batch:             batch.into(),
        nationalities:     data.nationalities,
        reload_from_files,
    }
}

impl From<VectorizeArgs> for PipelineConfig {
    fn from(a: VectorizeArgs) -> Self {
        pipeline_config(a.data, a.batch, a.reload_from_files)
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// The surname to encode
    #[arg(long)]
    pub surname: String,

    /// Vectorizer JSON written by `vectorize`
    #[arg(long, default_value = "model_storage/vectorizer.json")]
    pub vectorizer_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct EmbedArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub batch: BatchArgs,

    /// Width of each character embedding
    #[arg(long, default_value_t = 16)]
    pub embedding_dim: usize,
}

impl From<EmbedArgs> for PipelineConfig {
    fn from(a: EmbedArgs) -> Self {
        pipeline_config(a.data, a.batch, true)
    }
}
