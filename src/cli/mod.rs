// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case in Layer 2. Printing happens here and nowhere else.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EmbedArgs, EncodeArgs, VectorizeArgs};

#[derive(Parser, Debug)]
#[command(
    name = "surname-vectorizer",
    version = "0.1.0",
    about = "Vectorize a CSV of surnames into padded integer batches for sequence models."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Vectorize(args) => run_vectorize(args),
            Commands::Encode(args)    => run_encode(args),
            Commands::Embed(args)     => run_embed(args),
        }
    }
}

fn run_vectorize(args: VectorizeArgs) -> Result<()> {
    use crate::application::vectorize_use_case::VectorizeUseCase;

    tracing::info!("Vectorizing '{}'", args.data.surname_csv.display());
    let report = VectorizeUseCase::new(args.into()).execute()?;

    println!("split:              {}", report.split);
    println!("rows:               {}", report.rows);
    println!("max_seq_length:     {}", report.max_seq_length);
    println!("surname vocab:      {}", report.surname_vocab_size);
    println!("nationality vocab:  {}", report.nationality_vocab_size);
    println!("batches:            {} ({} rows)", report.batches, report.rows_batched);
    println!("class weights:      {:?}", report.class_weights);
    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    use crate::application::inspect_use_case::encode_surname;

    let row = encode_surname(&args.vectorizer_file, &args.surname)?;
    println!("{}: {:?}", args.surname, row);
    Ok(())
}

fn run_embed(args: EmbedArgs) -> Result<()> {
    use crate::application::inspect_use_case::EmbedUseCase;

    let embedding_dim = args.embedding_dim;
    match EmbedUseCase::new(args.into(), embedding_dim).execute()? {
        Some(report) => {
            println!("x_surnames: {:?}", report.batch);
            println!("embedded:   {:?}", report.embedded);
            println!("permuted:   {:?}", report.permuted);
        }
        None => println!("No batch available for the requested split."),
    }
    Ok(())
}
