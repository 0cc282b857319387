use std::path::PathBuf;

use clap::Parser;

use chambee_providers::models;

/// Lists the models the configured completion endpoint offers for text generation.
#[derive(Debug, Parser)]
#[command(
	version = chambee_cli::VERSION,
	rename_all = "kebab",
	styles = chambee_cli::styles(),
)]
struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();
	let config = chambee_config::load(&args.config)?;
	let completion = &config.providers.completion;
	let names = models::list_models(completion).await?;

	if names.is_empty() {
		eprintln!("No generation models reported by {}.", completion.provider_id);
	}

	for name in names {
		println!("{name}");
	}

	Ok(())
}
