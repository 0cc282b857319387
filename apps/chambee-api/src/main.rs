use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = chambee_api::Args::parse();

	chambee_api::run(args).await
}
