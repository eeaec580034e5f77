use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = reverie_api::Args::parse();

	reverie_api::run(args).await
}
