use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = amo_api::Args::parse();

	amo_api::run(args).await
}
