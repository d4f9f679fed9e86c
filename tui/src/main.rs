use clap::Parser;
use color_eyre::eyre::Result;
use spotlight_tui::Cli;
use spotlight_tui::run_main;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    if let Some(id) = run_main(cli).await? {
        println!("{id}");
    }
    Ok(())
}
