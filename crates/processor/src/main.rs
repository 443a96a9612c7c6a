use std::path::Path;

use clap::Parser;
use processor::runtime::{boot, cli};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::Cli::parse();
    boot::init_logging();
    let (processor, config) = boot::boot()?;

    let stdout = std::io::stdout();
    cli::run(args, &processor, Path::new(&config.data_dir), &mut stdout.lock())?;
    Ok(())
}
