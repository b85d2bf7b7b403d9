use anyhow::Result;
use std::env;
use std::io;

use pkgremove::cli::{init_logging, CliArgs};
use pkgremove::spoke::SpokeModel;
use pkgremove::text::TextSpoke;

fn main() -> Result<()> {
    init_logging();

    let args = CliArgs::parse(env::args().skip(1))?;
    if args.help {
        println!(
            "Usage: pkgremove-text [--socket PATH | --local] [--candidates FILE] [--columns N] [--config FILE]"
        );
        return Ok(());
    }

    let config = args.config()?;
    if !SpokeModel::showable(&config.candidates_path) {
        println!(
            "No removable package list at {}, nothing to choose.",
            config.candidates_path.display()
        );
        return Ok(());
    }

    let mut proxy = args.proxy(&config)?;
    let mut spoke = TextSpoke::new(proxy.as_mut());
    if let Some(columns) = args.columns {
        spoke = spoke.with_columns(columns);
    }

    let stdin = io::stdin();
    let selection = spoke.run(stdin.lock(), io::stdout())?;
    println!("{}", spoke.model().status());
    tracing::debug!("Selection stored: {:?}", selection);
    Ok(())
}
