//! Converts a BDF font into a `wsdisplay_font` C header, or prints all of its glyphs.

use anyhow::Result;

pub mod cli;

fn main() -> Result<()> {
    let config = cli::get_config();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.verbosity.level_filter().to_string()),
    )
    .init();

    bdf2wsfont::convert(&config)
}
