use std::fs::File;
use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use biergarten::config::{Cli, OutputFormat, SourceKind};
use biergarten::finder::Finder;
use biergarten::http::{ReqwestClient, DEFAULT_HTTP_TIMEOUT};
use biergarten::locate::{AnyLocator, FixedLocator, IpLocator};
use biergarten::logging::init_logging;
use biergarten::report;
use biergarten::source::{AnySource, OverpassSource, StaticFileSource};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let client = ReqwestClient::new(DEFAULT_HTTP_TIMEOUT).context("building HTTP client")?;

    let locator = match cli.fixed_position().context("invalid --lat/--lon")? {
        Some(here) => AnyLocator::Fixed(FixedLocator(here)),
        None => AnyLocator::Ip(IpLocator::new(
            client.clone(),
            cli.locate_url.as_str(),
            cli.locate_timeout(),
        )),
    };

    let source = match cli.source {
        SourceKind::Static => AnySource::Static(StaticFileSource::new(&cli.data)),
        SourceKind::Overpass => AnySource::Overpass(OverpassSource::new(
            client,
            cli.overpass_url.as_str(),
            cli.radius,
        )),
    };

    let finder = Finder::new(locator, source);
    let found = match finder.search().await {
        Ok(found) => found,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut stdout = io::stdout().lock();
    match cli.format {
        OutputFormat::Text => report::write_summary(&mut stdout, &found)?,
        OutputFormat::Json => report::write_json(&mut stdout, &found)?,
    }

    if let Some(out_path) = cli.out {
        let file = File::create(&out_path).with_context(|| format!("creating CSV {}", &out_path))?;
        let rows = report::write_ranking(file, &found)
            .with_context(|| format!("writing CSV {}", &out_path))?;
        eprintln!("Wrote {} ranked Biergärten to {}", rows, out_path);
    }

    Ok(ExitCode::SUCCESS)
}
