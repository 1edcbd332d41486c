//! Datasource popup driver - runs one popup session against a host fixture.
//!
//! Responsibilities:
//! - Parse command-line arguments and build the popup configuration.
//! - Wire the fixture host, settings file, and output directory into a runtime.
//! - Apply the scripted toggles, export, and close, then report the outcome.
//!
//! Does NOT handle:
//! - Selection or export semantics (see the library modules).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Only the close payload is written to stdout; notices and logs go to stderr.

use anyhow::Context;
use clap::Parser;
use datasource_config::{ConfigLoader, default_config_path};
use datasource_popup::cli::Cli;
use datasource_popup::logging;
use datasource_popup::runtime::{
    DirectoryDelivery, FileSettings, FixtureHost, HostFixture, PopupRuntime,
};
use datasource_popup::{Action, NoticeLevel};

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(1);
    }

    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new();
    if !cli.has_config_path()
        && let Ok(path) = default_config_path()
    {
        loader = loader.with_config_path(path);
    }
    let loader = cli
        .apply_overrides(loader)
        .from_env()
        .context("Failed to load configuration from environment")?;
    let config = loader.build().context("Failed to build configuration")?;

    let fixture = HostFixture::load(&cli.fixture)?;
    let settings = FileSettings::load(cli.settings.clone())?;
    let delivery = DirectoryDelivery::new(cli.out_dir.clone());

    let mut runtime = PopupRuntime::open(
        config,
        FixtureHost::new(fixture.clone()),
        settings,
        FixtureHost::new(fixture),
        delivery,
    )
    .await
    .context("Failed to open popup")?;

    if let Some(payload) = &cli.close_payload {
        runtime.set_close_payload(payload.clone());
    }
    for name in &cli.toggles {
        runtime.dispatch(Action::Toggle(name.clone())).await;
    }
    if cli.export {
        runtime.dispatch(Action::Export).await;
    }
    if !runtime.is_closed() {
        runtime.dispatch(Action::Close).await;
    }

    let mut failed = false;
    for notice in runtime.notices() {
        eprintln!("[{}] {}", notice.level.label(), notice.message);
        failed |= notice.level == NoticeLevel::Error;
    }

    let closed = runtime.is_closed();
    let (_, _, dialog, _) = runtime.into_parts();
    if let Some(payload) = dialog.closed_with() {
        println!("{payload}");
    }

    if failed {
        anyhow::bail!("popup finished with errors");
    }
    if !closed {
        anyhow::bail!("popup did not close");
    }
    Ok(())
}
