//! `geodash` - CLI for the geo-project dashboard
//!
//! This binary serves the mock project endpoint and browses projects from the
//! terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use geodash::cli::{
    Cli, Command, ConfigCommand, ExportCommand, GenerateCommand, OutputFormat, QueryCommand,
    ServeCommand, SortArgs, SourceArgs, StatsCommand,
};
use geodash::dump::write_dump;
use geodash::export::{default_export_file_name, export_to, write_csv};
use geodash::map::{Popup, Viewport};
use geodash::server::serve;
use geodash::table::{self, Pagination};
use geodash::{
    init_logging, Config, Dashboard, DumpSource, HttpSource, ProjectGenerator, ProjectSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Execute the command
    match cli.command {
        Command::Generate(cmd) => handle_generate(&config, &cmd),
        Command::Serve(cmd) => handle_serve(&config, cmd).await,
        Command::Query(cmd) => handle_query(&config, &cmd).await,
        Command::Stats(cmd) => handle_stats(&config, &cmd).await,
        Command::Export(cmd) => handle_export(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn build_source(config: &Config, args: &SourceArgs) -> anyhow::Result<Box<dyn ProjectSource>> {
    if args.remote {
        let source = config
            .endpoint_source()
            .context("failed to build HTTP client")?;
        return Ok(Box::new(source));
    }
    if let Some(url) = &args.url {
        let source = HttpSource::new(url.clone(), config.request_timeout())
            .context("failed to build HTTP client")?;
        return Ok(Box::new(source));
    }
    if let Some(path) = &args.dump {
        return Ok(Box::new(DumpSource::new(path.clone())));
    }
    Ok(Box::new(config.generator_source()))
}

async fn load_dashboard(
    config: &Config,
    source: &SourceArgs,
    filter: Option<&str>,
    sort: &SortArgs,
    pagination: Pagination,
) -> anyhow::Result<Dashboard> {
    let source = build_source(config, source)?;
    let mut dashboard = Dashboard::load(
        source.as_ref(),
        config.debounce(),
        config.generator.bounds,
        pagination,
    )
    .await;

    if let Some(panel) = dashboard.error() {
        bail!(panel);
    }

    let store = dashboard.store_mut();
    store.set_filter_text_now(filter.unwrap_or_default());
    store.set_sort_model(sort.model());
    dashboard.refresh();
    Ok(dashboard)
}

fn handle_generate(config: &Config, cmd: &GenerateCommand) -> anyhow::Result<()> {
    let mut settings = config.generator.settings();
    if let Some(profile) = cmd.profile {
        settings.profile = profile.into();
    }
    let count = cmd.count.unwrap_or(config.generator.count);
    let mut generator = match cmd.seed.or(config.generator.seed) {
        Some(seed) => ProjectGenerator::with_seed(settings, seed),
        None => ProjectGenerator::new(settings),
    };

    let projects = generator.generate(count);
    write_dump(&cmd.output, &projects)?;
    println!(
        "Wrote {} projects to {}",
        projects.len(),
        cmd.output.display()
    );
    Ok(())
}

async fn handle_serve(config: &Config, cmd: ServeCommand) -> anyhow::Result<()> {
    let addr = cmd.addr.unwrap_or_else(|| config.server.bind_addr.clone());
    let state = config
        .server_state()
        .with_dump(cmd.dump.or_else(|| config.server.dump_path.clone()));
    serve(&addr, state).await?;
    Ok(())
}

async fn handle_query(config: &Config, cmd: &QueryCommand) -> anyhow::Result<()> {
    let page_size = cmd.page_size.unwrap_or(config.dashboard.page_size);
    let pagination = Pagination::new(cmd.page.saturating_sub(1), page_size)?;
    let mut dashboard = load_dashboard(
        config,
        &cmd.source,
        cmd.filter.as_deref(),
        &cmd.sort,
        pagination,
    )
    .await?;

    let viewport = cmd.select.and_then(|id| dashboard.select(id));

    let rows = dashboard.store().rows();
    let page = dashboard.pagination().slice(&rows);
    let mut out = io::stdout().lock();
    match cmd.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, page)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&mut out, page)?,
        OutputFormat::Table => {
            table::render(
                &mut out,
                &rows,
                dashboard.store().total_count(),
                dashboard.pagination(),
                dashboard.selection(),
            )?;
            if let Some(popup) = dashboard.popup() {
                print_selection(&mut out, &popup, viewport)?;
            } else if let Some(id) = cmd.select {
                writeln!(out)?;
                writeln!(out, "Project {id} is not in the current rows.")?;
            }
        }
    }
    Ok(())
}

fn print_selection(out: &mut impl Write, popup: &Popup, viewport: Option<Viewport>) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{popup}")?;
    if let Some(Viewport::Centered { center, zoom }) = viewport {
        writeln!(
            out,
            "  Map:          centred on {:.6}, {:.6} at zoom {zoom}",
            center.lat, center.lng
        )?;
    }
    Ok(())
}

async fn handle_stats(config: &Config, cmd: &StatsCommand) -> anyhow::Result<()> {
    let dashboard = load_dashboard(
        config,
        &cmd.source,
        cmd.filter.as_deref(),
        &SortArgs::default(),
        Pagination::default(),
    )
    .await?;

    let stats = dashboard.stats();
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{stats}");
        println!();
        println!("{}", dashboard.summary());
    }
    Ok(())
}

async fn handle_export(config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let dashboard = load_dashboard(
        config,
        &cmd.source,
        cmd.filter.as_deref(),
        &cmd.sort,
        Pagination::default(),
    )
    .await?;

    let target = cmd
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_export_file_name()));
    let rows = dashboard.store().rows();
    let path = export_to(&target, &rows)?;
    println!("Exported {} projects to {}", rows.len(), path.display());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let bounds = config.generator.bounds;
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Generator]");
                println!("  Count:         {}", config.generator.count);
                println!(
                    "  Seed:          {}",
                    config
                        .generator
                        .seed
                        .map_or_else(|| "random".to_string(), |s| s.to_string())
                );
                println!("  Profile:       {}", config.generator.profile);
                println!(
                    "  Bounds:        [[{}, {}], [{}, {}]]",
                    bounds.south, bounds.west, bounds.north, bounds.east
                );
                println!("  Window start:  {}", config.generator.window_start);
                println!();
                println!("[Server]");
                println!("  Bind address:  {}", config.server.bind_addr);
                println!(
                    "  Dump:          {}",
                    config
                        .server
                        .dump_path
                        .as_ref()
                        .map_or_else(|| "none".to_string(), |p| p.display().to_string())
                );
                println!();
                println!("[Client]");
                println!("  Endpoint:      {}", config.client.endpoint);
                println!("  Timeout (s):   {}", config.client.timeout_secs);
                println!();
                println!("[Dashboard]");
                println!("  Debounce (ms): {}", config.dashboard.debounce_ms);
                println!("  Page size:     {}", config.dashboard.page_size);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
