use anyhow::{Context, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wikitree::handlers::{self, ServiceOptions, spinner_progress};
use wikitree::server::{self, AppState};
use wikitree_core::{print_banner, tree};

mod commands;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("serve", primary_command)) => handle_serve(primary_command).await,
        Some(("crawl", primary_command)) => handle_crawl(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn service_options(args: &ArgMatches) -> anyhow::Result<ServiceOptions> {
    let cache_dir = args
        .get_one::<String>("cache-dir")
        .ok_or_else(|| anyhow!("--cache-dir is required"))?;
    let base_url = args
        .get_one::<String>("base-url")
        .ok_or_else(|| anyhow!("--base-url is required"))?;
    let timeout_secs = *args
        .get_one::<u64>("timeout")
        .ok_or_else(|| anyhow!("--timeout is required"))?;

    Ok(ServiceOptions {
        base_url: base_url.clone(),
        cache_dir: handlers::expand_cache_dir(cache_dir),
        timeout_secs,
    })
}

fn page_ceiling(args: &ArgMatches) -> usize {
    args.get_one::<usize>("max-pages")
        .copied()
        .unwrap_or(handlers::DEFAULT_PAGE_CEILING)
}

async fn handle_serve(args: &ArgMatches) -> anyhow::Result<()> {
    init_tracing("info");

    let options = service_options(args)?;
    let bind = handlers::resolve_bind(
        args.get_one::<String>("bind").map(String::as_str),
        std::env::var("PORT").ok(),
    );

    println!(
        "{} Serving trees from {} (cache: {})",
        "→".blue(),
        options.base_url.bright_white(),
        options.cache_dir.display().to_string().bright_white()
    );

    let state = AppState {
        service: Arc::new(handlers::build_service(&options, None)?),
        page_ceiling: page_ceiling(args),
    };
    server::serve(&bind, state)
        .await
        .with_context(|| format!("Server on {} stopped", bind))
}

async fn handle_crawl(args: &ArgMatches) -> anyhow::Result<()> {
    init_tracing("warn");

    let topic = handlers::parse_topic(args.get_one::<String>("TOPIC").map(String::as_str))?;
    let pages = handlers::parse_pages(
        args.get_one::<String>("pages").map(String::as_str),
        page_ceiling(args),
    )?;
    let as_json = args.get_flag("json");
    let no_cache = args.get_flag("no-cache");
    let options = service_options(args)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    let label = format!("Crawling {} ({} pages)", topic, pages);
    spinner.set_message(label.clone());
    let progress = Some(spinner_progress(spinner.clone(), label));

    let (json, stats) = if no_cache {
        let fresh = handlers::fresh_tree(&options, progress, &topic, pages).await;
        spinner.finish_and_clear();
        let (json, stats) = fresh?;
        (json, Some(stats))
    } else {
        let service = handlers::build_service(&options, progress)?;
        let response = service.tree_json(&topic, pages).await;
        spinner.finish_and_clear();
        let response = response?;
        if response.from_cache {
            println!("{} Served from cache", "✓".green().bold());
        }
        (response.json, response.stats)
    };

    if as_json {
        println!("{}", String::from_utf8_lossy(&json));
        return Ok(());
    }

    let root = tree::decode(&json)?;
    println!();
    print!("{}", wikitree::render_tree(&root));
    if let Some(stats) = stats {
        println!();
        print!("{}", wikitree::render_summary(&stats));
    }
    Ok(())
}
