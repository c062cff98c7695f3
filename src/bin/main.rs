use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use stayrunner::surface::LiveSurface;
use stayrunner::{flow, Outcome};

#[derive(Parser)]
#[command(name = "stayrunner")]
#[command(about = "Config-based hotel booking automation")]
#[command(version)]
struct Cli {
    /// Plan file to run
    plan: PathBuf,

    /// Run in headless mode (overrides plan)
    #[arg(long)]
    headless: bool,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate the plan without running
    #[arg(long)]
    check: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Matched => "matched",
        Outcome::Navigated => "matched after navigation",
        Outcome::FallbackUsed => "substitute used",
        Outcome::NotFound => "NOT FOUND",
    }
}

#[tokio::main]
async fn main() -> stayrunner::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let params = stayrunner::Params::from_args(&cli.params)?;
    let mut plan = stayrunner::Plan::load_with_params(&cli.plan, &params)?;

    if cli.check {
        println!("Plan valid: {}", plan.name);
        println!("  Site: {}", plan.site.url);
        println!(
            "  Stay: {} -> {} in {}",
            plan.search.check_in, plan.search.check_out, plan.search.destination
        );
        println!(
            "  Guests: {} adult(s), {} child(ren), {} room(s)",
            plan.search.guests.adults, plan.search.guests.children, plan.search.guests.rooms
        );
        if !plan.params.is_empty() {
            println!("  Parameters: {}", plan.params.len());
            for (name, def) in &plan.params {
                let req = if def.required { " (required)" } else { "" };
                let desc = def.description.as_deref().unwrap_or("");
                println!("    - {}{}: {}", name, req, desc);
            }
        }
        return Ok(());
    }

    if cli.headless {
        plan.browser.headless = true;
    }

    println!("Running: {}", plan.name);

    let stealth = eoka::StealthConfig {
        headless: plan.browser.headless,
        proxy: plan.browser.proxy.clone(),
        user_agent: plan.browser.user_agent.clone(),
        viewport_width: plan.browser.viewport.map(|v| v.width).unwrap_or(1280),
        viewport_height: plan.browser.viewport.map(|v| v.height).unwrap_or(720),
        ..Default::default()
    };
    let browser = eoka::Browser::launch_with_config(stealth).await?;
    let page = browser.new_page(&plan.site.url).await?;

    let surface = LiveSurface::new(&page, plan.selectors.clone());
    let report = flow::run_search(&surface, &plan).await;

    println!();
    if report.success {
        println!("✓ Success");
    } else {
        println!("✗ Incomplete");
    }
    println!("  Check-in:  {}", outcome_label(report.check_in));
    println!("  Check-out: {}", outcome_label(report.check_out));
    println!(
        "  Guests: {} adult(s), {} child(ren), {} room(s)",
        report.adults, report.children, report.rooms
    );
    println!("  Submitted: {}", report.submitted);
    println!("  Results loaded: {}", report.results_loaded);
    println!("  Duration: {}ms", report.duration_ms);
    for issue in &report.issues {
        println!("  ! {}", issue);
    }

    browser.close().await?;

    if !report.success {
        std::process::exit(1);
    }

    Ok(())
}
