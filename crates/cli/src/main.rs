//! `tekqa`: run the end-to-end UI suites from the command line.
//!
//! Run with: `TEKQA_LIVE=1 tekqa run --tag smoke`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use tracing_subscriber::EnvFilter;

use tekqa_common::SuiteConfig;
use tekqa_harness::audit;
use tekqa_harness::browser::{BrowserConfig, BrowserKind, ScreenshotRequest, Session};
use tekqa_harness::pages::{InventoryPage, ShopLoginPage};
use tekqa_harness::runner::{filter_registrations, CaseStatus, Runner, RunnerConfig, SuiteResult};
use tekqa_harness::suites;
use tekqa_harness::visual::{VisualConfig, VisualTester};

#[derive(Parser, Debug)]
#[command(name = "tekqa")]
#[command(about = "End-to-end UI test runner", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run scenarios (all of them, or filtered by tag/name)
    Run(RunArgs),
    /// List registrations without running anything
    List {
        /// Only registrations carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Promote all candidate screenshots to baselines
    UpdateBaselines(VisualArgs),
    /// Log into the shop, walk its main pages, and export the test-id
    /// inventory as CSV plus full-page screenshots
    DumpLocators(DumpArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Run only scenarios carrying this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only the scenario with this exact name
    #[arg(short, long)]
    name: Option<String>,

    /// Browser engine (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium")]
    browser: BrowserKind,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    viewport_height: u32,

    /// Whole-scenario re-executions after a failure
    #[arg(long, default_value = "0")]
    retries: u32,

    /// Allowed visual diff ratio (0.0–1.0)
    #[arg(long, default_value = "0.02")]
    visual_threshold: f64,

    /// Promote candidate screenshots to baselines after the run
    #[arg(long)]
    update_baselines: bool,

    /// Output directory for reports and screenshots
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct VisualArgs {
    /// Output directory holding screenshots and baselines
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Browser engine (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium")]
    browser: BrowserKind,

    /// Output directory for the CSV and screenshots
    #[arg(short, long, default_value = "artifacts")]
    output: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    match rt.block_on(execute(cli)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Command::Run(args) => run(args).await,
        Command::List { tag } => list(tag.as_deref()),
        Command::UpdateBaselines(args) => update_baselines(args),
        Command::DumpLocators(args) => dump_locators(args).await,
    }
}

fn visual_config(output: &std::path::Path, max_diff_ratio: f64) -> VisualConfig {
    VisualConfig {
        baseline_dir: output.join("baselines"),
        actual_dir: output.join("screenshots"),
        diff_dir: output.join("diffs"),
        max_diff_ratio,
        ..Default::default()
    }
}

async fn run(args: RunArgs) -> anyhow::Result<bool> {
    let suite_config = SuiteConfig::resolve();
    let regs = suites::all(&suite_config)?;
    let regs = filter_registrations(regs, args.tag.as_deref(), args.name.as_deref());

    if regs.is_empty() {
        println!("no scenarios match the given filters");
        return Ok(true);
    }

    let visual = visual_config(&args.output, args.visual_threshold);
    let runner_config = RunnerConfig {
        browser: BrowserConfig {
            kind: args.browser,
            headless: !args.headed,
            viewport_width: args.viewport_width,
            viewport_height: args.viewport_height,
            ..Default::default()
        },
        visual: visual.clone(),
        output_dir: args.output.clone(),
        retries: args.retries,
    };

    let runner = Runner::new(suite_config, runner_config);
    let result = runner.run_suite(&regs).await;

    print_summary(&result);
    runner.write_report(&result)?;

    if args.update_baselines {
        let updated = VisualTester::new(visual)?.update_all_baselines()?;
        for name in updated {
            println!("baseline updated: {name}");
        }
    }

    Ok(result.failed == 0)
}

fn print_summary(result: &SuiteResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Scenario", "Status", "Duration", "Notes"]);

    for case in &result.cases {
        let status = match case.status {
            CaseStatus::Passed => "passed".green().to_string(),
            CaseStatus::Failed => "failed".red().to_string(),
            CaseStatus::Skipped => "skipped".yellow().to_string(),
        };
        let notes = match case.status {
            CaseStatus::Passed => {
                let mut parts = Vec::new();
                if !case.soft_mismatches.is_empty() {
                    parts.push(format!("{} soft mismatch(es)", case.soft_mismatches.len()));
                }
                if !case.soft_skips.is_empty() {
                    parts.push(format!("{} soft skip(s)", case.soft_skips.len()));
                }
                parts.join(", ")
            }
            CaseStatus::Failed => case.error.clone().unwrap_or_default(),
            CaseStatus::Skipped => case.skip_reason.clone().unwrap_or_default(),
        };
        table.add_row(vec![
            case.name.clone(),
            status,
            format!("{} ms", case.duration_ms),
            notes,
        ]);
    }

    println!("{table}");
    println!(
        "{}: {} passed, {} failed, {} skipped ({} ms)",
        "totals".bold(),
        result.passed.to_string().green(),
        result.failed.to_string().red(),
        result.skipped.to_string().yellow(),
        result.duration_ms
    );
}

fn list(tag: Option<&str>) -> anyhow::Result<bool> {
    let suite_config = SuiteConfig::resolve();
    let regs = suites::all(&suite_config)?;
    let regs = filter_registrations(regs, tag, None);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Scenario", "Tags", "Ready"]);

    for reg in &regs {
        let ready = match reg.requirement.unmet_reason(&suite_config) {
            None => "yes".green().to_string(),
            Some(reason) => format!("{} ({reason})", "skip".yellow()),
        };
        table.add_row(vec![reg.name.clone(), reg.tags.join(", "), ready]);
    }

    println!("{table}");
    println!("{} scenario(s)", regs.len());
    Ok(true)
}

fn update_baselines(args: VisualArgs) -> anyhow::Result<bool> {
    let tester = VisualTester::new(visual_config(&args.output, 0.02))?;
    let updated = tester.update_all_baselines()?;
    if updated.is_empty() {
        println!("no candidate screenshots to promote");
    }
    for name in updated {
        println!("baseline updated: {name}");
    }
    Ok(true)
}

async fn dump_locators(args: DumpArgs) -> anyhow::Result<bool> {
    let suite_config = SuiteConfig::resolve();
    let shots_dir = args.output.join("screenshots");
    std::fs::create_dir_all(&shots_dir)?;

    let session = Session::launch(BrowserConfig {
        kind: args.browser,
        ..Default::default()
    })
    .await?;

    let mut records = Vec::new();

    let login_page = ShopLoginPage::new(&session, &suite_config.shop.base_url);
    login_page.goto().await?;
    records.extend(audit::collect(&session, "Login Page").await?);
    full_page_shot(&session, &shots_dir, "login").await?;

    let creds = &suite_config.shop.credentials;
    login_page.login(&creds.username, &creds.password).await?;
    records.extend(audit::collect(&session, "Inventory Page").await?);
    full_page_shot(&session, &shots_dir, "inventory").await?;

    InventoryPage::new(&session).open_cart().await?;
    records.extend(audit::collect(&session, "Cart Page").await?);
    full_page_shot(&session, &shots_dir, "cart").await?;

    session.close().await?;

    let csv_path = args.output.join("test-locators.csv");
    audit::write_csv(&records, &csv_path)?;
    println!(
        "exported {} locator(s) to {}",
        records.len(),
        csv_path.display()
    );
    println!("screenshots saved to {}", shots_dir.display());
    Ok(true)
}

async fn full_page_shot(
    session: &Session,
    dir: &std::path::Path,
    name: &str,
) -> anyhow::Result<()> {
    session
        .screenshot(&ScreenshotRequest {
            path: dir.join(format!("{name}.png")).to_string_lossy().into_owned(),
            full_page: true,
            ..Default::default()
        })
        .await?;
    Ok(())
}
