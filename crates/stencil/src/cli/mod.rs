mod prompt;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use stencil_core::scaffold::{scaffold_with_fallback, Capabilities};
use stencil_core::validate::validate_project_name;
use stencil_core::{
    manifest, HttpFetcher, HttpProbe, PackageManager, ProcessRunner, ScaffoldConfig,
    ScaffoldError, ScaffoldReport, ScaffoldRequest,
};

use prompt::TerminalPrompter;

/// Scaffold a new web3 frontend application.
#[derive(Parser)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to create the project in.
    pub project_directory: Option<String>,

    /// Bootstrap the app using npm.
    #[arg(long)]
    pub use_npm: bool,

    /// Bootstrap the app using pnpm.
    #[arg(long)]
    pub use_pnpm: bool,

    /// Path to a scaffolding policy file (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Parse arguments, run the scaffolder, and surface a single exit code.
pub async fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .init();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(code) => code,
        Err(err) => {
            render_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ScaffoldConfig::load(cli.config.as_deref())?;

    let project_arg = match cli
        .project_directory
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        Some(arg) => Some(arg),
        None => prompt::project_path(&config.naming)?,
    };
    let project_arg = match project_arg {
        Some(arg) => arg,
        None => {
            print_usage();
            return Ok(ExitCode::FAILURE);
        }
    };

    let target = absolutize(Path::new(&project_arg))?;
    let app_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(&project_arg)
        .to_string();

    let check = validate_project_name(&app_name, &config.naming);
    if !check.valid {
        return Err(ScaffoldError::NameInvalid {
            name: app_name,
            problems: check.problems,
        }
        .into());
    }

    let package_manager = PackageManager::from_flags(cli.use_npm, cli.use_pnpm);
    let request = ScaffoldRequest {
        target: target.clone(),
        package_manager,
    };

    println!();
    println!(
        "{} Setting up your new dapp in {}.",
        style("⚡").yellow(),
        style(target.display()).green()
    );
    println!();
    println!("{}", style(format!("Using {}.", package_manager)).bold());
    println!();
    println!("Installing dependencies:");
    for dep in manifest::DEPENDENCIES {
        println!("- {}", style(dep).cyan());
    }
    println!();

    let runner = ProcessRunner;
    let fetcher = HttpFetcher::new();
    let probe = HttpProbe::new();
    let caps = Capabilities {
        runner: &runner,
        fetcher: &fetcher,
        probe: &probe,
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Scaffolding project...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let prompter = TerminalPrompter::new(Some(pb.clone()));
    let result = scaffold_with_fallback(&request, &caps, &prompter, &config).await;
    pb.finish_and_clear();

    let report = result?;
    print_success(&report, &project_arg);
    Ok(ExitCode::SUCCESS)
}

fn absolutize(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn print_usage() {
    println!();
    println!("Please specify the project directory:");
    println!(
        "  {} {}",
        style("stencil").cyan(),
        style("<project-directory>").green()
    );
    println!();
    println!("For example:");
    println!("  {} {}", style("stencil").cyan(), style("my-dapp").green());
    println!();
    println!("Run {} to see all options.", style("stencil --help").cyan());
}

fn print_success(report: &ScaffoldReport, project_arg: &str) {
    let pm = report.package_manager;

    if report.git_initialized {
        println!("Initialized a git repository.");
        println!();
    }
    if !report.is_online {
        println!(
            "{}",
            style("The registry was unreachable; dependencies came from the local cache.").yellow()
        );
        println!();
    }

    let cd_path = std::env::current_dir()
        .ok()
        .map(|cwd| cd_hint(&cwd, &report.root, &report.app_name, project_arg))
        .unwrap_or_else(|| report.root.display().to_string());

    println!(
        "{} Created {} at {}",
        style("Success!").green().bold(),
        report.app_name,
        report.root.display()
    );
    println!("Inside that directory, you can run several commands:");
    println!();
    println!("  {}", style(pm.run_command("start")).cyan());
    println!("    Starts the development server.");
    println!();
    println!("  {}", style(pm.run_command("build")).cyan());
    println!("    Builds the app for production.");
    println!();
    println!("We suggest that you begin by typing:");
    println!();
    println!("  {} {}", style("cd").cyan(), cd_path);
    println!("  {}", style(pm.run_command("start")).cyan());
    println!();
}

/// Prefer the short `cd <name>` form when the project landed directly under
/// the invocation directory.
fn cd_hint(cwd: &Path, root: &Path, app_name: &str, project_arg: &str) -> String {
    if cwd.join(app_name) == root {
        app_name.to_string()
    } else {
        project_arg.to_string()
    }
}

fn render_error(err: &anyhow::Error) {
    eprintln!();
    eprintln!("{}", style("Aborting installation.").red().bold());

    match err.downcast_ref::<ScaffoldError>() {
        Some(ScaffoldError::NameInvalid { name, problems }) => {
            eprintln!(
                "Could not create a project called {} because of naming restrictions:",
                style(format!("\"{}\"", name)).red()
            );
            for problem in problems {
                eprintln!("    {} {}", style("*").red().bold(), problem);
            }
        }
        Some(ScaffoldError::DirectoryNotEmpty { dir, conflicts }) => {
            eprintln!(
                "The directory {} contains files that could conflict:",
                style(dir.display()).green()
            );
            for conflict in conflicts {
                eprintln!("  {}", conflict);
            }
            eprintln!();
            eprintln!("Either try using a new directory name, or remove the files listed above.");
        }
        Some(ScaffoldError::PathNotWritable(_)) => {
            eprintln!("The application path is not writable, please check folder permissions and try again.");
            eprintln!("It is likely you do not have write permissions for this folder.");
        }
        Some(ScaffoldError::Install { command, .. }) => {
            eprintln!("  {} has failed.", style(command).cyan());
        }
        Some(ScaffoldError::Download(reason)) => {
            eprintln!("  Could not download the template: {}", reason);
        }
        Some(other) => {
            eprintln!("  {}", other);
        }
        None => {
            eprintln!("{}", style("Unexpected error. Please report it as a bug:").red());
            eprintln!("  {}", err);
        }
    }
    eprintln!();
}
