use crate::config::Config;
use crate::error::{Result, SktError};
use crate::git::clone::{cloner_for, Cloner};
use crate::github::client::GitHubClient;
use crate::license::HttpLicenseGate;
use crate::materialize::{materialize, MaterializationPlan};
use crate::orchestrator::{InitOptions, InitReport, Orchestrator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const BANNER: &str = r"
   _____ _  _______
  / ____| |/ /_   _|
 | (___ | ' /  | |
  \___ \|  <   | |
  ____) | . \ _| |_
 |_____/|_|\_\_____|
";

pub fn banner() -> ExitCode {
    println!("{BANNER}");
    println!("Welcome to SaaSKit CLI!");
    println!("Type 'skt init --name <name> --key <your-key> --path <dir>' to get started");
    ExitCode::SUCCESS
}

pub fn print() -> ExitCode {
    println!("Hello from SaaSKit CLI! 👋");
    ExitCode::SUCCESS
}

pub fn help() -> ExitCode {
    println!("🤖 Bot Help:");
    println!("1. Use 'skt print' to print a hello message");
    println!("2. Use 'skt help' to see this help message");
    println!("3. Use 'skt init' to initialize a new project");
    println!("4. Use 'skt clone' to clone a repository");
    println!("\nFor more detailed information, visit our documentation.");
    ExitCode::SUCCESS
}

pub fn clone(config: &Config, repo: Option<String>, path: Option<String>) -> ExitCode {
    let cloner = cloner_for(config.clone_backend);
    match clone_single(cloner.as_ref(), repo.as_deref(), path.as_deref()) {
        Ok(dest) => {
            println!("✅ Repository cloned successfully!");
            print_next_steps(&[
                format!("cd {}", dest.display()),
                "Follow the repository's setup instructions".to_string(),
            ]);
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn clone_single(cloner: &dyn Cloner, repo: Option<&str>, path: Option<&str>) -> Result<PathBuf> {
    let repo = repo.map(str::trim).unwrap_or_default();
    let path = path.map(str::trim).unwrap_or_default();
    let mut missing = Vec::new();
    if repo.is_empty() {
        missing.push("--repo");
    }
    if path.is_empty() {
        missing.push("--path");
    }
    if !missing.is_empty() {
        return Err(SktError::Config(format!(
            "missing required flags: {}",
            missing.join(", ")
        )));
    }

    let dest = absolute(Path::new(path))?;
    std::fs::create_dir_all(&dest)?;
    println!("📁 Created directory: {}", dest.display());

    let mut plan = MaterializationPlan::new();
    plan.push(repo, dest.clone());
    materialize(&plan, cloner)?;
    Ok(dest)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

pub async fn init(config: &Config, options: InitOptions) -> ExitCode {
    match run_init(config, &options).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

/// Checks flags and credentials before any client is built, so a bad invocation
/// never touches the network.
async fn run_init(
    config: &Config,
    options: &InitOptions,
) -> std::result::Result<InitReport, Box<dyn std::error::Error>> {
    options.validate()?;
    let github_token = config.require_github_token()?;
    let license_token = config.require_license_token()?;

    let license = HttpLicenseGate::new(
        &config.license_endpoint,
        license_token,
        config.license_timeout(),
    )?;
    let hosting = GitHubClient::new(github_token, config.github_api_url.as_deref())?;
    let cloner = cloner_for(config.clone_backend);

    let orchestrator = Orchestrator::new(&license, &hosting, cloner.as_ref(), config);
    Ok(orchestrator.run(options).await?)
}

fn print_report(report: &InitReport) {
    println!("📂 Project directory: {}", report.project_dir.display());
    for repo in &report.repositories {
        println!("   {} → {}/{}", repo.url, report.project_dir.display(), repo.directory);
    }
    print_next_steps(&report.next_steps);
}

fn print_next_steps(steps: &[String]) {
    println!("📝 Next steps:");
    for (i, step) in steps.iter().enumerate() {
        println!("{}. {step}", i + 1);
    }
}

fn report_error(err: &SktError) {
    eprintln!("❌ {err}");
}
