//! AutoFlow - Entry Point
//!
//! Command-line driver for the automation builder: list the workspace,
//! generate steps from a prompt, or chat with an automation in the simulator.

use std::collections::HashMap;
use std::env;

use autoflow::app::options::AppOptions;
use autoflow::app::run::{open_studio, run_simulation, QUIT_COMMAND, RESET_COMMAND};
use autoflow::app::studio::Studio;
use autoflow::logs::init_logging;
use autoflow::storage::layout::StorageLayout;
use autoflow::utils::version_info;

use colored::Colorize;
use tokio::io::BufReader;
use tracing::error;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}", e),
        }
        return;
    }

    let layout = match cli_args.get("home") {
        Some(home) => StorageLayout::new(home),
        None => StorageLayout::default(),
    };
    let options = AppOptions::load(layout).await;

    if let Err(e) = init_logging(options.log_options()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let mut studio = open_studio(&options).await;

    if let Some(prompt) = cli_args.get("generate").cloned() {
        let Some((client_id, automation_id)) = target(&studio, &cli_args) else {
            return;
        };
        match studio.generate_steps(&client_id, &automation_id, &prompt).await {
            Ok(0) => println!("No steps were generated."),
            Ok(count) => println!("Added {} steps to {}.", count, automation_id),
            Err(e) => error!("Generation failed: {}", e),
        }
        return;
    }

    if cli_args.contains_key("simulate") {
        let Some((client_id, automation_id)) = target(&studio, &cli_args) else {
            return;
        };
        let mut session = match studio.open_simulation(&client_id, &automation_id) {
            Ok(session) => session,
            Err(e) => {
                error!("Unable to open simulation: {}", e);
                return;
            }
        };
        println!(
            "{}",
            format!("Type {} to restart, {} to leave.", RESET_COMMAND, QUIT_COMMAND).dimmed()
        );
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        if let Err(e) = run_simulation(&mut session, stdin, &mut stdout).await {
            error!("Simulation stopped: {}", e);
        }
        return;
    }

    print_workspace(&studio);
}

/// Client and automation ids from `--client` / `--automation`, defaulting to
/// the first of each
fn target(studio: &Studio, cli_args: &HashMap<String, String>) -> Option<(String, String)> {
    let workspace = studio.workspace();
    let client = match cli_args.get("client") {
        Some(id) => workspace.client(id).ok(),
        None => workspace.clients.first(),
    };
    let Some(client) = client else {
        eprintln!("Unknown client. Run without flags to list the workspace.");
        return None;
    };

    let automation = match cli_args.get("automation") {
        Some(id) => client.automation(id),
        None => client.automations.first(),
    };
    let Some(automation) = automation else {
        eprintln!("Unknown automation for client {}.", client.id);
        return None;
    };

    Some((client.id.clone(), automation.id.clone()))
}

fn print_workspace(studio: &Studio) {
    for client in &studio.workspace().clients {
        println!("{} {}", client.name.bold(), format!("({})", client.id).dimmed());
        for server in &client.tool_servers {
            println!("  tool server {} {} [{:?}]", server.name, server.url, server.status);
        }
        for automation in &client.automations {
            let status = if automation.is_active {
                "active".green()
            } else {
                "inactive".yellow()
            };
            println!(
                "  {} {} {} - {} steps",
                automation.name.cyan(),
                format!("({})", automation.id).dimmed(),
                status,
                automation.steps.len()
            );
            for step in automation.chain() {
                println!("    -> {} {}", step.step_type.as_str().dimmed(), step.title);
            }
        }
    }
}
