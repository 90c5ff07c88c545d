//! Example: List projects and search a workspace agent
//!
//! Usage:
//!   cargo run --example list_projects -- --machine WS_ID --base http://host:8080/api [--name FILTER]

use std::env;
use std::sync::Arc;

use projectlib::{DevMachine, ProjectServiceClient, QueryExpression, WsAgentBus};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let mut machine_id = None;
    let mut base_url = None;
    let mut name_filter = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--machine" | "-m" => {
                machine_id = args.get(i + 1).cloned();
                i += 2;
            }
            "--base" | "-b" => {
                base_url = args.get(i + 1).cloned();
                i += 2;
            }
            "--name" => {
                name_filter = args.get(i + 1).cloned();
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let machine_id = machine_id.expect("--machine is required");
    let base_url = base_url.expect("--base is required");

    let ws_url = format!("{}/wsagent", base_url.replacen("http", "ws", 1));
    let client = ProjectServiceClient::new(Arc::new(WsAgentBus::new(ws_url)));
    let machine = DevMachine::new(machine_id, base_url);

    match client.get_projects(&machine).await {
        Ok(projects) => {
            for project in &projects {
                println!(
                    "{}  {}  [{}]",
                    project.path,
                    project.name,
                    project.project_type.as_deref().unwrap_or("unknown")
                );
            }
            println!("{} project(s)", projects.len());
        }
        Err(e) => {
            eprintln!("Failed to list projects: {}", e);
            std::process::exit(1);
        }
    }

    if let Some(name) = name_filter {
        let expression = QueryExpression::new().with_name(name).with_max_items(50);
        match client.search(&machine, &expression).await {
            Ok(hits) => {
                for item in hits {
                    println!("{}  ({})", item.path, item.item_type);
                }
            }
            Err(e) => {
                eprintln!("Search failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}
