use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use weekstay::command::{parse_command, Command};
use weekstay::config::ScheduleConfig;
use weekstay::engine::{resolve_prices, ChannelObserver, SelectionController};
use weekstay::listings::load_listings;
use weekstay::model::*;
use weekstay::session::SessionManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the JSON event stream; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let metrics_port: Option<u16> = std::env::var("WEEKSTAY_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    weekstay::observability::init(metrics_port)?;
    weekstay::observability::describe();

    let config = ScheduleConfig::from_env()?;
    let listings = match std::env::var("WEEKSTAY_LISTINGS").ok() {
        Some(path) => load_listings(&PathBuf::from(path))?,
        None => Vec::new(),
    };
    let listings = Arc::new(listings);

    info!("weekstay driver ready");
    info!("  nights: {}..={}", config.min_nights, config.max_nights);
    info!("  contiguous: {}", config.require_contiguous);
    info!("  debounce: {}ms", config.debounce_ms);
    info!("  listings: {}", listings.len());
    info!("  metrics: {}", metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    let sessions = SessionManager::new(config);
    let (observer, mut events) = ChannelObserver::new();
    let session_id = sessions.open(Arc::new(observer))?;
    let controller = sessions.get(&session_id)?;

    // Events can arrive after the last command (deferred validation), so they
    // are printed from their own task rather than after each command.
    let printer_listings = listings.clone();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(&event, &printer_listings);
        }
    });

    print_status(&controller);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => execute(&controller, &listings, cmd),
                    Err(e) => warn!("{e}"),
                }
            }
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }
    }

    sessions.close(&session_id)?;
    // Dropping the last controller handle drops the observer and closes the channel.
    drop(controller);
    drop(sessions);
    printer.await?;

    info!("weekstay stopped");
    Ok(())
}

fn execute(controller: &SelectionController, listings: &[Listing], cmd: Command) {
    match cmd {
        Command::PointerDown { day } => controller.pointer_down(day),
        Command::PointerEnter { day } => controller.pointer_enter(day),
        Command::PointerUp => controller.pointer_up(),
        Command::Reset => controller.reset(),
        Command::Restore { days } => controller.restore(&days),
        Command::Validate => {
            println!("{}", json!({ "event": "validation", "result": controller.validate() }));
        }
        Command::Price { selected_day_count } => {
            println!(
                "{}",
                json!({
                    "event": "prices",
                    "selected_day_count": selected_day_count,
                    "prices": resolve_prices(listings, selected_day_count),
                })
            );
        }
        Command::Status => print_status(controller),
        Command::Quit => {}
    }
}

fn print_event(event: &ControllerEvent, listings: &[Listing]) {
    let line = match event {
        ControllerEvent::SelectionChange { days } => {
            let selection = Selection::from_days(days.iter().copied());
            json!({
                "event": "selection_change",
                "days": days,
                "nights": selection.night_count(),
                "summary": selection.summary(),
                "prices": resolve_prices(listings, selection.len()),
            })
        }
        ControllerEvent::Error { .. } => json!(event),
    };
    println!("{line}");
}

fn print_status(controller: &SelectionController) {
    let selection = controller.snapshot();
    println!(
        "{}",
        json!({
            "event": "status",
            "days": selection.days(),
            "summary": selection.summary(),
            "state": format!("{:?}", controller.state()),
            "pending_validation": controller.has_pending_validation(),
            "validation": controller.validate(),
        })
    );
}
