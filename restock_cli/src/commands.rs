//! Command handlers. Results go to stdout; logs go to stderr.

use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, bounded};
use eyre::{Result, WrapErr};
use restock_core::{Monitor, ProductRecord, ReadingKind, Status};
use serde_json::json;

use crate::cli::Commands;

pub fn dispatch(monitor: &Monitor, cmd: Commands, json: bool) -> Result<()> {
    match cmd {
        Commands::Register { name, threshold } => {
            let record = monitor.register_product(&name, threshold)?;
            print_record("registered", &record, json);
        }
        Commands::Threshold { percent } => {
            let record = monitor.update_threshold(percent)?;
            print_record("updated", &record, json);
        }
        Commands::Delete => {
            monitor.delete_product()?;
            if json {
                println!("{}", json!({ "deleted": true }));
            } else {
                println!("Product deleted.");
            }
        }
        Commands::Status { fresh } => {
            if fresh {
                monitor.invalidate_cache();
            }
            let status = monitor.status();
            println!("{}", render_status(&status, json));
        }
        Commands::Watch {
            interval_ms,
            count,
            fresh,
        } => {
            let opts = WatchOpts {
                interval: Duration::from_millis(interval_ms),
                count,
                fresh,
            };
            watch(monitor, &opts, json)?;
        }
        Commands::SelfCheck => self_check(monitor, json)?,
    }
    Ok(())
}

fn print_record(action: &str, record: &ProductRecord, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "action": action,
                "name": record.name(),
                "initial_weight": record.initial_weight(),
                "threshold_percent": record.threshold_percent(),
                "threshold": record.threshold_weight(),
            })
        );
    } else {
        println!(
            "{} {}: {:.2} g, alert below {}% ({:.2} g)",
            capitalize(action),
            record.name(),
            record.initial_weight(),
            record.threshold_percent(),
            record.threshold_weight()
        );
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// One status line, either as text or as the JSON object.
pub fn render_status(status: &Status, json: bool) -> String {
    if json {
        return serde_json::to_string(status).unwrap_or_else(|e| {
            json!({ "reason": "Error", "message": e.to_string() }).to_string()
        });
    }
    let note = match status.reading {
        ReadingKind::Ok => "",
        ReadingKind::NoDevice => " [no sensor]",
        ReadingKind::NoValidReading => " [no valid reading]",
    };
    match &status.name {
        Some(name) => format!(
            "{name}: {:.2} g{note}, threshold {:.2} g, {}",
            status.weight,
            status.threshold_weight,
            if status.alert { "LOW - refill" } else { "ok" }
        ),
        None => format!("no product registered; scale reads {:.2} g{note}", status.weight),
    }
}

struct WatchOpts {
    interval: Duration,
    count: Option<u64>,
    fresh: bool,
}

/// Print status every `interval` until Ctrl-C or `count` lines.
fn watch(monitor: &Monitor, opts: &WatchOpts, json: bool) -> Result<()> {
    let (stop_tx, stop_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = stop_tx.try_send(());
    })
    .wrap_err("install Ctrl-C handler")?;

    let mut printed = 0u64;
    let mut was_low = false;
    loop {
        if opts.fresh {
            monitor.invalidate_cache();
        }
        let status = monitor.status();
        println!("{}", render_status(&status, json));
        if status.alert && !was_low {
            tracing::warn!(
                name = status.name.as_deref().unwrap_or_default(),
                weight = status.weight,
                threshold = status.threshold_weight,
                "product running low"
            );
        }
        was_low = status.alert;
        printed += 1;
        if opts.count.is_some_and(|n| printed >= n) {
            break;
        }
        match stop_rx.recv_timeout(opts.interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                tracing::info!("watch interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn self_check(monitor: &Monitor, json: bool) -> Result<()> {
    if !monitor.has_device() {
        eyre::bail!("sensor not detected");
    }
    let reading = monitor.quick_reading();
    if json {
        println!(
            "{}",
            json!({ "device": true, "reading": reading.kind(), "weight": reading.grams() })
        );
    } else {
        match reading.value() {
            Some(g) => println!("Sensor OK: {g:.2} g"),
            None => println!("Sensor connected, but no valid reading yet"),
        }
    }
    Ok(())
}
