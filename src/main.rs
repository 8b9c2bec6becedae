//! Command-line front end: gathers the run parameters, runs to quiescence and
//! prints progress and the final per-instance summary.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context};
use crossbeam_channel::Receiver;

use dungeon_queue::builders::RunBuilder;
use dungeon_queue::config::{DurationRange, RunConfig};
use dungeon_queue::core::{AppResult, ChannelReportSink, RunEvent, StateSnapshot, Supply};
use dungeon_queue::runtime::TokioSpawner;
use dungeon_queue::util::init_tracing;

const RULE: &str = "----------------------------------------";

fn main() -> AppResult<()> {
    init_tracing();

    let config = load_config()?;
    let spawner = TokioSpawner::with_worker_threads(config.effective_worker_threads())
        .context("failed to start async runtime")?;

    let (sink, events) = ChannelReportSink::new();
    let printer = thread::Builder::new()
        .name("lfg-printer".into())
        .spawn(move || print_events(&events))
        .context("failed to spawn printer thread")?;

    let coordinator = RunBuilder::new(config)
        .with_sink(Arc::new(sink))
        .build(spawner)?;
    let result = coordinator.run();

    // Every sender is gone once the coordinator is dropped, which ends the printer.
    printer
        .join()
        .map_err(|_| anyhow!("printer thread panicked"))?;
    result?;
    Ok(())
}

fn load_config() -> AppResult<RunConfig> {
    if let Some(path) = std::env::args().nth(1) {
        let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        return RunConfig::from_json_str(&raw).map_err(|e| anyhow!("{path}: {e}"));
    }
    if std::env::var_os("LFG_INSTANCES").is_some() {
        return RunConfig::from_env().map_err(|e| anyhow!(e));
    }
    prompt_config()
}

fn prompt_config() -> AppResult<RunConfig> {
    println!("--- LFG Dungeon Queue Simulator ---");
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let instances = prompt(&mut input, "Enter max number of concurrent instances (n): ")?;
    let tanks = prompt(&mut input, "Enter number of tanks in queue (t): ")?;
    let healers = prompt(&mut input, "Enter number of healers in queue (h): ")?;
    let dps = prompt(&mut input, "Enter number of DPS in queue (d): ")?;
    let min = prompt(&mut input, "Enter minimum dungeon time in seconds (t1): ")?;
    let max = prompt(&mut input, "Enter maximum dungeon time in seconds (t2): ")?;

    let config = RunConfig::new(
        instances,
        Supply::new(tanks, healers, dps),
        DurationRange::new(min, max),
    )
    .normalized();
    config.validate().map_err(|e| anyhow!(e))?;
    Ok(config)
}

fn prompt<T>(input: &mut impl BufRead, label: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(anyhow!("unexpected end of input"));
    }
    line.trim()
        .parse()
        .with_context(|| format!("invalid value {:?}", line.trim()))
}

fn print_events(events: &Receiver<RunEvent>) {
    for event in events {
        match event {
            RunEvent::Started(snapshot) => {
                println!("{RULE}");
                println!("Initial Queue: {}", snapshot.supply);
                println!("Initial Instance Status:");
                print_status(&snapshot);
                println!("{RULE}");
            }
            RunEvent::GroupFormed { instance, snapshot } => {
                println!();
                println!(
                    "Party formed! Assigning to Instance {instance}. Remaining Queue: {}",
                    snapshot.supply
                );
                print_status(&snapshot);
                println!("{RULE}");
            }
            RunEvent::GroupCompleted {
                instance,
                duration,
                snapshot,
            } => {
                println!();
                println!(
                    "Instance {instance} is now free after {duration}s. {} parties still active.",
                    snapshot.active_groups
                );
                print_status(&snapshot);
                println!("{RULE}");
            }
            RunEvent::Finished(summary) => {
                println!();
                println!("{RULE}");
                println!("Simulation finished. No more parties can be formed.");
                println!();
                println!("--- Final Instance Summary ---");
                for inst in &summary.instances {
                    println!(
                        "Instance {}: Served {} parties. Total time active: {}s.",
                        inst.id, inst.groups_served, inst.total_busy_time
                    );
                }
                println!("Remaining players in queue: {}", summary.remaining);
            }
        }
    }
}

fn print_status(snapshot: &StateSnapshot) {
    for inst in &snapshot.instances {
        println!("Instance {}: {}", inst.id, inst.state);
    }
}
