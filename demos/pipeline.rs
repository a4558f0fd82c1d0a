//! Example: Chaining Operations over Sync and Async Producers
//!
//! A log reader is modelled twice: once as a synchronous producer over lines
//! already in memory, once as an asynchronous producer fed through a channel
//! by a writer task. Both get the same operations.

use pullchain::prelude::*;
use pullchain::{install, Capability, CapabilitySet, InstallConfig, Installer};

// =============================================================================
// Producer
// =============================================================================

/// Yields the lines of a log one at a time
struct LogLines {
    lines: Vec<&'static str>,
    position: usize,
}

impl LogLines {
    fn new(lines: Vec<&'static str>) -> Self {
        Self { lines, position: 0 }
    }
}

impl Producer for LogLines {
    type Item = &'static str;
    type Error = SeqError;

    fn pull(&mut self) -> SeqResult<Option<&'static str>> {
        let line = self.lines.get(self.position).copied();
        if line.is_some() {
            self.position += 1;
        }
        Ok(line)
    }
}

const LOG: [&str; 6] = [
    "INFO start",
    "WARN disk 91%",
    "INFO tick",
    "ERROR disk full",
    "INFO tick",
    "ERROR retry failed",
];

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), SeqError> {
    println!("=== Pullchain Pipeline Example ===\n");

    // Synchronous: the first two errors, numbered.
    let errors = LogLines::new(LOG.to_vec())
        .filter(|line| Ok(line.starts_with("ERROR")))
        .map(|line| Ok(line.trim_start_matches("ERROR ")))
        .take(2)
        .entries()
        .to_vec()?;
    for (i, message) in errors {
        println!("error #{}: {}", i + 1, message);
    }

    let warned = LogLines::new(LOG.to_vec()).some(|line| Ok(line.starts_with("WARN")))?;
    println!("any warnings: {}\n", warned);

    // Asynchronous: the same log arriving through a channel.
    let (feeder, producer) = ChannelBuilder::new().buffer_size(2).build();
    let writer = tokio::spawn(async move {
        for line in LOG {
            if feeder.send(line).await.is_err() {
                break;
            }
        }
    });

    let ticks = producer
        .filter(|line| std::future::ready(Ok(line.ends_with("tick"))))
        .reduce(|count, _| async move { Ok(count + 1) }, 0usize)
        .await?;
    println!("ticks received: {}", ticks);
    let _ = writer.await;

    // Capabilities: a host-defined entry survives installation.
    let mut set = CapabilitySet::new(ProducerKind::Sync);
    if let Err(err) = set.define_native("find", "host find") {
        println!("could not define native find: {}", err);
    }
    let report = install(&mut set);
    println!(
        "\ninstalled {} capabilities, kept {} native",
        report.installed.len(),
        report.retained.len()
    );
    for (name, capability) in set.iter() {
        println!("  {:<16} {}", name, capability.describe());
    }

    let again = Installer::from_config(InstallConfig::new().with_name("demo").verbose())
        .map(|installer| installer.install(&mut set));
    if let Ok(report) = again {
        println!("second install changed nothing: {}", report.is_noop());
    }

    Ok(())
}
