//! Output formatting for REPL replies and subcommands

use colored::Colorize;
use ghostpoint_client::DeviceInfo;
use ghostpoint_device::DeviceStats;
use ghostpoint_protocol::{DeviceAttributes, MotionMessage, WireCoordinate};

/// Bytes per hex dump row.
const ROW: usize = 16;

/// Hex dump with an offset column.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .chunks(ROW)
        .enumerate()
        .map(|(row, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
            format!("{:04x}  {}", row * ROW, hex.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn motion_line(message: &MotionMessage) -> String {
    format!(
        "{} buttons={:#04x} x={} y={}",
        "report".cyan(),
        message.buttons.bits(),
        message.x.to_i32(),
        message.y.to_i32()
    )
}

pub fn info_line(info: &DeviceInfo) -> String {
    let mode = if info.is_relative() { "relative" } else { "absolute" };
    format!("{mode} motion, queue capacity {}", info.queue_capacity)
}

pub fn attributes_line(attributes: &DeviceAttributes) -> String {
    format!(
        "vendor {:04x} product {:04x} version {:04x}",
        attributes.vendor_id, attributes.product_id, attributes.version
    )
}

pub fn stats_block(stats: &DeviceStats) -> String {
    [
        format!("state          {}", stats.state),
        format!("queue depth    {}", stats.queue_depth),
        format!("interval       {}us", stats.interval_us),
        format!("enqueued       {}", stats.queue.enqueued),
        format!("rejected       {}", stats.queue.rejected),
        format!("dequeued       {}", stats.queue.dequeued),
        format!("clears         {}", stats.queue.clears),
        format!("motion reports {}", stats.motion_reports),
        format!("idle reports   {}", stats.idle_reports),
    ]
    .join("\n")
}

pub fn print_error(error: &dyn std::error::Error) {
    eprintln!("{} {}", "error:".red().bold(), error);
    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "caused by:".yellow(), err);
        source = err.source();
    }
}
