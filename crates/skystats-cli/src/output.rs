use std::io::{self, Write};

use skystats_core::Report;

const SEPARATOR: &str =
    "==============================================================================";

pub fn print_report(report: &Report) -> io::Result<()> {
    write_report(&mut io::stdout().lock(), report)
}

pub fn write_report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    writeln!(out, "{SEPARATOR}")?;
    for node in &report.found {
        writeln!(out, "{} : {}", node.key, node.record)?;
    }
    writeln!(
        out,
        "Nodes found {}/{} ({:.1}%)",
        report.total_online, report.total_nodes, report.found_percent
    )?;
    writeln!(out, "Average uptime this month: {:.2}", report.average_uptime)?;
    writeln!(out, "Highest uptime in data feed: {}", report.highest_uptime)?;
    writeln!(out, "{SEPARATOR}")?;

    if !report.missing.is_empty() {
        writeln!(out, "The following nodes were missing from the data feed:")?;
        write_missing(out, report)?;
    }
    Ok(())
}

pub fn print_missing(report: &Report) -> io::Result<()> {
    write_missing(&mut io::stdout().lock(), report)
}

fn write_missing<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    for id in &report.missing {
        writeln!(out, "{id}")?;
    }
    Ok(())
}

pub fn print_highest(highest: f64) {
    println!("{highest}");
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
