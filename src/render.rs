//! Terminal rendering for listing rows and invocation output

use owo_colors::OwoColorize;

use crate::data::{CommandInvocation, CommandSummary, InstanceInfo};

fn field(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Prints one tab-separated listing row for a command.
pub fn print_command_row(command: &CommandSummary) {
    let parameters = serde_json::to_string(&command.parameters)
        .unwrap_or_else(|_| String::from("{}"));
    println!(
        "{}\t{:<10}\t{}\t{}\t{}",
        command.command_id,
        command.status,
        command.requested_date_time.format("%Y-%m-%dT%H:%M:%SZ"),
        command.instance_ids.len(),
        parameters
    );
}

/// Prints the green per-instance header line.
///
/// Instances that are no longer in the inventory (typically terminated
/// since the command ran) are marked instead of shown with empty fields.
pub fn print_instance_header(invocation: &CommandInvocation, info: Option<&InstanceInfo>) {
    let line = match info {
        Some(info) => format!(
            "{}\t{}\t{}\t{}\t{}",
            invocation.instance_id,
            field(info.name.as_deref()),
            field(info.private_ip.as_deref()),
            field(info.public_ip.as_deref()),
            invocation.status
        ),
        None => format!(
            "{}\t--terminated\t{}",
            invocation.instance_id, invocation.status
        ),
    };
    println!("{}", line.green());
}

/// Prints the blue `### <label>` header above a block of output.
pub fn print_source_header(label: &str) {
    println!("{}", format!("### {}", label).blue());
}
