use serde_json::Value;

use velocep_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(envelope),
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) {
    match envelope.data.get("outcome").and_then(Value::as_str) {
        Some("winner") => {
            let address = &envelope.data["address"];
            println!(
                "{} answered first ({}ms)",
                field(address, "source"),
                envelope.meta.latency_ms
            );
            println!("cep         : {}", field(address, "cep"));
            println!("street      : {}", field(address, "street"));
            println!("neighborhood: {}", field(address, "neighborhood"));
            println!("city        : {}", field(address, "city"));
            println!("state       : {}", field(address, "state"));
        }
        Some("timed_out") => {
            println!(
                "timeout: no provider answered within {}ms",
                envelope.data["deadline_ms"]
            );
        }
        _ => {
            println!("all providers failed:");
            for error in &envelope.errors {
                let source = error
                    .source
                    .map(|provider| provider.as_str())
                    .unwrap_or("race");
                println!("  - {source}: {} ({})", error.message, error.code);
            }
        }
    }

    for warning in &envelope.meta.warnings {
        println!("warning: {warning}");
    }
}

fn field<'a>(address: &'a Value, name: &str) -> &'a str {
    address.get(name).and_then(Value::as_str).unwrap_or("")
}
