//! Health command

use anyhow::Result;
use boletin_sdk::HealthStatus;
use colored::Colorize;

use super::call_failed;
use crate::context::Context;
use crate::output::{print_field, print_optional_field, TextDisplay};

/// Execute the health command
pub async fn execute(ctx: &Context) -> Result<()> {
    let client = ctx.create_client()?;
    let status = client.health().check().await.map_err(call_failed)?;

    if status.is_healthy() {
        ctx.output.success(&format!("Service at {} is up", client.base_url()));
    } else {
        ctx.output.warning(&format!(
            "Service at {} answered but does not report healthy",
            client.base_url()
        ));
    }
    ctx.output.write(&status)
}

impl TextDisplay for HealthStatus {
    fn display_text(&self) {
        let status = self.status.as_deref().unwrap_or("unknown");
        let badge = if self.is_healthy() {
            status.green().to_string()
        } else {
            status.yellow().to_string()
        };
        print_field("Status", &badge);
        print_optional_field("Message", self.message.as_deref());
        for (key, value) in &self.extra {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            print_field(key, &rendered);
        }
    }
}
