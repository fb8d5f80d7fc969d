//! Ask command implementation.

use crate::agents::wellness_registry;
use crate::cli::Output;
use crate::config::Settings;
use crate::inference::OpenAiChatModel;
use crate::server::build_runner;
use anyhow::Result;
use std::sync::Arc;

/// Send one message through an agent and print the final response.
pub async fn run_ask(message: &str, agent: Option<String>, settings: Settings) -> Result<()> {
    let registry = Arc::new(wellness_registry(&settings));
    let agent = agent.unwrap_or_else(|| registry.root().name.clone());

    let model = Arc::new(OpenAiChatModel::with_api_base(
        settings.model.api_base.as_deref(),
    ));
    let (runner, sessions) = build_runner(&settings, registry, model);

    let session = sessions
        .create(&settings.server.app_name, "cli_user")
        .await?;

    let spinner = Output::spinner("Agent working...");

    match runner.run_agent(&agent, session.id, message).await {
        Ok(events) => {
            spinner.finish_and_clear();

            let answer = events
                .iter()
                .find(|event| event.final_response && !event.content.is_empty())
                .map(|event| event.content.clone());

            match answer {
                Some(answer) => println!("\n{}\n", answer),
                None => Output::warning("The agent did not produce a final response."),
            }

            let steps: Vec<_> = events.iter().filter(|e| !e.final_response).collect();
            if !steps.is_empty() {
                Output::header(&format!("Steps ({})", steps.len()));
                for step in steps {
                    Output::info(&format!(
                        "  [{}] {}",
                        step.author,
                        crate::cli::output::content_preview(&step.content, 80)
                    ));
                }
                println!();
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
