//! Agents command implementation.

use crate::agents::wellness_registry;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// List the configured agents.
pub fn run_agents(settings: Settings) -> Result<()> {
    let registry = wellness_registry(&settings);

    Output::header(&format!(
        "Configured agents ({}, root: {})",
        registry.len(),
        registry.root().name
    ));

    for name in registry.names() {
        // names() only returns registered agents
        let spec = registry.get(&name).unwrap();
        Output::agent_info(
            &spec.name,
            &spec.description,
            spec.tools.len(),
            spec.sub_agents.len(),
        );
    }

    println!();
    Ok(())
}
