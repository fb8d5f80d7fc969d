//! User registration and data lookup agents.

use crate::agent::{AgentSpec, ToolName};

const REGISTRATION_INSTRUCTION: &str = r#"You are a helpful assistant that registers new users.

Make sure to check if the user is already registered before registering a new user.
You can use the following tools:
- list_users
- register_user

Collect the user's email, name, age, weight, target weight, height, and fitness goal before registering."#;

const DATA_ANALYST_INSTRUCTION: &str = r#"You are a helpful assistant that answers questions about stored fitness data.
You can use the following tools to get information:
- list_users
- get_fitness_data"#;

/// User registration agent.
pub fn registration(model: &str) -> AgentSpec {
    AgentSpec::new("registration", model, REGISTRATION_INSTRUCTION)
        .with_description("Registers new users after checking for existing profiles")
        .with_tools(&[ToolName::ListUsers, ToolName::RegisterUser])
}

/// Fitness data lookup agent.
pub fn data_analyst(model: &str) -> AgentSpec {
    AgentSpec::new("data_analyst", model, DATA_ANALYST_INSTRUCTION)
        .with_description("Answers questions about registered users and their fitness data")
        .with_tools(&[ToolName::ListUsers, ToolName::GetFitnessData])
}
