//! Agent specifications and the capability registry.

use crate::error::{Result, TrenaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tools that can be bound to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GenerateWorkoutVideo,
    GenerateProgressImage,
    GenerateDietImage,
    GetFitnessData,
    ListUsers,
    RegisterUser,
}

impl ToolName {
    /// Wire name of the tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GenerateWorkoutVideo => "generate_workout_video",
            ToolName::GenerateProgressImage => "generate_progress_image",
            ToolName::GenerateDietImage => "generate_diet_image",
            ToolName::GetFitnessData => "get_fitness_data",
            ToolName::ListUsers => "list_users",
            ToolName::RegisterUser => "register_user",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative specification of one agent.
///
/// Immutable once constructed; composition forms a tree rooted at the
/// registry's root agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Agent name, unique within a registry.
    pub name: String,
    /// Model identifier the agent runs on.
    pub model: String,
    /// One-line description, surfaced in discovery and listings.
    pub description: String,
    /// Natural-language instruction governing the agent's behavior.
    pub instruction: String,
    /// Tools the agent may invoke.
    pub tools: Vec<ToolName>,
    /// Names of child agents the model may delegate to.
    pub sub_agents: Vec<String>,
}

impl AgentSpec {
    /// Create a new agent spec with no tools or children.
    pub fn new(name: &str, model: &str, instruction: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            description: String::new(),
            instruction: instruction.to_string(),
            tools: Vec::new(),
            sub_agents: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Bind tools to the agent.
    pub fn with_tools(mut self, tools: &[ToolName]) -> Self {
        self.tools = tools.to_vec();
        self
    }

    /// Declare child agents the model may delegate to.
    pub fn with_sub_agents(mut self, sub_agents: &[&str]) -> Self {
        self.sub_agents = sub_agents.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Explicit capability registry: agent name to spec.
///
/// The registry never routes; it only resolves names the model has already
/// chosen.
pub struct AgentRegistry {
    agents: HashMap<String, AgentSpec>,
    root: String,
}

impl AgentRegistry {
    /// Build a registry from specs, rooted at the named agent.
    ///
    /// Fails when the root or any declared child is missing, or when a name
    /// is registered twice.
    pub fn new(root: &str, specs: Vec<AgentSpec>) -> Result<Self> {
        let mut agents = HashMap::new();
        for spec in specs {
            if agents.contains_key(&spec.name) {
                return Err(TrenaError::Agent(format!(
                    "Duplicate agent name: {}",
                    spec.name
                )));
            }
            agents.insert(spec.name.clone(), spec);
        }

        if !agents.contains_key(root) {
            return Err(TrenaError::UnknownAgent(root.to_string()));
        }

        for spec in agents.values() {
            for child in &spec.sub_agents {
                if !agents.contains_key(child) {
                    return Err(TrenaError::Agent(format!(
                        "Agent {} declares unknown sub-agent {}",
                        spec.name, child
                    )));
                }
            }
        }

        Ok(Self {
            agents,
            root: root.to_string(),
        })
    }

    /// Resolve an agent by name.
    pub fn get(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.get(name)
    }

    /// The root agent.
    pub fn root(&self) -> &AgentSpec {
        // Validated at construction.
        &self.agents[&self.root]
    }

    /// All agent names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
