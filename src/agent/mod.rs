//! Agent system: declarative specs, the capability registry, and the run loop.
//!
//! An agent is a named configuration of instruction text, a model reference,
//! and a bound tool/child-agent set. Routing between agents is model-driven:
//! the run loop advertises the declared children and lets the model pick.

mod runner;
mod spec;
mod tools;

pub use runner::{RunEvent, Runner, DELEGATE_TOOL};
pub use spec::{AgentRegistry, AgentSpec, ToolName};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext, ToolResult, ToolStatus};
