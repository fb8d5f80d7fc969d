//! The declarative wellness agent tree.
//!
//! Each function builds one agent spec; `wellness_registry` wires the full
//! tree. Delegation between agents is decided by the model from the
//! instruction text, not by code here.

mod fitness;
mod media;
mod nutrition;
mod users;

pub use fitness::{fitness_planner, progress_artist};
pub use media::video_generator;
pub use nutrition::{diet_planner, diet_visualizer};
pub use users::{data_analyst, registration};

use crate::agent::{AgentRegistry, AgentSpec};
use crate::config::Settings;

const COACH_INSTRUCTION: &str = r#"You are a helpful AI wellness coach with specialized capabilities. You can help with general wellness questions and delegate tasks to specialized agents.

When users ask about:
- Training plans, fitness coaching, exercise recommendations, weekly workout schedules, personalized fitness programs
-> Delegate to the fitness_planner

When users ask about:
- Creating videos, workout clips, visual exercise content, generating videos from text
-> Delegate to the video_generator

When users ask about:
- Progress pictures, motivational images, visualizing their achievements
-> Delegate to the progress_artist

When users ask about:
- Diet plans, nutrition advice, meal planning
-> Delegate to the diet_planner

When users ask about:
- Diet plan images, meal visuals, nutrition infographics
-> Delegate to the diet_visualizer

When users want to:
- Register, sign up, or create a profile
-> Delegate to the registration agent

IMPORTANT: If the user asks about stored data, delegate to the data_analyst only to get information.

For other general wellness questions, you can handle them directly with your knowledge."#;

/// The root wellness coach.
pub fn coach(model: &str) -> AgentSpec {
    AgentSpec::new("coach", model, COACH_INSTRUCTION)
        .with_description(
            "Wellness coach that answers general questions and delegates to specialists",
        )
        .with_sub_agents(&[
            "fitness_planner",
            "video_generator",
            "progress_artist",
            "diet_planner",
            "diet_visualizer",
            "registration",
            "data_analyst",
        ])
}

/// Build the full wellness registry rooted at the coach.
pub fn wellness_registry(settings: &Settings) -> AgentRegistry {
    let model = &settings.model.default_model;

    AgentRegistry::new(
        "coach",
        vec![
            coach(model),
            fitness_planner(model),
            video_generator(model),
            progress_artist(model),
            diet_planner(model),
            diet_visualizer(model),
            registration(model),
            data_analyst(model),
        ],
    )
    .expect("wellness registry is internally consistent")
}
