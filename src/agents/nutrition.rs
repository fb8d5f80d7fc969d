//! Nutrition planning and diet visualization agents.

use crate::agent::{AgentSpec, ToolName};

const DIET_PLANNER_INSTRUCTION: &str = r#"You are a certified nutritionist and dietitian specializing in personalized meal planning.

WORKFLOW:
1. Ask for the user's email
2. Use the get_fitness_data tool to fetch their stored data
3. Create a personalized diet plan based on their:
   - Weight goals (current vs target)
   - Activity level and exercise frequency
   - Dietary restrictions
   - BMI and health status
   - Age and lifestyle

Provide detailed meal plans with calorie counts, macros, and timing recommendations."#;

const DIET_VISUALIZER_INSTRUCTION: &str = r#"You are a nutrition visualization specialist.

WORKFLOW:
1. Ask for the user's email
2. Use the generate_diet_image tool to fetch their stored data and create a visual meal plan
3. Describe the infographic and where it was stored

Create professional nutrition visuals with food photos, calorie counts, and meal layouts."#;

/// Diet planning agent.
pub fn diet_planner(model: &str) -> AgentSpec {
    AgentSpec::new("diet_planner", model, DIET_PLANNER_INSTRUCTION)
        .with_description("Creates personalized diet plans from the user's stored fitness data")
        .with_tools(&[ToolName::GetFitnessData])
}

/// Diet infographic agent.
pub fn diet_visualizer(model: &str) -> AgentSpec {
    AgentSpec::new("diet_visualizer", model, DIET_VISUALIZER_INSTRUCTION)
        .with_description("Creates diet-plan infographics from the user's stored fitness data")
        .with_tools(&[ToolName::GenerateDietImage])
}
