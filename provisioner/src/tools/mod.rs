//! Process-backed collaborators: the seeding scripts and the deployment CLI.

mod command;
mod seeder;
mod serverless;

pub use command::{describe, require_tool, run, run_with_input};
pub use seeder::{AUTO_CONFIRM_ANSWERS, ScriptSeeder};
pub use serverless::ServerlessDeployer;
