use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::command::{require_tool, run, run_with_input};
use crate::provision::Seeder;

/// Answers piped to the scripts when running unattended. More than any of
/// them asks for; the rest is discarded when stdin closes.
pub const AUTO_CONFIRM_ANSWERS: &str = "y\ny\ny\ny\ny\ny\ny\ny\n";

const PYTHON: &str = "python3";
const SCRIPTS: [&str; 2] = ["DataGenerator.py", "DataPoblator.py"];

/// Runs the generator and then the loader script in `dir`.
#[derive(Debug, Clone)]
pub struct ScriptSeeder {
    dir: PathBuf,
}

impl ScriptSeeder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn script_args() -> Vec<Vec<String>> {
        SCRIPTS.iter().map(|s| vec![(*s).to_string()]).collect()
    }
}

#[async_trait]
impl Seeder for ScriptSeeder {
    async fn seed(&self, auto_confirm: bool) -> Result<()> {
        require_tool(PYTHON, "Install Python 3 and make sure `python3` is on PATH.")?;

        for args in Self::script_args() {
            if auto_confirm {
                run_with_input(PYTHON, &args, &self.dir, AUTO_CONFIRM_ANSWERS).await?;
            } else {
                run(PYTHON, &args, &self.dir).await?;
            }
        }
        info!(dir = %self.dir.display(), "seeding scripts finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_runs_before_loader() {
        assert_eq!(
            ScriptSeeder::script_args(),
            vec![vec!["DataGenerator.py".to_string()], vec!["DataPoblator.py".to_string()]]
        );
    }

    #[test]
    fn unattended_answers_are_all_yes() {
        assert!(AUTO_CONFIRM_ANSWERS.lines().all(|line| line == "y"));
        assert!(AUTO_CONFIRM_ANSWERS.ends_with('\n'));
    }
}
