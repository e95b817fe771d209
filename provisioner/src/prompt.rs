//! Operator interaction: yes/no questions and the action menu.

use std::fmt;

use anyhow::Result;
use inquire::InquireError;
use tracing::warn;

/// Asks the operator a yes/no question.
pub trait Confirm: Send + Sync {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Terminal prompt. Defaults to "no"; Esc and Ctrl-C count as "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct InteractiveConfirm;

impl Confirm for InteractiveConfirm {
    fn confirm(&self, question: &str) -> Result<bool> {
        match inquire::Confirm::new(question).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Provision,
    Deploy,
    Teardown,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 3] = [Self::Provision, Self::Deploy, Self::Teardown];

    pub fn number(self) -> u8 {
        match self {
            Self::Provision => 1,
            Self::Deploy => 2,
            Self::Teardown => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.number() == number)
    }

    /// Accepts the menu number or the action name.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(number) = input.parse::<u8>() {
            return Self::from_number(number);
        }
        match input.to_ascii_lowercase().as_str() {
            "provision" => Some(Self::Provision),
            "deploy" => Some(Self::Deploy),
            "teardown" | "remove" => Some(Self::Teardown),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Provision => "Provision bucket, tables and demo data",
            Self::Deploy => "Deploy the application",
            Self::Teardown => "Remove the deployed application",
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.number(), self.label())
    }
}

/// Prints the numbered menu and reads an answer until it names an action.
/// `None` when the operator backs out.
pub fn select_action() -> Result<Option<MenuChoice>> {
    println!();
    for choice in MenuChoice::ALL {
        println!("  {choice}");
    }

    loop {
        let answer = match inquire::Text::new("Choose an option (1-3):").prompt() {
            Ok(answer) => answer,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        match MenuChoice::parse(&answer) {
            Some(choice) => return Ok(Some(choice)),
            None => warn!(%answer, "not a menu option"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers_round_trip() {
        for choice in MenuChoice::ALL {
            assert_eq!(MenuChoice::from_number(choice.number()), Some(choice));
        }
        assert_eq!(MenuChoice::from_number(0), None);
        assert_eq!(MenuChoice::from_number(4), None);
    }

    #[test]
    fn parse_accepts_numbers_and_names() {
        assert_eq!(MenuChoice::parse(" 2 "), Some(MenuChoice::Deploy));
        assert_eq!(MenuChoice::parse("Teardown"), Some(MenuChoice::Teardown));
        assert_eq!(MenuChoice::parse("remove"), Some(MenuChoice::Teardown));
        assert_eq!(MenuChoice::parse("provision"), Some(MenuChoice::Provision));
        assert_eq!(MenuChoice::parse("9"), None);
        assert_eq!(MenuChoice::parse("launch"), None);
    }

    #[test]
    fn display_shows_number_first() {
        assert!(MenuChoice::Teardown.to_string().starts_with("3) "));
    }
}
