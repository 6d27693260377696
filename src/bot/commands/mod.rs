pub mod progress;
pub mod start;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Training bot commands:")]
pub enum Command {
    #[command(description = "Display this help message")]
    Help,
    #[command(description = "Open the main menu")]
    Start,
    #[command(description = "Show progress in your active program")]
    Progress,
}
