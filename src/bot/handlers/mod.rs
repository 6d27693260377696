pub mod callback;
pub mod general_message;
pub mod message;

use teloxide::{
    dispatching::{dialogue, UpdateHandler},
    prelude::*,
};
use crate::bot::commands::Command;
use crate::bot::navigation::Navigator;
use crate::bot::session::{SessionDialogue, SessionState, SessionStorage};
use crate::bot::HandlerError;

pub struct BotHandler {
    pub navigator: Navigator,
}

impl BotHandler {
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator }
    }

    /// Update tree. Expects an `Arc<SessionStorage>` among the dispatcher
    /// dependencies.
    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let navigator = self.navigator.clone();
        let navigator_callback = self.navigator.clone();

        dialogue::enter::<Update, SessionStorage, SessionState, _>()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command, dialogue: SessionDialogue| {
                        let navigator = navigator.clone();
                        async move { message::command_handler(bot, msg, cmd, dialogue, navigator).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(general_message::handle_general_message))
            .branch(Update::filter_callback_query().endpoint(
                move |bot: Bot, q: CallbackQuery, dialogue: SessionDialogue| {
                    let navigator = navigator_callback.clone();
                    async move { callback::callback_handler(bot, q, dialogue, navigator).await }
                },
            ))
    }
}
