use crate::{
    error::Result,
    message::{MessageBase, TelegramMessage},
    payload::Fields,
    sender::{Response, Sender},
};
use tracing::debug;

/// A poll with a question and a list of answer options.
#[derive(Debug)]
pub struct TelegramPoll {
    base: MessageBase,
}

impl TelegramMessage for TelegramPoll {
    fn base(&self) -> &MessageBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut MessageBase {
        &mut self.base
    }
}

impl Default for TelegramPoll {
    fn default() -> Self {
        Self::new("")
    }
}

impl TelegramPoll {
    pub fn new(question: impl Into<String>) -> Self {
        TelegramPoll {
            base: MessageBase::default(),
        }
        .question(question)
    }

    pub fn create(question: impl Into<String>) -> Self {
        Self::new(question)
    }

    #[must_use]
    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.base.payload.set_text("question", question);
        self
    }

    /// Answer options, sent as a JSON array. Limits are checked by Telegram.
    #[must_use]
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = serde_json::Value::from(
            choices.into_iter().map(Into::into).collect::<Vec<String>>(),
        );
        self.base.payload.set_text("options", options.to_string());
        self
    }

    pub fn serialize(self) -> Fields {
        self.base.payload.into_fields()
    }

    /// Hands the poll to `sender`. Returns `None` if sending is disabled.
    pub fn send<S: Sender + ?Sized>(self, sender: &S) -> Result<Option<Response>> {
        if !self.can_send() {
            debug!("Skipping sendPoll because its send condition is false");
            return Ok(None);
        }

        debug!("Calling sendPoll");
        let response = sender.send_poll(self.serialize())?;

        Ok(Some(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        sender::{
            SendFailure,
            testing::{Call, RecordingSender},
        },
    };

    #[test]
    fn it_encodes_choices_as_json() {
        let fields = TelegramPoll::new("Lunch?")
            .choices(["A", "B", "C"])
            .serialize();

        assert_eq!(fields.get("question"), Some("Lunch?"));
        assert_eq!(fields.get("options"), Some(r#"["A","B","C"]"#));
    }

    #[test]
    fn it_escapes_choices() {
        let fields = TelegramPoll::new("")
            .choices(vec![r#"say "hi""#.to_string(), "ünïcode".to_string()])
            .serialize();

        let decoded: Vec<String> = serde_json::from_str(fields.get("options").unwrap()).unwrap();
        assert_eq!(decoded, vec![r#"say "hi""#, "ünïcode"]);
    }

    #[test]
    fn it_overwrites_question_and_choices() {
        let fields = TelegramPoll::create("first")
            .choices(["x"])
            .question("second")
            .choices(["y", "z"])
            .serialize();

        assert_eq!(
            fields.iter().collect::<Vec<_>>(),
            vec![("question", "second"), ("options", r#"["y","z"]"#)]
        );
    }

    #[test]
    fn it_hands_the_flat_payload_to_the_sender() {
        let sender = RecordingSender::ok(serde_json::json!({"ok": true, "result": {"poll": {}}}));

        let response = TelegramPoll::new("Release today?")
            .to("-100123")
            .choices(["Yes", "No"])
            .send(&sender)
            .unwrap();

        assert!(response.is_some());
        assert_eq!(
            sender.calls(),
            vec![Call::Poll(
                [
                    ("question", "Release today?"),
                    ("chat_id", "-100123"),
                    ("options", r#"["Yes","No"]"#),
                ]
                .into_iter()
                .collect()
            )]
        );
    }

    #[test]
    fn it_propagates_send_failures_unchanged() {
        let sender = RecordingSender::failing(SendFailure::MissingToken);

        let result = TelegramPoll::new("?").choices(["a", "b"]).send(&sender);

        assert!(matches!(
            result,
            Err(Error::Send(SendFailure::MissingToken))
        ));
    }

    #[test]
    fn it_skips_sending_when_disabled() {
        let sender = RecordingSender::ok(serde_json::Value::Null);

        let response = TelegramPoll::new("?").send_when(false).send(&sender).unwrap();

        assert_eq!(response, None);
        assert!(sender.calls().is_empty());
    }
}
