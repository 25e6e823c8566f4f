use serde_json::{Map, Value, json};
use telegram_notify::{Contents, FileKind, Fields, Params, Part, Response, SendFailure, Sender};
use tracing::info;

/// Sender that answers with the request it would have made.
pub struct PreviewSender;

impl Sender for PreviewSender {
    fn send_file(
        &self,
        params: Params,
        kind: FileKind,
        multipart: bool,
    ) -> Result<Response, SendFailure> {
        info!(
            "Previewing {} as {} request",
            kind.method(),
            if multipart { "multipart" } else { "form" }
        );

        Ok(json!({
            "method": kind.method(),
            "multipart": multipart,
            "params": params_to_json(&params),
        }))
    }

    fn send_poll(&self, params: Fields) -> Result<Response, SendFailure> {
        info!("Previewing sendPoll as form request");

        Ok(json!({
            "method": "sendPoll",
            "multipart": false,
            "params": fields_to_json(&params),
        }))
    }
}

fn params_to_json(params: &Params) -> Value {
    match params {
        Params::Flat(fields) => fields_to_json(fields),
        Params::Multipart(parts) => parts.iter().map(part_to_json).collect(),
    }
}

fn fields_to_json(fields: &Fields) -> Value {
    fields
        .iter()
        .map(|(key, value)| (key.to_string(), Value::from(value)))
        .collect::<Map<_, _>>()
        .into()
}

/// Raw contents are summarized by their length.
fn part_to_json(part: &Part) -> Value {
    let mut object = Map::new();
    object.insert("name".to_string(), Value::from(part.name.as_str()));
    match &part.contents {
        Contents::Text(text) => object.insert("contents".to_string(), Value::from(text.as_str())),
        Contents::Bytes(bytes) => object.insert("bytes".to_string(), Value::from(bytes.len())),
    };
    if let Some(filename) = &part.filename {
        object.insert("filename".to_string(), Value::from(filename.as_str()));
    }
    Value::Object(object)
}
