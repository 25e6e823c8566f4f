use crate::{
    error::{Error, Result},
    message::{MessageBase, ParseMode, TelegramMessage},
    payload::{Params, UPLOAD_FIELD, Upload, UploadSource},
    render::Renderer,
    sender::{Response, Sender},
};
use std::{
    fmt::{self, Display},
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Kind of file attached to a message.
///
/// The wire tag doubles as the field name of a file reference and as the
/// name of the upload part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileKind {
    #[default]
    Document,
    Photo,
    Audio,
    Video,
    Animation,
    Voice,
    VideoNote,
}

impl FileKind {
    pub const ALL: [FileKind; 7] = [
        FileKind::Document,
        FileKind::Photo,
        FileKind::Audio,
        FileKind::Video,
        FileKind::Animation,
        FileKind::Voice,
        FileKind::VideoNote,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Photo => "photo",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
            FileKind::Animation => "animation",
            FileKind::Voice => "voice",
            FileKind::VideoNote => "video_note",
        }
    }

    /// Bot API method that delivers this kind of file.
    pub fn method(self) -> &'static str {
        match self {
            FileKind::Document => "sendDocument",
            FileKind::Photo => "sendPhoto",
            FileKind::Audio => "sendAudio",
            FileKind::Video => "sendVideo",
            FileKind::Animation => "sendAnimation",
            FileKind::Voice => "sendVoice",
            FileKind::VideoNote => "sendVideoNote",
        }
    }
}

impl Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown file kind `{0}`")]
pub struct UnknownFileKind(pub String);

impl FromStr for FileKind {
    type Err = UnknownFileKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        FileKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownFileKind(s.to_string()))
    }
}

/// Where the contents of an attachment come from.
pub enum FileSource {
    /// A `file_id` known to Telegram or an HTTP URL; nothing is uploaded.
    Remote(String),
    /// A local file that is read and uploaded.
    Local(PathBuf),
    Bytes(Vec<u8>),
    /// A caller-owned stream, read to the end when the message is serialized.
    Reader(Box<dyn Read + Send>),
}

impl FileSource {
    pub fn remote(reference: impl Into<String>) -> Self {
        FileSource::Remote(reference.into())
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        FileSource::Local(path.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        FileSource::Reader(Box::new(reader))
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Remote(reference) => f.debug_tuple("Remote").field(reference).finish(),
            FileSource::Local(path) => f.debug_tuple("Local").field(path).finish(),
            FileSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            FileSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

/// A string naming a readable local file is uploaded, anything else is sent
/// as a reference. The local check wins when both would fit.
impl From<&str> for FileSource {
    fn from(file: &str) -> Self {
        if is_readable_file(Path::new(file)) {
            FileSource::Local(PathBuf::from(file))
        } else {
            FileSource::Remote(file.to_string())
        }
    }
}

impl From<String> for FileSource {
    fn from(file: String) -> Self {
        if is_readable_file(Path::new(&file)) {
            FileSource::Local(PathBuf::from(file))
        } else {
            FileSource::Remote(file)
        }
    }
}

impl From<&Path> for FileSource {
    fn from(path: &Path) -> Self {
        FileSource::Local(path.to_path_buf())
    }
}

impl From<PathBuf> for FileSource {
    fn from(path: PathBuf) -> Self {
        FileSource::Local(path)
    }
}

impl From<Vec<u8>> for FileSource {
    fn from(bytes: Vec<u8>) -> Self {
        FileSource::Bytes(bytes)
    }
}

impl From<Url> for FileSource {
    fn from(url: Url) -> Self {
        FileSource::Remote(url.into())
    }
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

/// A message carrying one file and an optional caption.
#[derive(Debug)]
pub struct TelegramFile {
    base: MessageBase,
    kind: FileKind,
}

impl TelegramMessage for TelegramFile {
    fn base(&self) -> &MessageBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut MessageBase {
        &mut self.base
    }
}

impl Default for TelegramFile {
    fn default() -> Self {
        Self::new("")
    }
}

impl TelegramFile {
    pub fn new(content: impl Into<String>) -> Self {
        TelegramFile {
            base: MessageBase::default(),
            kind: FileKind::default(),
        }
        .content(content)
        .parse_mode(ParseMode::Markdown)
    }

    pub fn create(content: impl Into<String>) -> Self {
        Self::new(content)
    }

    /// Caption shown below the file.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.base.payload.set_text("caption", content);
        self
    }

    /// Uses a rendered template as the caption.
    pub fn view<R: Renderer + ?Sized>(
        self,
        renderer: &R,
        template: &str,
        data: &serde_json::Value,
        merge_data: &serde_json::Value,
    ) -> Result<Self> {
        let caption = renderer
            .render(template, data, merge_data)
            .map_err(Error::Render)?;
        Ok(self.content(caption))
    }

    /// Attaches a file, replacing any previous attachment.
    #[must_use]
    pub fn attach(
        mut self,
        file: impl Into<FileSource>,
        kind: FileKind,
        filename: Option<&str>,
    ) -> Self {
        let previous = std::mem::replace(&mut self.kind, kind);
        let payload = &mut self.base.payload;
        payload.remove(previous.as_str());
        payload.remove(UPLOAD_FIELD);

        let file: FileSource = file.into();
        let source = match file {
            FileSource::Remote(reference) => {
                debug!(%kind, "Attaching {kind} by reference");
                payload.set_text(kind.as_str(), reference);
                return self;
            }
            FileSource::Local(path) => UploadSource::Path(path),
            FileSource::Bytes(bytes) => UploadSource::Bytes(bytes),
            FileSource::Reader(reader) => UploadSource::Reader(reader),
        };

        debug!(%kind, ?source, "Attaching {kind} as upload");
        payload.set_upload(Upload {
            name: kind.as_str().to_string(),
            source,
            filename: filename.map(str::to_string),
        });

        self
    }

    #[must_use]
    pub fn photo(self, file: impl Into<FileSource>) -> Self {
        self.attach(file, FileKind::Photo, None)
    }

    #[must_use]
    pub fn audio(self, file: impl Into<FileSource>) -> Self {
        self.attach(file, FileKind::Audio, None)
    }

    /// `filename` overrides the name the recipient sees for an upload.
    #[must_use]
    pub fn document(self, file: impl Into<FileSource>, filename: Option<&str>) -> Self {
        self.attach(file, FileKind::Document, filename)
    }

    #[must_use]
    pub fn video(self, file: impl Into<FileSource>) -> Self {
        self.attach(file, FileKind::Video, None)
    }

    #[must_use]
    pub fn animation(self, file: impl Into<FileSource>) -> Self {
        self.attach(file, FileKind::Animation, None)
    }

    #[must_use]
    pub fn voice(self, file: impl Into<FileSource>) -> Self {
        self.attach(file, FileKind::Voice, None)
    }

    #[must_use]
    pub fn video_note(self, file: impl Into<FileSource>) -> Self {
        self.attach(file, FileKind::VideoNote, None)
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// True when raw contents have to be uploaded, false for references.
    pub fn has_attachment(&self) -> bool {
        self.base.payload.contains(UPLOAD_FIELD)
    }

    /// Builds the wire parameters, reading upload contents if necessary.
    pub fn serialize(self) -> Result<Params> {
        if self.has_attachment() {
            Ok(Params::Multipart(self.base.payload.into_multipart()?))
        } else {
            Ok(Params::Flat(self.base.payload.into_fields()))
        }
    }

    /// Hands the message to `sender`. Returns `None` if sending is disabled.
    pub fn send<S: Sender + ?Sized>(self, sender: &S) -> Result<Option<Response>> {
        let kind = self.kind;
        if !self.can_send() {
            debug!(%kind, "Skipping {} because its send condition is false", kind.method());
            return Ok(None);
        }

        let multipart = self.has_attachment();
        let params = self.serialize()?;

        debug!(%kind, multipart, "Calling {}", kind.method());
        let response = sender.send_file(params, kind, multipart)?;

        Ok(Some(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        payload::{Contents, Part},
        render::RenderError,
        sender::{
            SendFailure,
            testing::{Call, RecordingSender},
        },
    };
    use std::io::Write;

    fn temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn it_sends_the_caption_as_flat_field() {
        let params = TelegramFile::new("").content("*Deploy* finished").serialize().unwrap();

        assert!(!params.is_multipart());
        assert_eq!(params.get("caption"), Some("*Deploy* finished"));
        assert_eq!(params.get("parse_mode"), Some("Markdown"));
    }

    #[test]
    fn it_keeps_remote_references_inline() {
        let file = TelegramFile::create("Look").photo("https://example.com/a.png");

        assert!(!file.has_attachment());
        assert_eq!(file.kind(), FileKind::Photo);

        let params = file.serialize().unwrap();
        assert_eq!(params.get("photo"), Some("https://example.com/a.png"));
        assert_eq!(params.get("file"), None);
    }

    #[test]
    fn it_uploads_readable_local_files() {
        let pdf = temp_file(b"%PDF-1.7");
        let path = pdf.path().to_str().unwrap();

        let file = TelegramFile::new("Report").document(path, None);
        assert!(file.has_attachment());

        let params = file.serialize().unwrap();
        assert_eq!(
            params,
            Params::Multipart(vec![
                Part::text("caption", "Report"),
                Part::text("parse_mode", "Markdown"),
                Part {
                    name: "document".to_string(),
                    contents: Contents::Bytes(b"%PDF-1.7".to_vec()),
                    filename: None,
                },
            ])
        );
    }

    #[test]
    fn it_passes_the_filename_override() {
        let pdf = temp_file(b"%PDF-1.7");

        let params = TelegramFile::new("")
            .document(pdf.path(), Some("custom.pdf"))
            .serialize()
            .unwrap();

        assert_eq!(
            params.part("document").and_then(|part| part.filename.as_deref()),
            Some("custom.pdf")
        );
    }

    #[test]
    fn it_replaces_the_previous_attachment() {
        let clip = temp_file(b"mp4");

        let params = TelegramFile::new("")
            .photo("AgACAgIAAxkBAAIB")
            .video(clip.path())
            .serialize()
            .unwrap();
        assert_eq!(params.get("photo"), None);
        assert_eq!(
            params.part("video").map(|part| &part.contents),
            Some(&Contents::Bytes(b"mp4".to_vec()))
        );

        let file = TelegramFile::new("")
            .video(clip.path())
            .voice("https://example.com/note.ogg");
        assert!(!file.has_attachment());
        assert_eq!(file.kind(), FileKind::Voice);

        let params = file.serialize().unwrap();
        assert_eq!(
            params,
            Params::Flat(
                [
                    ("caption", ""),
                    ("parse_mode", "Markdown"),
                    ("voice", "https://example.com/note.ogg"),
                ]
                .into_iter()
                .collect()
            )
        );
    }

    #[test]
    fn it_uploads_in_memory_contents() {
        let params = TelegramFile::new("")
            .animation(b"GIF89a".to_vec())
            .serialize()
            .unwrap();

        assert_eq!(
            params.part("animation").map(|part| &part.contents),
            Some(&Contents::Bytes(b"GIF89a".to_vec()))
        );
    }

    #[test]
    fn it_fails_on_unreadable_explicit_paths() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.mp3");

        let file = TelegramFile::new("").audio(FileSource::local(&missing));
        assert!(file.has_attachment());

        match file.serialize() {
            Err(Error::ReadAttachment { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected a read error, got {other:?}"),
        }
    }

    #[test]
    fn it_treats_missing_paths_given_as_strings_as_references() {
        let file = TelegramFile::new("").video_note("does/not/exist.mp4");

        assert!(!file.has_attachment());
        assert_eq!(
            file.serialize().unwrap().get("video_note"),
            Some("does/not/exist.mp4")
        );
    }

    #[test]
    fn it_converts_urls_to_references() {
        let url = Url::parse("https://example.com/cat.jpg").unwrap();

        let params = TelegramFile::new("").photo(url).serialize().unwrap();

        assert_eq!(params.get("photo"), Some("https://example.com/cat.jpg"));
    }

    #[test]
    fn it_parses_file_kinds() {
        assert_eq!("video-note".parse::<FileKind>(), Ok(FileKind::VideoNote));
        assert_eq!("Photo".parse::<FileKind>(), Ok(FileKind::Photo));
        assert_eq!(
            "sticker".parse::<FileKind>(),
            Err(UnknownFileKind("sticker".to_string()))
        );
        assert_eq!(FileKind::VideoNote.method(), "sendVideoNote");
    }

    struct Greeting;

    impl Renderer for Greeting {
        fn render(
            &self,
            template: &str,
            data: &serde_json::Value,
            merge_data: &serde_json::Value,
        ) -> std::result::Result<String, RenderError> {
            if template != "greeting" {
                return Err(format!("unknown template {template}").into());
            }
            let name = merge_data
                .get("name")
                .or_else(|| data.get("name"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("nobody");
            Ok(format!("Hello {name}"))
        }
    }

    #[test]
    fn it_renders_the_caption_from_a_view() {
        let file = TelegramFile::new("")
            .view(
                &Greeting,
                "greeting",
                &serde_json::json!({"name": "Ada"}),
                &serde_json::json!({"name": "Grace"}),
            )
            .unwrap();
        assert_eq!(file.payload_value("caption"), Some("Hello Grace"));

        let result = TelegramFile::new("").view(
            &Greeting,
            "farewell",
            &serde_json::Value::Null,
            &serde_json::Value::Null,
        );
        assert!(matches!(result, Err(Error::Render(_))));
    }

    #[test]
    fn it_hands_uploads_to_the_sender_as_multipart() {
        let sender = RecordingSender::ok(serde_json::json!({"ok": true}));
        let image = temp_file(b"png");

        let response = TelegramFile::new("Chart")
            .to("42")
            .photo(image.path())
            .send(&sender)
            .unwrap();

        assert_eq!(response, Some(serde_json::json!({"ok": true})));
        assert_eq!(
            sender.calls(),
            vec![Call::File {
                params: Params::Multipart(vec![
                    Part::text("caption", "Chart"),
                    Part::text("parse_mode", "Markdown"),
                    Part::text("chat_id", "42"),
                    Part {
                        name: "photo".to_string(),
                        contents: Contents::Bytes(b"png".to_vec()),
                        filename: None,
                    },
                ]),
                kind: FileKind::Photo,
                multipart: true,
            }]
        );
    }

    #[test]
    fn it_propagates_send_failures_unchanged() {
        let failure = SendFailure::Api {
            code: 400,
            description: "Bad Request: chat not found".to_string(),
        };
        let sender = RecordingSender::failing(failure.clone());

        let result = TelegramFile::new("").document("BQACAgIAAxkBAAIC", None).send(&sender);

        match result {
            Err(Error::Send(returned)) => assert_eq!(returned, failure),
            other => panic!("expected the send failure, got {other:?}"),
        }
        assert_eq!(sender.calls().len(), 1);
    }

    #[test]
    fn it_skips_sending_when_disabled() {
        let sender = RecordingSender::ok(serde_json::Value::Null);

        let response = TelegramFile::new("")
            .photo("https://example.com/a.png")
            .send_when(false)
            .send(&sender)
            .unwrap();

        assert_eq!(response, None);
        assert!(sender.calls().is_empty());
    }
}
