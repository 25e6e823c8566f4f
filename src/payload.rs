use crate::error::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::{fmt, io::Read, path::PathBuf};

/// Field name under which an upload is kept until it is turned into a part.
pub(crate) const UPLOAD_FIELD: &str = "file";

/// Ordered `name -> value` map of plain request fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites an existing entry in place or appends a new one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.0.iter().position(|(key, _)| key == name)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (key, value) in iter {
            fields.set(key, value);
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Text(String),
    Bytes(Vec<u8>),
}

/// One named part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub contents: Contents,
    pub filename: Option<String>,
}

impl Part {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Part {
            name: name.into(),
            contents: Contents::Text(value.into()),
            filename: None,
        }
    }
}

/// Wire-ready request parameters handed to a [`Sender`](crate::Sender).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    Flat(Fields),
    Multipart(Vec<Part>),
}

impl Params {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Params::Multipart(_))
    }

    /// Text value of a field, looking at flat fields or text parts.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Params::Flat(fields) => fields.get(name),
            Params::Multipart(parts) => parts.iter().find_map(|part| match &part.contents {
                Contents::Text(text) if part.name == name => Some(text.as_str()),
                _ => None,
            }),
        }
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        match self {
            Params::Flat(_) => None,
            Params::Multipart(parts) => parts.iter().find(|part| part.name == name),
        }
    }
}

pub(crate) enum UploadSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    Reader(Box<dyn Read + Send>),
}

impl fmt::Debug for UploadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            UploadSource::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            UploadSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl UploadSource {
    fn read(self) -> Result<Vec<u8>> {
        match self {
            UploadSource::Path(path) => {
                std::fs::read(&path).map_err(|source| Error::ReadAttachment { path, source })
            }
            UploadSource::Bytes(bytes) => Ok(bytes),
            UploadSource::Reader(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes).map_err(Error::ReadStream)?;
                Ok(bytes)
            }
        }
    }
}

/// Raw file contents that have to travel as a multipart part.
#[derive(Debug)]
pub(crate) struct Upload {
    pub name: String,
    pub source: UploadSource,
    pub filename: Option<String>,
}

impl Upload {
    fn into_part(self) -> Result<Part> {
        Ok(Part {
            name: self.name,
            contents: Contents::Bytes(self.source.read()?),
            filename: self.filename,
        })
    }
}

#[derive(Debug)]
pub(crate) enum Field {
    Text(String),
    Upload(Upload),
}

/// Mutable request payload shared by all message builders.
#[derive(Debug, Default)]
pub(crate) struct Payload(Vec<(String, Field)>);

impl Payload {
    fn set(&mut self, name: String, field: Field) {
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = field,
            None => self.0.push((name, field)),
        }
    }

    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set(name.into(), Field::Text(value.into()));
    }

    pub fn set_upload(&mut self, upload: Upload) {
        self.set(UPLOAD_FIELD.to_string(), Field::Upload(upload));
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.0.iter().find_map(|(key, field)| match field {
            Field::Text(text) if key == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(key, _)| key != name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    /// Plain fields; an upload, if any, is dropped.
    pub fn into_fields(self) -> Fields {
        self.0
            .into_iter()
            .filter_map(|(key, field)| match field {
                Field::Text(text) => Some((key, text)),
                Field::Upload(_) => None,
            })
            .collect()
    }

    /// Flattens the payload into named parts, reading the upload contents.
    pub fn into_multipart(self) -> Result<Vec<Part>> {
        self.0
            .into_iter()
            .map(|(key, field)| match field {
                Field::Text(text) => Ok(Part::text(key, text)),
                Field::Upload(upload) => upload.into_part(),
            })
            .collect()
    }
}
