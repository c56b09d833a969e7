//! Opaque file payloads carried through to the generated document

use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kinds of files the form accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Png,
    Jpeg,
    Pdf,
}

impl AttachmentKind {
    /// Detect the kind from a file name's extension
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(AttachmentKind::Png),
            "jpg" | "jpeg" => Some(AttachmentKind::Jpeg),
            "pdf" => Some(AttachmentKind::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AttachmentKind::Png => "png",
            AttachmentKind::Jpeg => "jpg",
            AttachmentKind::Pdf => "pdf",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, AttachmentKind::Png | AttachmentKind::Jpeg)
    }
}

/// An uploaded file; bytes travel as base64 in JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub kind: AttachmentKind,
    #[serde(rename = "data_base64", with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Attachment {
    /// Build an attachment, inferring its kind from the file name
    pub fn from_upload(file_name: impl Into<String>, data: Vec<u8>) -> Option<Self> {
        let file_name = file_name.into();
        let kind = AttachmentKind::from_file_name(&file_name)?;
        Some(Self {
            file_name,
            kind,
            data,
        })
    }
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let engine = base64::engine::general_purpose::STANDARD;
        serializer.serialize_str(&engine.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let engine = base64::engine::general_purpose::STANDARD;
        let encoded = String::deserialize(deserializer)?;
        engine.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(
            AttachmentKind::from_file_name("fachada.JPEG"),
            Some(AttachmentKind::Jpeg)
        );
        assert_eq!(
            AttachmentKind::from_file_name("art.pdf"),
            Some(AttachmentKind::Pdf)
        );
        assert_eq!(AttachmentKind::from_file_name("notes.txt"), None);
        assert_eq!(AttachmentKind::from_file_name("sem_extensao"), None);
    }

    #[test]
    fn test_data_travels_as_base64() {
        let attachment = Attachment::from_upload("a.png", vec![0x89, 0x50, 0x4E, 0x47]).unwrap();
        let json = serde_json::to_value(&attachment).unwrap();
        assert_eq!(json["data_base64"], "iVBORw==");

        let back: Attachment = serde_json::from_value(json).unwrap();
        assert_eq!(back, attachment);
    }
}
