//! Stream kinds as addressed by the MediaInfo engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a stream inside a media file.
///
/// The discriminants match MediaInfo's `stream_t` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum StreamKind {
    /// Container-level information.
    #[default]
    General = 0,
    /// Video track.
    Video = 1,
    /// Audio track.
    Audio = 2,
    /// Subtitle or other text track.
    Text = 3,
    /// Timecode, chapter tracks and other auxiliary streams.
    Other = 4,
    /// Still image.
    Image = 5,
    /// Menu / chapter list.
    Menu = 6,
}

impl StreamKind {
    /// All kinds, in engine order.
    pub const ALL: [StreamKind; 7] = [
        StreamKind::General,
        StreamKind::Video,
        StreamKind::Audio,
        StreamKind::Text,
        StreamKind::Other,
        StreamKind::Image,
        StreamKind::Menu,
    ];

    /// Engine identifier for this kind.
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Name used in report headers and inform templates (`Video`, `Audio`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            StreamKind::General => "General",
            StreamKind::Video => "Video",
            StreamKind::Audio => "Audio",
            StreamKind::Text => "Text",
            StreamKind::Other => "Other",
            StreamKind::Image => "Image",
            StreamKind::Menu => "Menu",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown stream kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stream kind '{0}' (expected general, video, audio, text, other, image or menu)")]
pub struct ParseStreamKindError(String);

impl FromStr for StreamKind {
    type Err = ParseStreamKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StreamKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStreamKindError(s.to_string()))
    }
}
