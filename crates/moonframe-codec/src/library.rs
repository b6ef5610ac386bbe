//! Frame library: ordered, immutable frame sets per resolution profile.
//!
//! The loader hands over `(identifier, bitmap)` pairs in whatever order it
//! enumerated them. Identifiers are sorted lexicographically before encoding,
//! so zero-padded file names such as `0001.bmp` give temporal order regardless
//! of archive or directory iteration order.

use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use tracing::info;

use crate::{
    bitmap::RawBitmap,
    errors::LibraryError,
    frame::{Frame, encode_frame},
};

/// Resolution profile a playback is requested with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Profile {
    /// Low resolution animation, sent as bare glyphs.
    Small,
    /// High resolution animation, sent inside a code fence.
    Big,
}

impl Profile {
    /// All profiles, in declaration order.
    pub const ALL: [Profile; 2] = [Profile::Small, Profile::Big];

    /// Lowercase name used by the command surface.
    pub fn name(self) -> &'static str {
        match self {
            Profile::Small => "small",
            Profile::Big => "big",
        }
    }

    /// Layout a frame set of this profile uses unless overridden.
    pub fn default_layout(self) -> Layout {
        match self {
            Profile::Small => Layout::Plain,
            Profile::Big => Layout::Fenced,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Profile::Small),
            "big" => Ok(Profile::Big),
            other => Err(LibraryError::UnknownProfile(other.to_string())),
        }
    }
}

/// How a frame is wrapped into a message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Frame text followed directly by the caption.
    Plain,
    /// Frame text inside a code fence, then the caption.
    ///
    /// Chat clients stop rendering emoji past a per-message count; inside a
    /// code block they are shown as text instead.
    Fenced,
}

/// Ordered animation for one profile.
///
/// Built once at startup and shared read-only by all sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    profile: Profile,
    layout: Layout,
    caption_prefix: String,
    frames: Vec<Frame>,
}

impl FrameSet {
    /// Markup placed before the `i/total` progress text.
    pub const DEFAULT_CAPTION_PREFIX: &'static str = "-# ";

    /// Sort the sources by identifier and encode every bitmap.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Empty`] if `sources` is empty
    /// - [`LibraryError::DuplicateIdentifier`] if two sources share an
    ///   identifier
    /// - [`LibraryError::Encoding`] if any bitmap fails to encode
    pub fn build(
        profile: Profile,
        mut sources: Vec<(String, RawBitmap)>,
    ) -> Result<Self, LibraryError> {
        if sources.is_empty() {
            return Err(LibraryError::Empty(profile.name().to_string()));
        }

        sources.sort_by(|(a, _), (b, _)| a.cmp(b));

        if let Some(pair) = sources.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(LibraryError::DuplicateIdentifier(pair[0].0.clone()));
        }

        let frames = sources
            .iter()
            .map(|(identifier, bitmap)| {
                encode_frame(bitmap).map_err(|source| LibraryError::Encoding {
                    identifier: identifier.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(profile = %profile, frames = frames.len(), "frame set loaded");

        Ok(Self {
            profile,
            layout: profile.default_layout(),
            caption_prefix: Self::DEFAULT_CAPTION_PREFIX.to_string(),
            frames,
        })
    }

    /// Override the payload layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Override the caption markup.
    #[must_use]
    pub fn with_caption_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.caption_prefix = prefix.into();
        self
    }

    /// Profile this set was built for.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Payload layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Number of frames. Never zero.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; a frame set holds at least one frame.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// All frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Message content for frame `index`: the frame plus an `i+1/total`
    /// progress caption.
    pub fn payload(&self, index: usize) -> Option<String> {
        let frame = self.frames.get(index)?;
        let progress = format!("{}{}/{}", self.caption_prefix, index + 1, self.frames.len());
        Some(match self.layout {
            Layout::Plain => format!("{}{progress}", frame.text()),
            Layout::Fenced => format!("```\n{}```\n{progress}", frame.text()),
        })
    }
}

/// Frame sets for every loaded profile.
#[derive(Debug, Clone, Default)]
pub struct FrameLibrary {
    sets: HashMap<Profile, Arc<FrameSet>>,
}

impl FrameLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the set for its profile.
    pub fn insert(&mut self, set: FrameSet) {
        self.sets.insert(set.profile(), Arc::new(set));
    }

    /// Builder form of [`FrameLibrary::insert`].
    #[must_use]
    pub fn with(mut self, set: FrameSet) -> Self {
        self.insert(set);
        self
    }

    /// Shared handle to the set for `profile`.
    pub fn get(&self, profile: Profile) -> Option<Arc<FrameSet>> {
        self.sets.get(&profile).cloned()
    }

    /// Loaded profiles, sorted.
    pub fn profiles(&self) -> Vec<Profile> {
        let mut profiles: Vec<Profile> = self.sets.keys().copied().collect();
        profiles.sort();
        profiles
    }
}
