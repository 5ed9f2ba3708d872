//! Media position flags tracked by a tape device.

use crate::error::TapeError;

/// What the drive has told us about where the medium is.
///
/// A read that runs into a file mark moves the device to `AtFileMark`, and a
/// write that crosses the early-warning area near the end of the medium
/// moves it to `AtMediaLimit`. Both conditions are only ever raised by the
/// driver; this type only remembers them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MediaState {
    Normal,
    AtFileMark,
    AtMediaLimit,
    MediaLimitOverridden,
}

/// When an override of the media limit stops applying.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverridePolicy {
    /// Once granted, the override lasts until the device is closed.
    Session,

    /// The override is consumed by the next early warning the drive reports.
    /// Useful for media with more than one warning mark.
    UntilNextWarning,
}

impl Default for MediaState {
    fn default() -> Self {
        MediaState::Normal
    }
}

impl MediaState {
    pub fn at_file_mark(self) -> bool {
        self == MediaState::AtFileMark
    }

    pub fn at_media_limit(self) -> bool {
        match self {
            MediaState::AtMediaLimit | MediaState::MediaLimitOverridden => true,
            _ => false
        }
    }

    pub fn media_limit_overridden(self) -> bool {
        self == MediaState::MediaLimitOverridden
    }

    /// Writes are refused while the media limit is active and not overridden.
    pub fn blocks_writes(self) -> bool {
        self == MediaState::AtMediaLimit
    }

    /// The driver reported a file mark during a read.
    ///
    /// Write-side end-of-medium handling takes precedence; the file mark is
    /// not recorded once the media limit has been reached.
    pub fn reach_file_mark(self) -> MediaState {
        match self {
            MediaState::Normal | MediaState::AtFileMark => MediaState::AtFileMark,
            limit => limit
        }
    }

    /// Forget the file mark. The mark itself must already have been passed.
    pub fn clear_file_mark(self) -> Result<MediaState, TapeError> {
        match self {
            MediaState::AtFileMark => Ok(MediaState::Normal),
            _ => Err(TapeError::State("not at end of file"))
        }
    }

    /// The driver reported the early warning during a write.
    pub fn reach_media_limit(self, policy: OverridePolicy) -> MediaState {
        match (self, policy) {
            (MediaState::MediaLimitOverridden, OverridePolicy::Session) => MediaState::MediaLimitOverridden,
            _ => MediaState::AtMediaLimit
        }
    }

    /// Allow writes to continue past the early warning.
    pub fn override_media_limit(self) -> Result<MediaState, TapeError> {
        match self {
            MediaState::AtMediaLimit | MediaState::MediaLimitOverridden => Ok(MediaState::MediaLimitOverridden),
            _ => Err(TapeError::State("not at logical end of media"))
        }
    }
}
