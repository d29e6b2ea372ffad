// Audio zones.
//
// `SonosAudio` embeds an `Audio` bound with the union of both point sets:
// every audio operation works unchanged on a Sonos zone, and the Sonos
// extras are additive.

use super::Channel;
use super::common::DeviceCore;
use super::point::{Access, PointSpec};
use crate::codec::{Bounds, Value, ValueKind};
use crate::error::CoreError;
use crate::model::FunctionConfig;

const PLAY_PAUSE: &str = "PlayPause";
const VOLUME: &str = "Volume";
const MUTE: &str = "Mute";
const SHUFFLE: &str = "Shuffle";
const REPEAT: &str = "Repeat";
const PREVIOUS: &str = "Previous";
const NEXT: &str = "Next";
const TITLE: &str = "Title";
const ARTIST: &str = "Artist";
const ALBUM: &str = "Album";
const PLAYLIST: &str = "Playlist";
const PREVIOUS_PLAYLIST: &str = "PreviousPlaylist";
const NEXT_PLAYLIST: &str = "NextPlaylist";
const PLAYLIST_NAME: &str = "PlaylistName";

const COVER: &str = "Cover";
const ZONE_NAME: &str = "ZoneName";
const VALID_PLAY_MODES: &str = "ValidPlayModes";
const TRANSPORT_ACTIONS: &str = "TransportActions";
const SHIFT_VOLUME: &str = "Shift";

const fn info(name: &'static str) -> PointSpec {
    PointSpec::optional(name, ValueKind::Text, Access::READ_ONLY).always_read_only()
}

const fn command(name: &'static str) -> PointSpec {
    PointSpec::optional(name, ValueKind::Binary, Access::WRITE_ONLY)
}

const fn setting(name: &'static str) -> PointSpec {
    PointSpec::optional(name, ValueKind::Binary, Access::READ_WRITE)
}

const AUDIO_POINTS: &[PointSpec] = &[
    PointSpec::required(PLAY_PAUSE, ValueKind::Binary, Access::READ_WRITE).aliases(&["Play"]),
    PointSpec::required(VOLUME, ValueKind::PERCENT, Access::READ_WRITE),
    setting(MUTE),
    setting(SHUFFLE),
    setting(REPEAT),
    command(PREVIOUS),
    command(NEXT),
    info(TITLE),
    info(ARTIST),
    info(ALBUM),
    PointSpec::optional(PLAYLIST, ValueKind::Integer, Access::READ_WRITE),
    command(PREVIOUS_PLAYLIST),
    command(NEXT_PLAYLIST),
    info(PLAYLIST_NAME),
];

const SONOS_POINTS: &[PointSpec] = &[
    info(COVER),
    info(ZONE_NAME),
    info(VALID_PLAY_MODES),
    info(TRANSPORT_ACTIONS),
    PointSpec::optional(
        SHIFT_VOLUME,
        ValueKind::Percent(Bounds::SIGNED_PERCENT),
        Access::WRITE_ONLY,
    )
    .aliases(&["Shift-Volume"]),
];

// ── Audio ────────────────────────────────────────────────────────────

/// `AudioWithPlaylist`.
#[derive(Debug)]
pub struct Audio {
    core: DeviceCore,
}

impl Channel for Audio {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        AUDIO_POINTS.to_vec()
    }

    fn from_core(core: DeviceCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DeviceCore {
        &self.core
    }
}

impl Audio {
    pub fn has_mute(&self) -> bool {
        self.core.has(MUTE)
    }

    pub fn has_shuffle(&self) -> bool {
        self.core.has(SHUFFLE)
    }

    pub fn has_repeat(&self) -> bool {
        self.core.has(REPEAT)
    }

    pub fn has_playlists(&self) -> bool {
        self.core.has(PLAYLIST)
    }

    pub async fn play(&self) -> Result<(), CoreError> {
        self.core.push(PLAY_PAUSE, &Value::Bool(true)).await
    }

    pub async fn pause(&self) -> Result<(), CoreError> {
        self.core.push(PLAY_PAUSE, &Value::Bool(false)).await
    }

    pub async fn is_playing(&self) -> Option<bool> {
        self.core.bool_value(PLAY_PAUSE).await
    }

    pub async fn set_volume(&self, percent: f64) -> Result<(), CoreError> {
        self.core.push(VOLUME, &Value::Float(percent)).await
    }

    pub async fn volume(&self) -> Option<f64> {
        self.core.f64_value(VOLUME).await
    }

    pub async fn set_mute(&self, muted: bool) -> Result<(), CoreError> {
        self.core.push(MUTE, &Value::Bool(muted)).await
    }

    pub async fn is_muted(&self) -> Option<bool> {
        self.core.bool_value(MUTE).await
    }

    pub async fn set_shuffle(&self, on: bool) -> Result<(), CoreError> {
        self.core.push(SHUFFLE, &Value::Bool(on)).await
    }

    pub async fn shuffle(&self) -> Option<bool> {
        self.core.bool_value(SHUFFLE).await
    }

    pub async fn set_repeat(&self, on: bool) -> Result<(), CoreError> {
        self.core.push(REPEAT, &Value::Bool(on)).await
    }

    pub async fn repeat(&self) -> Option<bool> {
        self.core.bool_value(REPEAT).await
    }

    pub async fn previous(&self) -> Result<(), CoreError> {
        self.core.push(PREVIOUS, &Value::Bool(true)).await
    }

    pub async fn next(&self) -> Result<(), CoreError> {
        self.core.push(NEXT, &Value::Bool(true)).await
    }

    pub async fn select_playlist(&self, index: i64) -> Result<(), CoreError> {
        self.core.push(PLAYLIST, &Value::Int(index)).await
    }

    pub async fn playlist(&self) -> Option<i64> {
        self.core.value(PLAYLIST).await.and_then(|v| v.as_i64())
    }

    pub async fn previous_playlist(&self) -> Result<(), CoreError> {
        self.core.push(PREVIOUS_PLAYLIST, &Value::Bool(true)).await
    }

    pub async fn next_playlist(&self) -> Result<(), CoreError> {
        self.core.push(NEXT_PLAYLIST, &Value::Bool(true)).await
    }

    pub async fn title(&self) -> Option<String> {
        self.core.text_value(TITLE).await
    }

    pub async fn artist(&self) -> Option<String> {
        self.core.text_value(ARTIST).await
    }

    pub async fn album(&self) -> Option<String> {
        self.core.text_value(ALBUM).await
    }

    pub async fn playlist_name(&self) -> Option<String> {
        self.core.text_value(PLAYLIST_NAME).await
    }
}

// ── SonosAudio ───────────────────────────────────────────────────────

/// `Sonos.Audio`: an audio zone plus Sonos metadata and relative volume.
#[derive(Debug)]
pub struct SonosAudio {
    audio: Audio,
}

impl Channel for SonosAudio {
    fn points(_: &FunctionConfig) -> Vec<PointSpec> {
        AUDIO_POINTS.iter().chain(SONOS_POINTS).copied().collect()
    }

    fn from_core(core: DeviceCore) -> Self {
        Self {
            audio: Audio::from_core(core),
        }
    }

    fn core(&self) -> &DeviceCore {
        self.audio.core()
    }
}

impl SonosAudio {
    /// The embedded audio capability.
    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    pub fn has_cover(&self) -> bool {
        self.core().has(COVER)
    }

    pub fn has_volume_shift(&self) -> bool {
        self.core().has(SHIFT_VOLUME)
    }

    /// Relative volume change by -100–100 percent.
    pub async fn shift_volume(&self, percent: f64) -> Result<(), CoreError> {
        self.core().push(SHIFT_VOLUME, &Value::Float(percent)).await
    }

    /// Cover art URL of the current track.
    pub async fn cover(&self) -> Option<String> {
        self.core().text_value(COVER).await
    }

    pub async fn zone_name(&self) -> Option<String> {
        self.core().text_value(ZONE_NAME).await
    }

    pub async fn valid_play_modes(&self) -> Option<String> {
        self.core().text_value(VALID_PLAY_MODES).await
    }

    pub async fn transport_actions(&self) -> Option<String> {
        self.core().text_value(TRANSPORT_ACTIONS).await
    }
}
