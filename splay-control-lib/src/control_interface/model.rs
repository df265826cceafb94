//! Records exchanged with the device: playlists, cues, triggers, events and settings.
//!
//! Field names follow the device's JSON. Enumerations the device sends as
//! integers are declared with `wire_enum!`.

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

wire_enum! {
    /// Identifiers of the device's persistent settings.
    pub enum Setting {
        IsSpare = 0,
        SystemName = 1,
        PlaybackConfig = 2,
        Password = 3,
        HelpHints = 4,
        SerialNo = 5,
        EnablePassword = 6,
        Smtp = 7,
        Email = 8,
        Input = 9,
        Output = 10,
        Dmx = 11,
        ArtNet = 12,
        Sacn = 13,
        Location = 14,
        Ntp = 15,
        BasePath = 16,
        CuePath = 17,
        HomeInterface = 18,
        Udp = 19,
        Tcp = 20,
        Rs232c = 21,
        Osc = 22,
        Ieee1588Config = 23,
        Ieee1588Active = 24,
        LockStatus = 25,
        DbVersion = 26,
    }
}

wire_enum! {
    pub enum PlaylistStatus {
        Idle = 0,
        Playing = 1,
        Paused = 2,
        Stopped = 3,
        Stopping = 4,
        Error = 5,
        _ => Other,
    }
}

wire_enum! {
    /// What a [`TriggerCondition`] listens to.
    pub enum TriggerType {
        None = 0,
        Osc = 1,
        Rs232 = 2,
        Io = 3,
        ArtNet = 4,
        Dmx = 5,
        Sacn = 6,
        Powerup = 7,
        Udp = 8,
        Button = 9,
        _ => Other,
    }
}

wire_enum! {
    /// What an [`EventAction`] emits.
    pub enum EventType {
        None = 0,
        Rs232 = 1,
        Io = 2,
        ArtNet = 3,
        Dmx = 4,
        Sacn = 5,
        Osc = 6,
        Udp = 7,
        _ => Other,
    }
}

wire_enum! {
    pub enum CueType {
        Static = 0,
        Dynamic = 1,
        Effect = 2,
        _ => Other,
    }
}

wire_enum! {
    /// Source protocol for DMX capture and recording.
    pub enum UniverseType {
        Dmx = 0,
        ArtNet = 1,
        Sacn = 2,
        None = 3,
        _ => Other,
    }
}

impl Default for TriggerType {
    fn default() -> Self {
        TriggerType::None
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetType {
    Unicast,
    Broadcast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OscDataType {
    String,
    Int,
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscTrigger {
    pub address: String,
    pub data_type: OscDataType,
    pub net_type: NetType,
    pub port: u16,
}

/// Matches or emits a raw serial string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialData {
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoTrigger {
    pub data: u8,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtNetTrigger {
    pub channel: u16,
    pub universe: u16,
    /// Trigger level.
    pub value: u8,
    pub net_type: NetType,
}

/// A channel level on a DMX or sACN universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelLevel {
    pub channel: u16,
    pub universe: u16,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdpTrigger {
    pub ip: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonTrigger {
    pub data: u8,
}

/// The condition half of a trigger, `{"type": <TriggerType>, "value": ...}` on the wire.
///
/// A missing `type` reads as [`TriggerCondition::None`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawVariant<TriggerType>")]
pub enum TriggerCondition {
    #[default]
    None,
    Osc(OscTrigger),
    Rs232(SerialData),
    Io(IoTrigger),
    ArtNet(ArtNetTrigger),
    Dmx(ChannelLevel),
    Sacn(ChannelLevel),
    Powerup,
    Udp(UdpTrigger),
    Button(ButtonTrigger),
    /// A trigger type this library does not know, with its payload as sent.
    Other { code: u8, value: Value },
}

impl TriggerCondition {
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            TriggerCondition::None => TriggerType::None,
            TriggerCondition::Osc(_) => TriggerType::Osc,
            TriggerCondition::Rs232(_) => TriggerType::Rs232,
            TriggerCondition::Io(_) => TriggerType::Io,
            TriggerCondition::ArtNet(_) => TriggerType::ArtNet,
            TriggerCondition::Dmx(_) => TriggerType::Dmx,
            TriggerCondition::Sacn(_) => TriggerType::Sacn,
            TriggerCondition::Powerup => TriggerType::Powerup,
            TriggerCondition::Udp(_) => TriggerType::Udp,
            TriggerCondition::Button(_) => TriggerType::Button,
            TriggerCondition::Other { code, .. } => TriggerType::Other(*code),
        }
    }
}

impl Serialize for TriggerCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TriggerCondition", 2)?;
        state.serialize_field("type", &self.trigger_type())?;
        match self {
            TriggerCondition::None | TriggerCondition::Powerup => {
                state.serialize_field("value", &())?
            }
            TriggerCondition::Osc(value) => state.serialize_field("value", value)?,
            TriggerCondition::Rs232(value) => state.serialize_field("value", value)?,
            TriggerCondition::Io(value) => state.serialize_field("value", value)?,
            TriggerCondition::ArtNet(value) => state.serialize_field("value", value)?,
            TriggerCondition::Dmx(value) => state.serialize_field("value", value)?,
            TriggerCondition::Sacn(value) => state.serialize_field("value", value)?,
            TriggerCondition::Udp(value) => state.serialize_field("value", value)?,
            TriggerCondition::Button(value) => state.serialize_field("value", value)?,
            TriggerCondition::Other { value, .. } => state.serialize_field("value", value)?,
        }
        state.end()
    }
}

impl TryFrom<RawVariant<TriggerType>> for TriggerCondition {
    type Error = serde_json::Error;

    fn try_from(raw: RawVariant<TriggerType>) -> Result<Self, Self::Error> {
        let value = raw.value;
        Ok(match raw.kind {
            TriggerType::None => TriggerCondition::None,
            TriggerType::Osc => TriggerCondition::Osc(serde_json::from_value(value)?),
            TriggerType::Rs232 => TriggerCondition::Rs232(serde_json::from_value(value)?),
            TriggerType::Io => TriggerCondition::Io(serde_json::from_value(value)?),
            TriggerType::ArtNet => TriggerCondition::ArtNet(serde_json::from_value(value)?),
            TriggerType::Dmx => TriggerCondition::Dmx(serde_json::from_value(value)?),
            TriggerType::Sacn => TriggerCondition::Sacn(serde_json::from_value(value)?),
            TriggerType::Powerup => TriggerCondition::Powerup,
            TriggerType::Udp => TriggerCondition::Udp(serde_json::from_value(value)?),
            TriggerType::Button => TriggerCondition::Button(serde_json::from_value(value)?),
            TriggerType::Other(code) => TriggerCondition::Other { code, value },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscEvent {
    pub address: String,
    pub ip: String,
    pub data: String,
    pub data_type: OscDataType,
    pub net_type: NetType,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoEvent {
    pub output: u8,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtNetEvent {
    pub channel: u16,
    pub ip: String,
    pub universe: u16,
    pub value: u8,
    pub net_type: NetType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SacnEvent {
    pub channel: u16,
    pub ip: String,
    pub universe: u16,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UdpEvent {
    pub ip: String,
    pub port: u16,
    pub value: String,
}

/// The output half of an event, `{"type": <EventType>, "value": ...}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawVariant<EventType>")]
pub enum EventAction {
    #[default]
    None,
    Rs232(SerialData),
    Io(IoEvent),
    ArtNet(ArtNetEvent),
    Dmx(ChannelLevel),
    Sacn(SacnEvent),
    Osc(OscEvent),
    Udp(UdpEvent),
    Other { code: u8, value: Value },
}

impl EventAction {
    pub fn event_type(&self) -> EventType {
        match self {
            EventAction::None => EventType::None,
            EventAction::Rs232(_) => EventType::Rs232,
            EventAction::Io(_) => EventType::Io,
            EventAction::ArtNet(_) => EventType::ArtNet,
            EventAction::Dmx(_) => EventType::Dmx,
            EventAction::Sacn(_) => EventType::Sacn,
            EventAction::Osc(_) => EventType::Osc,
            EventAction::Udp(_) => EventType::Udp,
            EventAction::Other { code, .. } => EventType::Other(*code),
        }
    }
}

impl Serialize for EventAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EventAction", 2)?;
        state.serialize_field("type", &self.event_type())?;
        match self {
            EventAction::None => state.serialize_field("value", &())?,
            EventAction::Rs232(value) => state.serialize_field("value", value)?,
            EventAction::Io(value) => state.serialize_field("value", value)?,
            EventAction::ArtNet(value) => state.serialize_field("value", value)?,
            EventAction::Dmx(value) => state.serialize_field("value", value)?,
            EventAction::Sacn(value) => state.serialize_field("value", value)?,
            EventAction::Osc(value) => state.serialize_field("value", value)?,
            EventAction::Udp(value) => state.serialize_field("value", value)?,
            EventAction::Other { value, .. } => state.serialize_field("value", value)?,
        }
        state.end()
    }
}

impl TryFrom<RawVariant<EventType>> for EventAction {
    type Error = serde_json::Error;

    fn try_from(raw: RawVariant<EventType>) -> Result<Self, Self::Error> {
        let value = raw.value;
        Ok(match raw.kind {
            EventType::None => EventAction::None,
            EventType::Rs232 => EventAction::Rs232(serde_json::from_value(value)?),
            EventType::Io => EventAction::Io(serde_json::from_value(value)?),
            EventType::ArtNet => EventAction::ArtNet(serde_json::from_value(value)?),
            EventType::Dmx => EventAction::Dmx(serde_json::from_value(value)?),
            EventType::Sacn => EventAction::Sacn(serde_json::from_value(value)?),
            EventType::Osc => EventAction::Osc(serde_json::from_value(value)?),
            EventType::Udp => EventAction::Udp(serde_json::from_value(value)?),
            EventType::Other(code) => EventAction::Other { code, value },
        })
    }
}

/// `{"type": .., "value": ..}` before the payload is interpreted.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de> + Default"))]
pub struct RawVariant<K> {
    #[serde(rename = "type", default)]
    kind: K,
    #[serde(default)]
    value: Value,
}

/// A stored trigger. `trigger_id == -1` stands for "no trigger".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub trigger_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub condition: TriggerCondition,
}

impl Trigger {
    /// The placeholder the device uses where a playlist has no start or stop trigger.
    pub fn none() -> Self {
        Trigger {
            trigger_id: -1,
            name: String::new(),
            start: None,
            active: None,
            condition: TriggerCondition::None,
        }
    }
}

/// A stored event. `event_id == -1` stands for "no event".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(flatten)]
    pub action: EventAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    #[serde(rename = "in")]
    pub fade_in: f64,
    #[serde(rename = "out")]
    pub fade_out: f64,
}

/// A cue placed on a playlist track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCue {
    pub cue_id: i64,
    pub duration: f64,
    pub fade: Fade,
    pub start: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cue_type: Option<CueType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub cues: Vec<TrackCue>,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerLane {
    pub triggers: Vec<Trigger>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventLane {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub trigger: TriggerLane,
    pub event: EventLane,
    pub track1: Track,
    pub track2: Track,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track3: Option<Track>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track4: Option<Track>,
}

/// The playlist fields listed by `GetAllPlaylists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub playlist_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<f64>,
    pub duration: f64,
    pub group: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_from_home: Option<bool>,
    pub intensity: f64,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlaylistStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_triggers: Option<bool>,
}

/// A complete playlist, as returned by `GetPlaylist` and accepted by `UpdatePlaylist`.
///
/// Leave `playlist_id` empty to have the device create a new playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<f64>,
    pub duration: f64,
    pub group: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_from_home: Option<bool>,
    pub intensity: f64,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PlaylistStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_triggers: Option<bool>,
    pub fade_in: f64,
    pub fade_out: f64,
    #[serde(rename = "loop")]
    pub loop_count: i64,
    pub priority: i64,
    pub start_trigger: Trigger,
    pub stop_trigger: Trigger,
    pub timeline: Timeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistOrder {
    pub playlist_id: i64,
    pub order: i64,
}

/// One frame of DMX channel levels.
pub type Frame = Vec<u8>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueConfig {
    pub ch_start: u16,
    pub ch_stop: u16,
    pub source: i64,
    pub universes: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<TriggerCondition>,
}

/// A cue without its recorded frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueInfo {
    pub config: CueConfig,
    pub cue_id: i64,
    pub duration: f64,
    pub name: String,
    #[serde(rename = "type")]
    pub cue_type: CueType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    #[serde(flatten)]
    pub info: CueInfo,
    pub frames: Vec<Frame>,
}

/// An entry of the `GetAllCues` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueListing {
    pub cue_id: i64,
    pub duration: f64,
    /// Some firmware sends the name as a number; it is kept as its decimal text.
    #[serde(deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(rename = "type")]
    pub cue_type: CueType,
}

/// Which cue `PlayCue` should play.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CueSelector {
    Stored { cue_id: i64 },
    /// An unsaved cue sent along with the command; its `cue_id` is always 0.
    Inline(Cue),
}

impl CueSelector {
    pub fn stored(cue_id: i64) -> Self {
        CueSelector::Stored { cue_id }
    }

    pub fn inline(mut cue: Cue) -> Self {
        cue.info.cue_id = 0;
        CueSelector::Inline(cue)
    }
}

/// A control page hosted by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub config: String,
    pub interface_id: i64,
    pub name: String,
    pub url: String,
    pub widgets: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub dhcp: bool,
    pub gateway: String,
    pub ip: String,
    pub mac: String,
    pub mask: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    pub free: i64,
    pub storage: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSet {
    pub available: Vec<Storage>,
    pub selected: String,
}

/// A new value for one setting. The value's shape depends on the setting
/// and is not checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingUpdate {
    pub setting_id: Setting,
    pub value: Value,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::String(text) => text,
        Text::Number(number) => number.to_string(),
    })
}

/// Reads a wire enum from its integer code.
pub(crate) fn deserialize_code<'de, D, T>(deserializer: D, kind: &str) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u8, Error = u8>,
{
    let code = u8::deserialize(deserializer)?;
    T::try_from(code).map_err(|code| D::Error::custom(format!("unknown {} code {}", kind, code)))
}
