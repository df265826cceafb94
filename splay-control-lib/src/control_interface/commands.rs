//! The device's command catalog.
//!
//! Every command is a struct whose fields are sent next to its `command`
//! code. The code enum, the structs and their response types all come out of
//! the single table below, so a code cannot exist without both a request and
//! a response shape.

use serde::Serialize;
use serde_json::Value;

use super::model::{
    Cue, CueSelector, Event, Interface, Network, Playlist, PlaylistOrder, Setting, SettingUpdate,
    Trigger, TriggerCondition, UniverseType,
};
use super::responses::{
    Ack, CueInfoResponse, CueResponse, CuesResponse, EventResponse, EventsResponse,
    IntensityResponse, InterfaceResponse, InterfacesResponse, NetworkResponse, PlaylistResponse,
    PlaylistsResponse, SettingResponse, StoragesResponse, TimeResponse, TriggerResponse,
    TriggersResponse, VersionResponse,
};
use crate::util::traits::Command;

macro_rules! command_table {
    ($(
        $(#[$meta:meta])*
        $name:ident = $code:literal {
            $($(#[$field_meta:meta])* $field:ident : $field_ty:ty),* $(,)?
        } => $response:ty
    ),* $(,)?) => {
        wire_enum! {
            /// Discriminants of the commands this crate can send.
            pub enum CommandType {
                $($name = $code,)*
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Serialize)]
            pub struct $name {
                $($(#[$field_meta])* pub $field: $field_ty,)*
            }

            impl Command for $name {
                const TYPE: CommandType = CommandType::$name;
                type Response = $response;
            }
        )*
    };
}

command_table! {
    Play = 0 { playlist_id: i64 } => Ack,
    Pause = 1 { playlist_id: i64 } => Ack,
    Stop = 2 { playlist_id: i64 } => Ack,
    GetPlaylist = 3 { playlist_id: i64 } => PlaylistResponse,
    /// Reorders the playlists shown on the device's home page.
    UpdatePlaylistsOrder = 4 { orders: Vec<PlaylistOrder> } => Ack,
    PlayAllPlaylists = 5 {} => Ack,
    PauseAllPlaylists = 6 {} => Ack,
    StopAllPlaylists = 7 {} => Ack,
    GetAllPlaylists = 8 {} => PlaylistsResponse,
    SetPlaylistIntensity = 9 { playlist_id: i64, intensity: i64 } => Ack,
    /// Grabs a single DMX frame into a cue.
    CaptureDmxFrame = 13 {
        cue_id: i64,
        universe_type: UniverseType,
        universes: Vec<u16>,
    } => Ack,
    /// Starts recording DMX into a cue until `StopRecord`.
    RecordDmxFrame = 14 {
        cue_id: i64,
        live_preview: bool,
        #[serde(rename = "loop")]
        looped: bool,
        trigger: TriggerCondition,
        universe_type: UniverseType,
        universes: Vec<u16>,
    } => Ack,
    StopRecord = 15 {} => Ack,
    SaveCue = 16 { cue: Cue } => CueInfoResponse,
    DeleteCue = 17 { cue_id: i64 } => Ack,
    /// Creates or replaces a playlist. The device answers with the stored
    /// playlist itself rather than a wrapper.
    UpdatePlaylist = 18 { playlist: Playlist } => Playlist,
    DeletePlaylist = 19 { playlist_id: i64 } => Ack,
    UpdateSetting = 20 { setting: SettingUpdate } => Ack,
    GetSetting = 21 { setting_id: Setting } => SettingResponse,
    /// Seeks a playlist; `position` is in milliseconds.
    SetPlaylistTimePosition = 22 { playlist_id: i64, position: i64 } => Ack,
    PlayCue = 25 { cue: CueSelector } => Ack,
    PauseCue = 26 { cue_id: i64 } => Ack,
    StopCue = 27 { cue_id: i64 } => Ack,
    GetCue = 28 { cue_id: i64 } => CueResponse,
    GetAllCues = 29 {} => CuesResponse,
    ExitCueEdit = 30 {} => Ack,
    DuplicateCue = 31 { cue_id: i64 } => CueInfoResponse,
    GetEvent = 36 { event_id: i64 } => EventResponse,
    GetAllEvents = 37 {} => EventsResponse,
    UpdateEvent = 38 { event: Event } => EventResponse,
    DeleteEvent = 39 { event_id: i64 } => Ack,
    GetTrigger = 40 { trigger_id: i64 } => TriggerResponse,
    GetAllTriggers = 41 {} => TriggersResponse,
    UpdateTrigger = 42 { trigger: Trigger } => TriggerResponse,
    DeleteTrigger = 43 { trigger_id: i64 } => Ack,
    /// Fires an event immediately.
    SendEvent = 44 { event: Event } => Ack,
    /// Arms the device to report when the trigger's condition is met.
    WaitTrigger = 45 { trigger: Trigger } => Ack,
    /// Asks whether the armed trigger fired. `result: false` means it has not.
    CheckTrigger = 46 {} => Ack,
    GetMasterIntensity = 55 {} => IntensityResponse,
    SetMasterIntensity = 56 { intensity: i64 } => Ack,
    GetInterface = 70 { interface_id: i64 } => InterfaceResponse,
    GetAllInterfaces = 71 {} => InterfacesResponse,
    UpdateInterface = 72 { interface: Interface } => InterfaceResponse,
    DeleteInterface = 73 { interface_id: i64 } => Ack,
    GetVersion = 80 {} => VersionResponse,
    GetNetwork = 81 {} => NetworkResponse,
    SetNetwork = 82 { network: Network } => Ack,
    GetTime = 83 {} => TimeResponse,
    /// The time payload is forwarded as given.
    SetTime = 84 { time: Value } => Ack,
    GetStorages = 85 {} => StoragesResponse,
    /// Selects the storage the device plays from, by name.
    SetStorage = 86 { storage: String } => Ack,
}

wire_enum! {
    /// Codes the device defines but this crate deliberately does not send.
    ///
    /// Some are unimplemented on the device, the rest have unknown semantics
    /// or are destructive. They have no command struct and cannot be
    /// dispatched.
    pub enum ReservedCommand {
        GetPlaylistIntensity = 10,
        SetTrackIntensity = 11,
        GetTrackIntensity = 12,
        SetWebsocketInput = 23,
        UpdateStoragePath = 34,
        UdpMessage = 50,
        OscMessage = 51,
        GetSchedules = 60,
        UpdateSchedule = 61,
        DeleteSchedule = 62,
        EnableSchedule = 63,
        FactoryReset = 87,
        RefreshSetting = 254,
    }
}
