/// Declares an enum the device carries as a bare integer.
///
/// Generates the `u8` conversions and serde impls that read and write the
/// code instead of the variant name. A closing `_ => Other` arm adds a
/// variant that keeps codes outside the table; without it unknown codes
/// fail to deserialize.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident = $code:literal,)*
            _ => $other:ident,
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)*
            /// A code this library does not know.
            $other(u8),
        }

        impl $name {
            /// Every known variant, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)*
                    $name::$other(code) => code,
                }
            }

            pub fn from_code(code: u8) -> Self {
                match code {
                    $($code => $name::$variant,)*
                    other => $name::$other(other),
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(code: u8) -> std::result::Result<Self, u8> {
                match $name::from_code(code) {
                    $name::$other(code) => Err(code),
                    known => Ok(known),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                <u8 as ::serde::Deserialize>::deserialize(deserializer).map($name::from_code)
            }
        }
    };
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident = $code:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$variant_meta])* $variant = $code,)*
        }

        impl $name {
            /// Every variant, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            pub fn code(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(code: u8) -> std::result::Result<Self, u8> {
                match code {
                    $($code => Ok($name::$variant),)*
                    other => Err(other),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                $crate::control_interface::model::deserialize_code(deserializer, stringify!($name))
            }
        }
    };
}

pub mod commands;
pub mod model;
pub mod responses;

use serde_json::{Map, Value};

use crate::util::config::ClientConfig;
use crate::util::dispatch::Dispatcher;
use crate::util::error::Result;
use crate::util::traits::Command;
use commands::*;
use model::{
    Cue, CueSelector, Event, Interface, Network, Playlist, PlaylistOrder, Setting, SettingUpdate,
    Trigger, TriggerCondition, UniverseType,
};
use responses::*;

/// Client for one S-Play device.
///
/// Every call is independent: unless a token is passed in, each one performs
/// its own WebSocket handshake before posting the command. Cloning is cheap
/// and clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct ControlInterface {
    config: ClientConfig,
    dispatcher: Dispatcher,
}

impl ControlInterface {
    /// A client for `host` on the default port with the default timeout.
    pub fn new(host: &str) -> Self {
        Self::with_config(ClientConfig::new(host))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let dispatcher = Dispatcher::new(&config);
        ControlInterface { config, dispatcher }
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_verbose(&self) -> bool {
        self.config.verbose
    }

    /// Runs a handshake and returns the session token without sending anything.
    ///
    /// Pass the token to [`ControlInterface::send_command_with_token`] to
    /// issue several commands over one handshake.
    pub async fn acquire_token(&self) -> Result<String> {
        self.dispatcher.token_acquirer().acquire().await
    }

    /// Sends any command, handshaking first.
    pub async fn send_command<C: Command>(&self, command: &C) -> Result<C::Response> {
        self.dispatcher.dispatch(command, None).await
    }

    pub async fn send_command_with_token<C: Command>(
        &self,
        command: &C,
        token: &str,
    ) -> Result<C::Response> {
        self.dispatcher.dispatch(command, Some(token)).await
    }

    /// Sends a command and returns the device's answer as parsed JSON,
    /// without matching it against the command's response type.
    pub async fn send_command_value<C: Command>(
        &self,
        command: &C,
        token: Option<&str>,
    ) -> Result<Map<String, Value>> {
        self.dispatcher.dispatch_value(command, token).await
    }

    // Playlists

    pub async fn play(&self, playlist_id: i64) -> Result<Ack> {
        self.send_command(&Play { playlist_id }).await
    }

    pub async fn pause(&self, playlist_id: i64) -> Result<Ack> {
        self.send_command(&Pause { playlist_id }).await
    }

    pub async fn stop(&self, playlist_id: i64) -> Result<Ack> {
        self.send_command(&Stop { playlist_id }).await
    }

    pub async fn get_playlist(&self, playlist_id: i64) -> Result<PlaylistResponse> {
        self.send_command(&GetPlaylist { playlist_id }).await
    }

    pub async fn update_playlists_order(&self, orders: Vec<PlaylistOrder>) -> Result<Ack> {
        self.send_command(&UpdatePlaylistsOrder { orders }).await
    }

    pub async fn play_all_playlists(&self) -> Result<Ack> {
        self.send_command(&PlayAllPlaylists {}).await
    }

    pub async fn pause_all_playlists(&self) -> Result<Ack> {
        self.send_command(&PauseAllPlaylists {}).await
    }

    pub async fn stop_all_playlists(&self) -> Result<Ack> {
        self.send_command(&StopAllPlaylists {}).await
    }

    pub async fn get_all_playlists(&self) -> Result<PlaylistsResponse> {
        self.send_command(&GetAllPlaylists {}).await
    }

    pub async fn set_playlist_intensity(&self, playlist_id: i64, intensity: i64) -> Result<Ack> {
        self.send_command(&SetPlaylistIntensity {
            playlist_id,
            intensity,
        })
        .await
    }

    /// Creates the playlist when `playlist.playlist_id` is `None`, replaces it otherwise.
    pub async fn update_playlist(&self, playlist: Playlist) -> Result<Playlist> {
        self.send_command(&UpdatePlaylist { playlist }).await
    }

    pub async fn delete_playlist(&self, playlist_id: i64) -> Result<Ack> {
        self.send_command(&DeletePlaylist { playlist_id }).await
    }

    /// Moves the playhead of a playlist.
    ///
    /// # Arguments
    /// - `position`: Offset from the start, in milliseconds.
    pub async fn set_playlist_time_position(&self, playlist_id: i64, position: i64) -> Result<Ack> {
        self.send_command(&SetPlaylistTimePosition {
            playlist_id,
            position,
        })
        .await
    }

    // Recording

    pub async fn capture_dmx_frame(
        &self,
        cue_id: i64,
        universe_type: UniverseType,
        universes: Vec<u16>,
    ) -> Result<Ack> {
        self.send_command(&CaptureDmxFrame {
            cue_id,
            universe_type,
            universes,
        })
        .await
    }

    /// Starts recording into `cue_id`. Recording runs until [`ControlInterface::stop_record`].
    ///
    /// # Arguments
    /// - `live_preview`: Pass the incoming levels through to the outputs while recording.
    /// - `looped`: Mark the recorded cue as looping.
    /// - `trigger`: Condition that starts the recording.
    pub async fn record_dmx_frame(
        &self,
        cue_id: i64,
        live_preview: bool,
        looped: bool,
        trigger: TriggerCondition,
        universe_type: UniverseType,
        universes: Vec<u16>,
    ) -> Result<Ack> {
        self.send_command(&RecordDmxFrame {
            cue_id,
            live_preview,
            looped,
            trigger,
            universe_type,
            universes,
        })
        .await
    }

    pub async fn stop_record(&self) -> Result<Ack> {
        self.send_command(&StopRecord {}).await
    }

    // Cues

    pub async fn save_cue(&self, cue: Cue) -> Result<CueInfoResponse> {
        self.send_command(&SaveCue { cue }).await
    }

    pub async fn delete_cue(&self, cue_id: i64) -> Result<Ack> {
        self.send_command(&DeleteCue { cue_id }).await
    }

    pub async fn play_cue(&self, cue: CueSelector) -> Result<Ack> {
        self.send_command(&PlayCue { cue }).await
    }

    pub async fn pause_cue(&self, cue_id: i64) -> Result<Ack> {
        self.send_command(&PauseCue { cue_id }).await
    }

    pub async fn stop_cue(&self, cue_id: i64) -> Result<Ack> {
        self.send_command(&StopCue { cue_id }).await
    }

    pub async fn get_cue(&self, cue_id: i64) -> Result<CueResponse> {
        self.send_command(&GetCue { cue_id }).await
    }

    pub async fn get_all_cues(&self) -> Result<CuesResponse> {
        self.send_command(&GetAllCues {}).await
    }

    pub async fn exit_cue_edit(&self) -> Result<Ack> {
        self.send_command(&ExitCueEdit {}).await
    }

    pub async fn duplicate_cue(&self, cue_id: i64) -> Result<CueInfoResponse> {
        self.send_command(&DuplicateCue { cue_id }).await
    }

    // Settings

    pub async fn update_setting(&self, setting: SettingUpdate) -> Result<Ack> {
        self.send_command(&UpdateSetting { setting }).await
    }

    pub async fn get_setting(&self, setting_id: Setting) -> Result<SettingResponse> {
        self.send_command(&GetSetting { setting_id }).await
    }

    // Events

    pub async fn get_event(&self, event_id: i64) -> Result<EventResponse> {
        self.send_command(&GetEvent { event_id }).await
    }

    pub async fn get_all_events(&self) -> Result<EventsResponse> {
        self.send_command(&GetAllEvents {}).await
    }

    pub async fn update_event(&self, event: Event) -> Result<EventResponse> {
        self.send_command(&UpdateEvent { event }).await
    }

    pub async fn delete_event(&self, event_id: i64) -> Result<Ack> {
        self.send_command(&DeleteEvent { event_id }).await
    }

    pub async fn send_event(&self, event: Event) -> Result<Ack> {
        self.send_command(&SendEvent { event }).await
    }

    // Triggers

    pub async fn get_trigger(&self, trigger_id: i64) -> Result<TriggerResponse> {
        self.send_command(&GetTrigger { trigger_id }).await
    }

    pub async fn get_all_triggers(&self) -> Result<TriggersResponse> {
        self.send_command(&GetAllTriggers {}).await
    }

    pub async fn update_trigger(&self, trigger: Trigger) -> Result<TriggerResponse> {
        self.send_command(&UpdateTrigger { trigger }).await
    }

    pub async fn delete_trigger(&self, trigger_id: i64) -> Result<Ack> {
        self.send_command(&DeleteTrigger { trigger_id }).await
    }

    pub async fn wait_trigger(&self, trigger: Trigger) -> Result<Ack> {
        self.send_command(&WaitTrigger { trigger }).await
    }

    /// Polls the trigger armed by [`ControlInterface::wait_trigger`].
    ///
    /// A trigger that has not fired yet comes back as
    /// [`Error::UnknownDeviceFailure`](crate::util::error::Error::UnknownDeviceFailure),
    /// since the device answers `result: false` without a reason.
    pub async fn check_trigger(&self) -> Result<Ack> {
        self.send_command(&CheckTrigger {}).await
    }

    // Master

    pub async fn get_master_intensity(&self) -> Result<IntensityResponse> {
        self.send_command(&GetMasterIntensity {}).await
    }

    pub async fn set_master_intensity(&self, intensity: i64) -> Result<Ack> {
        self.send_command(&SetMasterIntensity { intensity }).await
    }

    // Interfaces

    pub async fn get_interface(&self, interface_id: i64) -> Result<InterfaceResponse> {
        self.send_command(&GetInterface { interface_id }).await
    }

    pub async fn get_all_interfaces(&self) -> Result<InterfacesResponse> {
        self.send_command(&GetAllInterfaces {}).await
    }

    pub async fn update_interface(&self, interface: Interface) -> Result<InterfaceResponse> {
        self.send_command(&UpdateInterface { interface }).await
    }

    pub async fn delete_interface(&self, interface_id: i64) -> Result<Ack> {
        self.send_command(&DeleteInterface { interface_id }).await
    }

    // System

    pub async fn get_version(&self) -> Result<VersionResponse> {
        self.send_command(&GetVersion {}).await
    }

    pub async fn get_network(&self) -> Result<NetworkResponse> {
        self.send_command(&GetNetwork {}).await
    }

    pub async fn set_network(&self, network: Network) -> Result<Ack> {
        self.send_command(&SetNetwork { network }).await
    }

    pub async fn get_time(&self) -> Result<TimeResponse> {
        self.send_command(&GetTime {}).await
    }

    /// The payload is forwarded unchanged; its layout is up to the device.
    pub async fn set_time(&self, time: Value) -> Result<Ack> {
        self.send_command(&SetTime { time }).await
    }

    pub async fn get_storages(&self) -> Result<StoragesResponse> {
        self.send_command(&GetStorages {}).await
    }

    pub async fn set_storage(&self, storage: &str) -> Result<Ack> {
        self.send_command(&SetStorage {
            storage: storage.to_string(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_new_uses_defaults() {
        let control = ControlInterface::new("192.168.0.20");
        assert_eq!(control.host(), "192.168.0.20");
        assert_eq!(control.config().port, 55555);
        assert_eq!(control.config().timeout, Duration::from_millis(2000));
        assert!(!control.is_verbose());
    }

    #[test]
    fn test_with_config() {
        let config = ClientConfig::new("splay.local")
            .with_port(8000)
            .with_verbose(true);
        let control = ControlInterface::with_config(config.clone());
        assert_eq!(control.config(), &config);
        assert!(control.is_verbose());
        assert_eq!(control.clone().host(), "splay.local");
    }

    #[test]
    fn test_is_shareable() {
        assert_send_sync::<ControlInterface>();
    }
}
