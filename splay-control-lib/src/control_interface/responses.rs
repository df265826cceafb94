//! Successful answers, one shape per command.
//!
//! `result` is optional on the wire; by the time a response is deserialized
//! the dispatcher has already ruled out failures, so a missing `result`
//! reads as `true`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{
    Cue, CueInfo, CueListing, Event, Interface, Network, Playlist, PlaylistSummary, StorageSet,
    Trigger,
};

fn succeeded() -> bool {
    true
}

/// Plain acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default = "succeeded")]
    pub result: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub playlist: Playlist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistsResponse {
    pub playlists: Vec<PlaylistSummary>,
}

/// Answer to `SaveCue` and `DuplicateCue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueInfoResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub cue: CueInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub cue: Cue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuesResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub cues: Vec<CueListing>,
}

/// The setting's current value, encoded by the device as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub setting: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub trigger: Trigger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggersResponse {
    pub triggers: Vec<Trigger>,
}

/// Master fader level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub interface: Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfacesResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub interfaces: Vec<Interface>,
}

/// Engine version string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub network: Network,
}

/// System time, timezone and NTP server. The device's layout for this is
/// undocumented, so it is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeResponse {
    pub time: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragesResponse {
    #[serde(default = "succeeded")]
    pub result: bool,
    pub storages: StorageSet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_result_reads_as_success() {
        let ack: Ack = serde_json::from_value(json!({})).unwrap();
        assert!(ack.result);

        let version: VersionResponse =
            serde_json::from_value(json!({ "version": "2.4.1" })).unwrap();
        assert!(version.result);
        assert_eq!(version.version, "2.4.1");
    }

    #[test]
    fn test_storages() {
        let storages: StoragesResponse = serde_json::from_value(json!({
            "result": true,
            "storages": {
                "available": [
                    { "free": 100, "storage": "internal", "total": 512 },
                    { "free": 9000, "storage": "sd", "total": 16000 }
                ],
                "selected": "sd"
            }
        }))
        .unwrap();
        assert_eq!(storages.storages.available.len(), 2);
        assert_eq!(storages.storages.selected, "sd");
    }

    #[test]
    fn test_time_is_passed_through() {
        let time: TimeResponse = serde_json::from_value(json!({ "time": [null] })).unwrap();
        assert_eq!(time.time, json!([null]));
    }

    #[test]
    fn test_fractional_intensity() {
        let master: IntensityResponse =
            serde_json::from_value(json!({ "result": true, "intensity": 42.5 })).unwrap();
        assert_eq!(master.intensity, 42.5);

        let whole: IntensityResponse = serde_json::from_value(json!({ "intensity": 80 })).unwrap();
        assert_eq!(whole.intensity, 80.0);
    }
}
