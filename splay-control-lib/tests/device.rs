mod common;

use std::time::Duration;

use serde_json::{json, Value};
use splay_control_lib::control_interface::commands::{CommandType, GetVersion};
use splay_control_lib::util::envelope::{Envelope, EnvelopeHeader};
use splay_control_lib::control_interface::model::PlaylistStatus;
use splay_control_lib::{ClientConfig, ControlInterface, Error, Phase};
use tokio::net::TcpListener;

use common::{FakeDevice, Greeting};

const VERSION_REPLY: &str = r#"{"result":true,"version":"1.8.2"}"#;

fn token(value: &str) -> Greeting {
    Greeting::Token(value.to_string())
}

#[tokio::test]
async fn test_command_round_trip() {
    let device = FakeDevice::start(token("tok-1"), r#"{"result":true,"intensity":42}"#).await;
    let control = ControlInterface::with_config(device.config());

    let master = control.get_master_intensity().await.unwrap();
    assert_eq!(master.intensity, 42.0);
    assert_eq!(device.handshakes(), 1);

    let requests = device.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.authorization.as_deref(), Some("tok-1"));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        request.content_length.as_deref(),
        Some(request.body.len().to_string().as_str())
    );
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, json!({ "command": 55 }));
}

#[tokio::test]
async fn test_command_fields_reach_the_device() {
    let device = FakeDevice::start(token("tok-2"), r#"{"result":true}"#).await;
    let control = ControlInterface::with_config(device.config());

    let ack = control.set_playlist_intensity(4, 80).await.unwrap();
    assert!(ack.result);

    let body: Value = serde_json::from_str(&device.requests()[0].body).unwrap();
    assert_eq!(
        body,
        json!({ "command": 9, "playlist_id": 4, "intensity": 80 })
    );
}

#[tokio::test]
async fn test_every_call_handshakes() {
    let device = FakeDevice::start(token("tok-3"), VERSION_REPLY).await;
    let control = ControlInterface::with_config(device.config());

    assert_eq!(control.get_version().await.unwrap().version, "1.8.2");
    assert_eq!(control.get_version().await.unwrap().version, "1.8.2");

    assert_eq!(device.handshakes(), 2);
    assert_eq!(device.requests().len(), 2);
}

#[tokio::test]
async fn test_explicit_token_skips_handshake() {
    let device = FakeDevice::start(token("unused"), VERSION_REPLY).await;
    let control = ControlInterface::with_config(device.config());

    let version = control
        .send_command_with_token(&GetVersion {}, "mine")
        .await
        .unwrap();
    assert_eq!(version.version, "1.8.2");
    assert_eq!(device.handshakes(), 0);
    assert_eq!(device.requests()[0].authorization.as_deref(), Some("mine"));
}

#[tokio::test]
async fn test_acquired_token_can_be_reused() {
    let device = FakeDevice::start(token("shared"), VERSION_REPLY).await;
    let control = ControlInterface::with_config(device.config());

    let token = control.acquire_token().await.unwrap();
    assert_eq!(token, "shared");
    for _ in 0..3 {
        control
            .send_command_with_token(&GetVersion {}, &token)
            .await
            .unwrap();
    }
    assert_eq!(device.handshakes(), 1);
    assert_eq!(device.requests().len(), 3);
}

#[tokio::test]
async fn test_device_reported_error() {
    let device = FakeDevice::start(token("tok"), r#"{"result":false,"error":"busy"}"#).await;
    let control = ControlInterface::with_config(device.config());

    let err = control.play(1).await.unwrap_err();
    assert!(matches!(err, Error::DeviceReported(ref reason) if reason == "busy"));
    assert_eq!(err.phase(), Phase::Dispatch);
}

#[tokio::test]
async fn test_failure_without_reason() {
    let device = FakeDevice::start(token("tok"), r#"{"result":false}"#).await;
    let control = ControlInterface::with_config(device.config());

    match control.check_trigger().await.unwrap_err() {
        Error::UnknownDeviceFailure { body } => assert_eq!(body, r#"{"result":false}"#),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_reply_that_is_not_json() {
    let device = FakeDevice::start(token("tok"), "not json").await;
    let control = ControlInterface::with_config(device.config());

    let err = control.stop_all_playlists().await.unwrap_err();
    assert!(matches!(err, Error::ResponseParse(_)));
}

#[tokio::test]
async fn test_reply_that_is_not_an_object() {
    let device = FakeDevice::start(token("tok"), "[1,2,3]").await;
    let control = ControlInterface::with_config(device.config());

    let err = control.stop_all_playlists().await.unwrap_err();
    assert!(matches!(err, Error::ResponseFormat { ref body } if body == "[1,2,3]"));
}

#[tokio::test]
async fn test_reply_with_wrong_shape() {
    let device = FakeDevice::start(token("tok"), r#"{"result":true}"#).await;
    let control = ControlInterface::with_config(device.config());

    match control.get_version().await.unwrap_err() {
        Error::UnexpectedResponse { command, body, .. } => {
            assert_eq!(command, CommandType::GetVersion);
            assert_eq!(body, r#"{"result":true}"#);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_untyped_reply() {
    let device = FakeDevice::start(token("tok"), r#"{"playlists":[],"extra":1}"#).await;
    let control = ControlInterface::with_config(device.config());

    let object = control
        .send_command_value(&splay_control_lib::control_interface::commands::GetAllPlaylists {}, None)
        .await
        .unwrap();
    assert_eq!(object["extra"], json!(1));
}

#[tokio::test]
async fn test_greeting_without_header() {
    let payload = Envelope {
        header: None,
        body: Some("hello".to_string()),
    }
    .encode();
    let device = FakeDevice::start(Greeting::Bytes(payload.to_vec()), VERSION_REPLY).await;
    let control = ControlInterface::with_config(device.config());

    let err = control.get_version().await.unwrap_err();
    assert!(matches!(err, Error::HandshakeProtocol(ref m) if m.contains("header")));
    assert!(device.requests().is_empty());
}

#[tokio::test]
async fn test_greeting_without_token() {
    let payload = Envelope {
        header: Some(EnvelopeHeader { token: None }),
        body: None,
    }
    .encode();
    let device = FakeDevice::start(Greeting::Bytes(payload.to_vec()), VERSION_REPLY).await;
    let control = ControlInterface::with_config(device.config());

    let err = control.get_version().await.unwrap_err();
    assert!(matches!(err, Error::HandshakeProtocol(ref m) if m.contains("token")));
    assert!(device.requests().is_empty());
}

#[tokio::test]
async fn test_text_greeting() {
    let device = FakeDevice::start(Greeting::Text("hello".to_string()), VERSION_REPLY).await;
    let control = ControlInterface::with_config(device.config());

    let err = control.get_version().await.unwrap_err();
    assert!(matches!(err, Error::HandshakeProtocol(ref m) if m.contains("buffer")));
}

#[tokio::test]
async fn test_silent_device_times_out() {
    let device = FakeDevice::start(Greeting::Silent, VERSION_REPLY).await;
    let config = device.config().with_timeout(Duration::from_millis(200));
    let control = ControlInterface::with_config(config);

    let err = control.get_version().await.unwrap_err();
    assert!(matches!(err, Error::HandshakeTimeout(d) if d == Duration::from_millis(200)));
    assert!(err.is_timeout());
    assert_eq!(err.phase(), Phase::Handshake);
    assert!(device.requests().is_empty());
}

#[tokio::test]
async fn test_slow_api_times_out() {
    let device =
        FakeDevice::start_with_delay(token("tok"), VERSION_REPLY, Duration::from_secs(2)).await;
    let config = device.config().with_timeout(Duration::from_millis(200));
    let control = ControlInterface::with_config(config);

    let err = control.get_version().await.unwrap_err();
    assert!(matches!(err, Error::DispatchTimeout(_)));
    assert_eq!(err.phase(), Phase::Dispatch);
    assert_eq!(device.handshakes(), 1);
}

#[tokio::test]
async fn test_unreachable_device() {
    common::init_logging();
    let control =
        ControlInterface::with_config(ClientConfig::new("127.0.0.1").with_port(closed_port().await));
    let err = control.get_version().await.unwrap_err();
    assert!(matches!(err, Error::HandshakeTransport(_)));
}

async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn test_unreachable_api() {
    common::init_logging();
    let control =
        ControlInterface::with_config(ClientConfig::new("127.0.0.1").with_port(closed_port().await));

    let err = control
        .send_command_with_token(&GetVersion {}, "tok")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DispatchTransport(_)));
    assert_eq!(err.phase(), Phase::Dispatch);
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_timeouts_apply_to_each_phase_separately() {
    let timeout = Duration::from_millis(500);
    let device = FakeDevice::start_with_delay(
        Greeting::Delayed(Duration::from_millis(300), "slow".to_string()),
        VERSION_REPLY,
        Duration::from_millis(300),
    )
    .await;
    let control = ControlInterface::with_config(device.config().with_timeout(timeout));

    let started = std::time::Instant::now();
    let version = control.get_version().await.unwrap();
    assert_eq!(version.version, "1.8.2");
    assert!(started.elapsed() > timeout);
    assert_eq!(device.requests()[0].authorization.as_deref(), Some("slow"));
}

#[tokio::test]
async fn test_late_token_is_discarded() {
    let device = FakeDevice::start(
        Greeting::Delayed(Duration::from_millis(400), "late".to_string()),
        VERSION_REPLY,
    )
    .await;
    let config = device.config().with_timeout(Duration::from_millis(200));
    let control = ControlInterface::with_config(config);

    let err = control.get_version().await.unwrap_err();
    assert!(matches!(err, Error::HandshakeTimeout(_)));

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(device.handshakes(), 1);
    assert!(device.requests().is_empty());
}

#[tokio::test]
async fn test_token_just_before_timeout() {
    let device = FakeDevice::start(
        Greeting::Delayed(Duration::from_millis(300), "close-call".to_string()),
        VERSION_REPLY,
    )
    .await;
    let control =
        ControlInterface::with_config(device.config().with_timeout(Duration::from_millis(400)));

    assert_eq!(control.acquire_token().await.unwrap(), "close-call");
}

#[tokio::test]
async fn test_reply_with_newer_firmware_values() {
    let reply = r#"{"playlists":[{"playlist_id":1,"name":"Foyer","duration":12000,"group":0,"intensity":62.5,"order":0,"status":6}]}"#;
    let device = FakeDevice::start(token("tok"), reply).await;
    let control = ControlInterface::with_config(device.config());

    let playlists = control.get_all_playlists().await.unwrap().playlists;
    assert_eq!(playlists[0].status, Some(PlaylistStatus::Other(6)));
    assert_eq!(playlists[0].intensity, 62.5);
}

#[tokio::test]
async fn test_numeric_cue_names() {
    let reply = r#"{"result":true,"cues":[{"cue_id":5,"duration":250,"name":7,"type":0}]}"#;
    let device = FakeDevice::start(token("tok"), reply).await;
    let control = ControlInterface::with_config(device.config());

    let cues = control.get_all_cues().await.unwrap().cues;
    assert_eq!(cues[0].name, "7");
}
