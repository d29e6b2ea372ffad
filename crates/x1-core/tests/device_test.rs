#![allow(clippy::unwrap_used, clippy::float_cmp)]
// Device behavior against a mocked X1 using wiremock.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value as Json, json};
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use x1_api::{TransportConfig, X1Client};
use x1_core::device::{PointState, Rgbw};
use x1_core::{
    Channel, CodecError, ConfigurationSnapshot, CoreError, Device, FanCoilMode, HvacMode, Session,
    SyncEngine, Value, WriteMode,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn engine(mode: WriteMode) -> (MockServer, SyncEngine) {
    let server = MockServer::start().await;
    let client = X1Client::new(
        Url::parse(&server.uri()).unwrap(),
        &TransportConfig::default(),
    )
    .unwrap();
    let session = Session::with_token(Arc::new(client), SecretString::from("tok123"));
    (server, SyncEngine::new(Arc::new(session), mode))
}

fn bind(function: Json, engine: &SyncEngine) -> Device {
    let snapshot = ConfigurationSnapshot::parse(&json!({
        "uid": "a036",
        "functions": [function]
    }))
    .unwrap();
    Device::bind(Arc::clone(&snapshot.functions[0]), engine.clone()).unwrap()
}

fn function(uid: &str, channel: &str, points: &[(&str, &str)]) -> Json {
    let points: Vec<Json> = points
        .iter()
        .map(|(uid, name)| json!({ "uid": uid, "name": name }))
        .collect();
    json!({
        "uid": uid,
        "displayName": format!("Function {uid}"),
        "channelType": format!("de.gira.schema.channels.{channel}"),
        "dataPoints": points
    })
}

async fn expect_put(server: &MockServer, uid: &str, value: &str) {
    Mock::given(method("PUT"))
        .and(path(format!("/api/values/{uid}")))
        .and(query_param("token", "tok123"))
        .and(body_json(json!({ "value": value })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
}

async fn expect_values(server: &MockServer, function: &str, values: Json, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/values/{function}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": values })))
        .expect(times)
        .mount(server)
        .await;
}

/// Fails verification if any request reaches the server.
async fn expect_no_calls(server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

fn switch_fn() -> Json {
    function("a02m", "Switch", &[("a02n", "OnOff")])
}

// ── Switch ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_switch_turn_on_pushes_one() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "a02n", "1").await;

    let Device::Switch(switch) = bind(switch_fn(), &engine) else {
        panic!("expected a switch");
    };
    switch.turn_on().await.unwrap();
    assert_eq!(switch.is_on().await, Some(true));
}

#[tokio::test]
async fn test_switch_toggle_after_pull_pushes_zero() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_values(&server, "a02m", json!([{ "uid": "a02n", "value": "1" }]), 1).await;
    expect_put(&server, "a02n", "0").await;

    let device = bind(switch_fn(), &engine);
    device.pull().await.unwrap();
    let Device::Switch(switch) = &device else {
        panic!("expected a switch");
    };
    assert_eq!(switch.is_on().await, Some(true));

    assert!(!switch.toggle().await.unwrap());
    assert_eq!(switch.is_on().await, Some(false));
}

#[tokio::test]
async fn test_toggle_with_unknown_state_pulls_first() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_values(&server, "a02m", json!([{ "uid": "a02n", "value": "0" }]), 1).await;
    expect_put(&server, "a02n", "1").await;

    let Device::Switch(switch) = bind(switch_fn(), &engine) else {
        panic!("expected a switch");
    };
    assert!(switch.toggle().await.unwrap());
}

#[tokio::test]
async fn test_undecodable_value_is_kept_raw() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_values(&server, "a02m", json!([{ "uid": "a02n", "value": "maybe" }]), 1).await;

    let device = bind(switch_fn(), &engine);
    device.pull().await.unwrap();
    match device.core().state("OnOff").await {
        PointState::Raw { raw, error } => {
            assert_eq!(raw, "maybe");
            assert!(matches!(error, CodecError::Decode { .. }));
        }
        other => panic!("expected raw state, got {other:?}"),
    }
}

#[tokio::test]
async fn test_repeated_pulls_yield_identical_cache() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_values(
        &server,
        "d1",
        json!([
            { "uid": "d1a", "value": "1" },
            { "uid": "d1b", "value": "42.5" }
        ]),
        2,
    )
    .await;

    let device = bind(
        function("d1", "KNX.Dimmer", &[("d1a", "OnOff"), ("d1b", "Brightness")]),
        &engine,
    );
    device.pull().await.unwrap();
    let first = device.core().states().await;
    device.pull().await.unwrap();
    assert_eq!(first, device.core().states().await);
    assert_eq!(first["Brightness"], PointState::Value(Value::Float(42.5)));
}

#[tokio::test]
async fn test_concurrent_toggles_alternate() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_values(&server, "a02m", json!([{ "uid": "a02n", "value": "1" }]), 1).await;
    expect_put(&server, "a02n", "0").await;
    expect_put(&server, "a02n", "1").await;

    let device = bind(switch_fn(), &engine);
    device.pull().await.unwrap();
    let Device::Switch(switch) = &device else {
        panic!("expected a switch");
    };

    let (first, second) = tokio::join!(switch.toggle(), switch.toggle());
    assert_ne!(first.unwrap(), second.unwrap());
    assert_eq!(switch.is_on().await, Some(true));
}

#[tokio::test]
async fn test_rejected_token_on_write_is_unauthorized() {
    let (server, engine) = engine(WriteMode::Individual).await;
    Mock::given(method("PUT"))
        .and(path("/api/values/a02n"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let Device::Switch(switch) = bind(switch_fn(), &engine) else {
        panic!("expected a switch");
    };
    let err = switch.turn_on().await.unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized { .. }), "{err:?}");
    assert_eq!(switch.is_on().await, None);
}

// ── Dimmer ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dimmer_without_brightness_rejects_dim_to() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_no_calls(&server).await;

    let Device::Dimmer(dimmer) = bind(function("d1", "KNX.Dimmer", &[("d1a", "OnOff")]), &engine)
    else {
        panic!("expected a dimmer");
    };
    assert!(!dimmer.has_brightness());
    let err = dimmer.dim_to(50.0).await.unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedOperation { .. }), "{err:?}");
}

#[tokio::test]
async fn test_percent_out_of_range_sends_nothing() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_no_calls(&server).await;

    let Device::Dimmer(dimmer) = bind(
        function("d1", "KNX.Dimmer", &[("d1a", "OnOff"), ("d1b", "Brightness")]),
        &engine,
    ) else {
        panic!("expected a dimmer");
    };
    let err = dimmer.dim_to(150.0).await.unwrap_err();
    assert!(
        matches!(err, CoreError::Codec(CodecError::Range { .. })),
        "{err:?}"
    );
    assert_eq!(dimmer.brightness().await, None);
}

#[tokio::test]
async fn test_dim_to_writes_fractionless_percent() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "d1b", "50").await;

    let Device::Dimmer(dimmer) = bind(
        function("d1", "KNX.Dimmer", &[("d1a", "OnOff"), ("d1b", "Brightness")]),
        &engine,
    ) else {
        panic!("expected a dimmer");
    };
    dimmer.dim_to(50.0).await.unwrap();
    assert_eq!(dimmer.brightness().await, Some(50.0));
}

#[tokio::test]
async fn test_dimmer_white_respects_parameter_bounds() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "w1c", "4000").await;

    let mut f = function(
        "w1",
        "DimmerWhite",
        &[("w1a", "OnOff"), ("w1c", "Color-Temperature")],
    );
    f["parameters"] = json!([
        { "key": "MinColorTemperature", "value": "2700" },
        { "key": "MaxColorTemperature", "value": 6500 }
    ]);

    let Device::DimmerWhite(white) = bind(f, &engine) else {
        panic!("expected a tunable white dimmer");
    };
    let range = white.color_temperature_range().unwrap();
    assert_eq!((range.min, range.max), (2700.0, 6500.0));

    let err = white.set_color_temperature(9000.0).await.unwrap_err();
    assert!(matches!(err, CoreError::Codec(CodecError::Range { .. })));
    white.set_color_temperature(4000.0).await.unwrap();
}

// ── Multi-value pushes ──────────────────────────────────────────────

fn rgb_fn() -> Json {
    function(
        "c1",
        "DimmerRGBW",
        &[("c1a", "OnOff"), ("r1", "Red"), ("g1", "Green"), ("b1", "Blue")],
    )
}

const COLOR: Rgbw = Rgbw {
    red: 10.0,
    green: 20.0,
    blue: 30.0,
    white: None,
};

#[tokio::test]
async fn test_individual_push_reports_partial_failure() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "r1", "10").await;
    expect_put(&server, "b1", "30").await;
    Mock::given(method("PUT"))
        .and(path("/api/values/g1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let Device::DimmerRgbw(rgbw) = bind(rgb_fn(), &engine) else {
        panic!("expected an RGBW dimmer");
    };
    let outcome = rgbw.set_color(COLOR).await.unwrap();

    assert!(outcome.is_partial());
    assert_eq!(outcome.failed_uids(), vec!["g1"]);
    assert_eq!(outcome.succeeded_uids(), vec!["r1", "b1"]);
    assert_eq!(rgbw.core().value("Red").await, Some(Value::Float(10.0)));
    assert!(rgbw.core().state("Green").await.is_unknown());
}

#[tokio::test]
async fn test_individual_push_stops_at_rejected_token() {
    let (server, engine) = engine(WriteMode::Individual).await;
    Mock::given(method("PUT"))
        .and(path("/api/values/r1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    for uid in ["g1", "b1"] {
        Mock::given(method("PUT"))
            .and(path(format!("/api/values/{uid}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let Device::DimmerRgbw(rgbw) = bind(rgb_fn(), &engine) else {
        panic!("expected an RGBW dimmer");
    };
    let outcome = rgbw.set_color(COLOR).await.unwrap();

    assert_eq!(outcome.failed_uids(), vec!["r1", "g1", "b1"]);
    assert!(
        outcome
            .results()
            .iter()
            .all(|r| matches!(r.result, Err(CoreError::Unauthorized { .. })))
    );
}

#[tokio::test]
async fn test_bulk_push_reports_per_uid_rejection() {
    let (server, engine) = engine(WriteMode::Bulk).await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/values"))
        .and(body_json(json!({
            "values": [
                { "uid": "r1", "value": "10" },
                { "uid": "g1", "value": "20" },
                { "uid": "b1", "value": "30" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [
                { "uid": "r1" },
                { "uid": "g1", "error": { "code": "writeFailed", "message": "bus error" } },
                { "uid": "b1" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let Device::DimmerRgbw(rgbw) = bind(rgb_fn(), &engine) else {
        panic!("expected an RGBW dimmer");
    };
    let outcome = rgbw.set_color(COLOR).await.unwrap();

    assert_eq!(outcome.failed_uids(), vec!["g1"]);
    let rejected = &outcome.results()[1];
    assert!(matches!(
        &rejected.result,
        Err(CoreError::WriteRejected { uid, .. }) if uid == "g1"
    ));
}

#[tokio::test]
async fn test_bulk_push_failure_fails_every_write() {
    let (server, engine) = engine(WriteMode::Bulk).await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/values"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let Device::DimmerRgbw(rgbw) = bind(rgb_fn(), &engine) else {
        panic!("expected an RGBW dimmer");
    };
    let err = rgbw.set_color(COLOR).await.unwrap_err();
    assert!(matches!(err, CoreError::Transport(_)), "{err:?}");
    assert!(rgbw.core().state("Red").await.is_unknown());
}

#[tokio::test]
async fn test_invalid_channel_aborts_whole_color() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_no_calls(&server).await;

    let Device::DimmerRgbw(rgbw) = bind(rgb_fn(), &engine) else {
        panic!("expected an RGBW dimmer");
    };
    let err = rgbw
        .set_color(Rgbw {
            blue: 101.0,
            ..COLOR
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Codec(_)));
}

// ── Trigger & scenes ────────────────────────────────────────────────

#[tokio::test]
async fn test_trigger_press_and_pull() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "t1a", "1").await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let device = bind(function("t1", "Trigger", &[("t1a", "Trigger")]), &engine);
    let Device::Trigger(trigger) = &device else {
        panic!("expected a trigger");
    };
    trigger.press().await.unwrap();
    device.pull().await.unwrap();
    assert!(device.core().state("Trigger").await.is_unknown());
}

#[tokio::test]
async fn test_scene_set_executes_and_teaches() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "s1a", "5").await;
    expect_put(&server, "s1b", "64").await;

    let Device::SceneSet(scenes) = bind(
        function("s1", "SceneSet", &[("s1a", "Execute"), ("s1b", "Teach")]),
        &engine,
    ) else {
        panic!("expected a scene set");
    };
    assert!(scenes.can_teach());
    scenes.execute_scene(5).await.unwrap();
    scenes.teach_scene(64).await.unwrap();
    assert!(scenes.execute_scene(0).await.is_err());
}

#[tokio::test]
async fn test_scene_control_cannot_teach() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_no_calls(&server).await;

    let Device::SceneControl(control) =
        bind(function("s2", "SceneControl", &[("s2a", "Scene")]), &engine)
    else {
        panic!("expected a scene control");
    };
    let err = control.teach_scene(1).await.unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedOperation { .. }));
}

// ── Blinds ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_blind_movement_and_position() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "b1b", "1").await;
    expect_put(&server, "b1c", "75").await;

    let Device::Blind(blind) = bind(
        function(
            "b1",
            "BlindWithPos",
            &[
                ("b1a", "Step-Up-Down"),
                ("b1b", "Up-Down"),
                ("b1c", "Position"),
                ("b1d", "Movement"),
            ],
        ),
        &engine,
    ) else {
        panic!("expected a blind");
    };
    assert!(blind.has_position());
    assert!(!blind.has_slat_position());
    blind.move_down().await.unwrap();
    blind.set_position(75.0).await.unwrap();
    assert!(blind.set_slat_position(10.0).await.is_err());
}

// ── Climate ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_heating_cooling_status_bits_and_mode() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_values(
        &server,
        "h1",
        json!([
            { "uid": "h1a", "value": "21.5" },
            { "uid": "h1b", "value": "3" },
            { "uid": "h1c", "value": "2" }
        ]),
        1,
    )
    .await;

    let device = bind(
        function(
            "h1",
            "KNX.HeatingCoolingSwitchable",
            &[("h1a", "Set-Point"), ("h1b", "Status"), ("h1c", "Mode")],
        ),
        &engine,
    );
    device.pull().await.unwrap();
    let Device::HeatingCooling(hc) = &device else {
        panic!("expected a heating/cooling controller");
    };
    assert_eq!(hc.target_temperature().await, Some(21.5));
    assert_eq!(hc.is_heating().await, Some(true));
    assert_eq!(hc.is_cooling().await, Some(true));
    assert_eq!(hc.mode().await, Some(HvacMode::from_repr(2).unwrap()));
    assert!(!hc.has_presence());
}

#[tokio::test]
async fn test_current_temperature_is_never_writable() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_no_calls(&server).await;

    let mut f = function("r1", "RoomTemperatureSwitchable", &[("r1a", "SetPoint")]);
    f["dataPoints"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "uid": "r1b", "name": "Current", "canRead": true, "canWrite": true }));

    let device = bind(f, &engine);
    let err = device
        .core()
        .push("CurrentTemperature", &Value::Float(20.0))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedOperation { .. }));
}

// ── Audio ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sonos_composes_audio() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "so2", "30").await;
    expect_put(&server, "so3", "-10").await;

    let device = bind(
        function(
            "so",
            "Sonos.Audio",
            &[("so1", "Play"), ("so2", "Volume"), ("so3", "Shift-Volume")],
        ),
        &engine,
    );
    let audio = device.as_audio().unwrap();
    audio.set_volume(30.0).await.unwrap();
    assert_eq!(audio.volume().await, Some(30.0));

    let Device::SonosAudio(sonos) = &device else {
        panic!("expected a Sonos zone");
    };
    assert!(sonos.has_volume_shift());
    assert!(!sonos.has_cover());
    sonos.shift_volume(-10.0).await.unwrap();
}

// ── Binding ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bind_requires_every_required_point() {
    let (_server, engine) = engine(WriteMode::Individual).await;
    let snapshot = ConfigurationSnapshot::parse(&json!({
        "uid": "a036",
        "functions": [function("a1", "AudioWithPlaylist", &[("a1a", "Play")])]
    }))
    .unwrap();

    let err = Device::bind(Arc::clone(&snapshot.functions[0]), engine).unwrap_err();
    match err {
        CoreError::MissingRequiredDataPoint { function, point } => {
            assert_eq!(function, "a1");
            assert_eq!(point, "Volume");
        }
        other => panic!("expected MissingRequiredDataPoint, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bind_succeeds_iff_required_points_present() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_no_calls(&server).await;

    let table: &[(&str, &[&str])] = &[
        ("Switch", &["OnOff"]),
        ("KNX.Dimmer", &["OnOff"]),
        ("DimmerRGBW", &["OnOff"]),
        ("DimmerWhite", &["OnOff"]),
        ("BlindWithPos", &["StepUpDown", "UpDown"]),
        ("Trigger", &["Trigger"]),
        ("SceneSet", &["SceneNumber"]),
        ("SceneControl", &["SceneNumber"]),
        ("RoomTemperatureSwitchable", &["SetPoint"]),
        ("KNX.HeatingCoolingSwitchable", &["SetPoint"]),
        ("KNX.FanCoil", &["SetPoint", "Mode"]),
        ("AudioWithPlaylist", &["PlayPause", "Volume"]),
        ("Sonos.Audio", &["PlayPause", "Volume"]),
        ("Camera", &["ActiveState"]),
        ("Link", &["ActiveState"]),
        ("Binary", &["Value"]),
        ("Byte", &["Value"]),
        ("DWord", &["Value"]),
        ("Integer", &["Value"]),
        ("Float", &["Value"]),
        ("String", &["Value"]),
        ("Percent", &["Value"]),
        ("Temperature", &["Value"]),
    ];

    for (channel, required) in table {
        let uids: Vec<String> = (0..required.len()).map(|i| format!("p{i}")).collect();
        let all: Vec<(&str, &str)> = uids
            .iter()
            .map(String::as_str)
            .zip(required.iter().copied())
            .collect();

        let device = bind(function("f1", channel, &all), &engine);
        assert_eq!(
            device.channel_type().to_string(),
            format!("de.gira.schema.channels.{channel}")
        );

        for missing in *required {
            let partial: Vec<(&str, &str)> =
                all.iter().copied().filter(|(_, name)| name != missing).collect();
            let snapshot = ConfigurationSnapshot::parse(&json!({
                "uid": "a036",
                "functions": [function("f1", channel, &partial)]
            }))
            .unwrap();
            match Device::bind(Arc::clone(&snapshot.functions[0]), engine.clone()) {
                Err(CoreError::MissingRequiredDataPoint { function, point }) => {
                    assert_eq!(function, "f1");
                    assert_eq!(point, *missing, "{channel}");
                }
                other => panic!("{channel} without {missing}: {other:?}"),
            }
        }
    }
}

// ── Fan coil, visibility & value channels ───────────────────────────

#[tokio::test]
async fn test_fan_coil_mode_and_read_only_error() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "fc2", "1").await;
    expect_values(
        &server,
        "fc",
        json!([
            { "uid": "fc1", "value": "22" },
            { "uid": "fc2", "value": "9" },
            { "uid": "fc3", "value": "1" },
            { "uid": "fc4", "value": "Filter" }
        ]),
        1,
    )
    .await;

    let mut f = function("fc", "KNX.FanCoil", &[("fc1", "SetPoint"), ("fc2", "Mode")]);
    let points = f["dataPoints"].as_array_mut().unwrap();
    points.push(json!({ "uid": "fc3", "name": "Error", "canRead": true, "canWrite": true }));
    points.push(json!({ "uid": "fc4", "name": "Error-Text", "canRead": true, "canWrite": true }));

    let device = bind(f, &engine);
    let Device::FanCoil(fan_coil) = &device else {
        panic!("expected a fan coil");
    };
    assert!(fan_coil.has_error());
    assert!(!fan_coil.has_fan_speed());

    fan_coil.set_mode(FanCoilMode::Heat).await.unwrap();
    for point in ["Error", "ErrorText"] {
        let err = device
            .core()
            .push(point, &Value::Bool(false))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedOperation { .. }), "{point}");
    }

    device.pull().await.unwrap();
    assert_eq!(fan_coil.mode().await, Some(FanCoilMode::FanOnly));
    assert_eq!(
        device.core().value("ErrorText").await,
        Some(Value::Text("Filter".into()))
    );
}

#[tokio::test]
async fn test_camera_and_link_toggle_visibility() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "cam1", "1").await;
    expect_put(&server, "lnk1", "0").await;

    let Device::Camera(camera) = bind(function("cam", "Camera", &[("cam1", "ActiveState")]), &engine)
    else {
        panic!("expected a camera");
    };
    camera.set_active(true).await.unwrap();
    assert_eq!(camera.is_active().await, Some(true));

    let Device::Link(link) = bind(function("lnk", "Link", &[("lnk1", "ActiveState")]), &engine)
    else {
        panic!("expected a link");
    };
    link.set_active(false).await.unwrap();
}

#[tokio::test]
async fn test_value_channels_enforce_kind_bounds() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_no_calls(&server).await;

    for (channel, value) in [
        ("Byte", Value::Int(256)),
        ("DWord", Value::Int(-1)),
        ("Percent", Value::Float(100.5)),
        ("Temperature", Value::Float(-300.0)),
    ] {
        let Device::Value(device) = bind(function("v1", channel, &[("v1a", "Value")]), &engine)
        else {
            panic!("expected a value device for {channel}");
        };
        let err = device.set(&value).await.unwrap_err();
        assert!(
            matches!(err, CoreError::Codec(CodecError::Range { .. })),
            "{channel}: {err:?}"
        );
    }

    let Device::Value(text) = bind(function("v2", "String", &[("v2a", "Value")]), &engine) else {
        panic!("expected a value device");
    };
    let err = text.set(&Value::Int(1)).await.unwrap_err();
    assert!(matches!(err, CoreError::Codec(CodecError::TypeMismatch { .. })));
}

#[tokio::test]
async fn test_value_channel_writes_and_caches() {
    let (server, engine) = engine(WriteMode::Individual).await;
    expect_put(&server, "v1a", "255").await;
    expect_put(&server, "v2a", "Hallo").await;

    let Device::Value(byte) = bind(function("v1", "Byte", &[("v1a", "Value")]), &engine) else {
        panic!("expected a value device");
    };
    byte.set(&Value::Int(255)).await.unwrap();
    assert_eq!(byte.value().await, Some(Value::Int(255)));

    let Device::Value(text) = bind(function("v2", "String", &[("v2a", "Value")]), &engine) else {
        panic!("expected a value device");
    };
    text.set(&Value::from("Hallo")).await.unwrap();
}
