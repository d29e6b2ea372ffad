#![allow(clippy::unwrap_used)]
// Controller lifecycle against a mocked X1.

use secrecy::SecretString;
use serde_json::{Value as Json, json};
use url::Url;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use x1_api::models::CallbackRegistration;
use x1_core::{AuthCredentials, ConnectionState, Controller, ControllerConfig, CoreError};

// ── Helpers ─────────────────────────────────────────────────────────

fn document(uid: &str, light: &str) -> Json {
    json!({
        "uid": uid,
        "functions": [{
            "uid": "a02m",
            "displayName": light,
            "channelType": "de.gira.schema.channels.Switch",
            "dataPoints": [{ "uid": "a02n", "name": "OnOff", "canRead": true, "canWrite": true, "canEvent": true }]
        }]
    })
}

fn config(server: &MockServer, auth: AuthCredentials) -> ControllerConfig {
    ControllerConfig::new(Url::parse(&server.uri()).unwrap(), auth)
}

fn credentials() -> AuthCredentials {
    AuthCredentials::Credentials {
        username: "admin".into(),
        password: SecretString::from("secret"),
    }
}

fn token() -> AuthCredentials {
    AuthCredentials::Token(SecretString::from("tok123"))
}

async fn mount_available(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "info": "GDS-REST-API" })))
        .mount(server)
        .await;
}

async fn mount_registration(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v2/clients"))
        .and(basic_auth("admin", "secret"))
        .and(body_json(json!({ "client": "de.x1rs.client" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok123" })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_config_uid(server: &MockServer, uid: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v2/uiconfig/uid"))
        .and(query_param("token", "tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "uid": uid })))
        .mount(server)
        .await;
}

// ── Connect / disconnect ────────────────────────────────────────────

#[tokio::test]
async fn test_connect_registers_and_loads_devices() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    mount_registration(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .and(query_param("token", "tok123"))
        .and(query_param("expand", "dataPointFlags,parameters,locations,trades"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("a036", "Kitchen")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/clients/tok123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, credentials()));
    let state = controller.connection_state();
    assert_eq!(*state.borrow(), ConnectionState::Disconnected);

    controller.connect().await.unwrap();
    assert_eq!(*state.borrow(), ConnectionState::Connected);
    assert!(controller.session().await.unwrap().is_registered());

    let registry = controller.registry().unwrap();
    assert_eq!(registry.config_uid(), "a036");
    assert_eq!(registry.find(Some("Kitchen"), None).unwrap().uid(), "a02m");

    controller.disconnect().await;
    assert_eq!(*state.borrow(), ConnectionState::Disconnected);
    assert!(matches!(
        controller.registry(),
        Err(CoreError::ControllerDisconnected)
    ));
}

#[tokio::test]
async fn test_supplied_token_is_never_deregistered() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("a036", "Kitchen")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/clients"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, token()));
    controller.connect().await.unwrap();
    assert!(!controller.session().await.unwrap().is_registered());
    controller.disconnect().await;
}

#[tokio::test]
async fn test_unavailable_controller_fails_connect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, token()));
    let err = controller.connect().await.unwrap_err();
    assert!(matches!(err, CoreError::Unavailable { .. }), "{err:?}");
    assert_eq!(*controller.connection_state().borrow(), ConnectionState::Failed);
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_unauthorized() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v2/clients"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, credentials()));
    let err = controller.connect().await.unwrap_err();
    assert!(matches!(err, CoreError::Unauthorized { .. }), "{err:?}");
}

#[tokio::test]
async fn test_reconnect_deregisters_previous_token() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v2/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok123" })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("a036", "Kitchen")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/clients/tok123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, credentials()));
    controller.connect().await.unwrap();
    controller.connect().await.unwrap();
    assert_eq!(*controller.connection_state().borrow(), ConnectionState::Connected);
    controller.disconnect().await;
}

#[tokio::test]
async fn test_malformed_document_is_malformed_config() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "uid": "x", "functions": "nope" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, token()));
    let err = controller.connect().await.unwrap_err();
    assert!(matches!(err, CoreError::MalformedConfig { .. }), "{err:?}");
}

#[tokio::test]
async fn test_failed_load_deregisters_fresh_token() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    mount_registration(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "functions": [] })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/clients/tok123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, credentials()));
    let err = controller.connect().await.unwrap_err();
    assert!(matches!(err, CoreError::MalformedConfig { .. }), "{err:?}");
    assert_eq!(*controller.connection_state().borrow(), ConnectionState::Failed);
    assert!(matches!(
        controller.session().await,
        Err(CoreError::ControllerDisconnected)
    ));
    assert!(controller.registry().is_err());
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_keeps_registry_when_revision_unchanged() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    mount_config_uid(&server, "a036").await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("a036", "Kitchen")))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, token()));
    controller.connect().await.unwrap();
    let before = controller.registry().unwrap();

    assert!(!controller.refresh().await.unwrap());
    assert!(std::sync::Arc::ptr_eq(&before, &controller.registry().unwrap()));
}

#[tokio::test]
async fn test_refresh_rebuilds_registry_on_revision_change() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    mount_config_uid(&server, "a037").await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("a036", "Kitchen")))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("a037", "Pantry")))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, token()));
    controller.connect().await.unwrap();
    let before = controller.registry().unwrap();
    assert_eq!(before.config_uid(), "a036");

    assert!(controller.refresh().await.unwrap());
    let after = controller.registry().unwrap();
    assert_eq!(after.config_uid(), "a037");
    assert!(after.find(Some("Pantry"), None).is_ok());
    // Old registry stays intact for whoever still holds it.
    assert!(before.find(Some("Kitchen"), None).is_ok());
}

#[tokio::test]
async fn test_refresh_before_connect_is_an_error() {
    let server = MockServer::start().await;
    let controller = Controller::new(config(&server, token()));
    assert!(matches!(
        controller.refresh().await,
        Err(CoreError::ControllerDisconnected)
    ));
}

// ── Callbacks & oneshot ─────────────────────────────────────────────

#[tokio::test]
async fn test_register_callbacks_forwards_to_controller() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("a036", "Kitchen")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/clients/tok123/callbacks"))
        .and(body_json(json!({
            "valueCallback": "https://10.0.0.2/values",
            "testCallbacks": true
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let controller = Controller::new(config(&server, token()));
    controller.connect().await.unwrap();
    controller
        .register_callbacks(&CallbackRegistration {
            value_callback: Some("https://10.0.0.2/values".into()),
            test_callbacks: Some(true),
            ..CallbackRegistration::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_oneshot_connects_runs_and_disconnects() {
    let server = MockServer::start().await;
    mount_available(&server).await;
    mount_registration(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/uiconfig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(document("a036", "Kitchen")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/values/a02n"))
        .and(body_json(json!({ "value": "1" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/clients/tok123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uid = Controller::oneshot(config(&server, credentials()), |controller| async move {
        let registry = controller.registry()?;
        let device = registry.find(Some("Kitchen"), None)?;
        let x1_core::Device::Switch(switch) = &**device else {
            return Err(CoreError::ValidationFailed {
                message: "not a switch".into(),
            });
        };
        switch.turn_on().await?;
        Ok(device.uid().to_owned())
    })
    .await
    .unwrap();
    assert_eq!(uid, "a02m");
}
