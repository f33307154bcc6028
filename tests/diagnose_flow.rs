//! End-to-end diagnoses against a scripted panel command.

use panel_ip_debug::diagnose::{DiagnoseError, Doctor, Finding};
use panel_ip_debug::panel::{CommandSource, PanelError};
use panel_ip_debug::request::{RequestContext, SourceField};
use panel_ip_debug::security::Verdict;

mod common;

use common::{FakePanel, HEALTHY_JSON};

fn doctor(panel: &FakePanel) -> Doctor<CommandSource> {
    let config = panel.panel_config();
    Doctor::new(config.clone(), CommandSource::new(&config))
}

#[tokio::test]
async fn test_allowed_ip() {
    let panel = FakePanel::new();
    panel.list_command_json(HEALTHY_JSON);

    let ctx = RequestContext::builder().remote_addr("198.51.100.1").build();
    let diagnosis = doctor(&panel).diagnose(ctx).await.unwrap();

    assert_eq!(diagnosis.detected.text(), "198.51.100.1");
    assert!(matches!(diagnosis.verdict, Verdict::Allowed(_)));
    assert!(diagnosis.findings.is_empty());
    assert_eq!(diagnosis.settings.get("VERSION"), Some("1.8.12"));
}

#[tokio::test]
async fn test_forwarded_header_hides_allowed_peer() {
    let panel = FakePanel::new();
    panel.list_command_json(HEALTHY_JSON);

    let ctx = RequestContext::builder()
        .set(SourceField::XForwardedFor, "192.0.2.44")
        .remote_addr("198.51.100.1")
        .build();
    let diagnosis = doctor(&panel).diagnose(ctx).await.unwrap();

    assert_eq!(diagnosis.detected.source, Some(SourceField::XForwardedFor));
    assert!(!diagnosis.verdict.is_allowed());
    assert!(matches!(
        diagnosis.findings.as_slice(),
        [Finding::IpNotAllowed { ip, fix }]
            if ip == "192.0.2.44" && fix.ends_with("\"203.0.113.5,198.51.100.1,192.0.2.44\"")
    ));
}

#[tokio::test]
async fn test_disabled_api_flags() {
    let panel = FakePanel::new();
    panel.list_command_json(r#"{"config":{"API":"no","API_SYSTEM":"0","API_ALLOWED_IP":"allow-all"}}"#);

    let ctx = RequestContext::builder().remote_addr("192.0.2.44").build();
    let diagnosis = doctor(&panel).diagnose(ctx).await.unwrap();

    assert_eq!(diagnosis.verdict, Verdict::AllowAll);
    assert_eq!(diagnosis.findings.len(), 2);
    assert!(matches!(&diagnosis.findings[0], Finding::LegacyApiDisabled { current, .. } if current == "no"));
    assert_eq!(diagnosis.findings[1], Finding::ApiSystemDisabled);
}

#[tokio::test]
async fn test_command_failure_surfaces_output() {
    let panel = FakePanel::new();
    panel.list_command("echo 'Error: hestia is not configured   '\necho 'second line'\nexit 3");

    let err = doctor(&panel)
        .diagnose(RequestContext::default())
        .await
        .unwrap_err();

    match err {
        DiagnoseError::Panel(PanelError::CommandFailed { code, output }) => {
            assert_eq!(code, Some(3));
            assert_eq!(output, "Error: hestia is not configured\nsecond line");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_fatal() {
    let panel = FakePanel::new();
    panel.list_command("echo 'API=yes'");

    let err = doctor(&panel).diagnose(RequestContext::default()).await.unwrap_err();
    assert!(matches!(err, DiagnoseError::Panel(PanelError::InvalidJson(_))));
}

#[tokio::test]
async fn test_empty_json_is_fatal() {
    let panel = FakePanel::new();
    panel.list_command_json("{}");

    let err = doctor(&panel).diagnose(RequestContext::default()).await.unwrap_err();
    assert!(matches!(err, DiagnoseError::Panel(PanelError::EmptyConfig)));
}

#[tokio::test]
async fn test_missing_command() {
    let panel = FakePanel::new();

    let err = doctor(&panel).diagnose(RequestContext::default()).await.unwrap_err();
    assert!(matches!(err, DiagnoseError::Panel(PanelError::CommandMissing(_))));
}

#[tokio::test]
async fn test_missing_helpers_checked_first() {
    let panel = FakePanel::new();
    panel.remove_helpers();

    let err = doctor(&panel).diagnose(RequestContext::default()).await.unwrap_err();
    assert!(matches!(err, DiagnoseError::HelpersMissing(_)));
}

#[tokio::test]
async fn test_command_timeout() {
    let panel = FakePanel::new();
    panel.list_command("sleep 10");

    let mut config = panel.panel_config();
    config.command_timeout_secs = 1;
    let doctor = Doctor::new(config.clone(), CommandSource::new(&config));

    let err = doctor.diagnose(RequestContext::default()).await.unwrap_err();
    assert!(matches!(err, DiagnoseError::Panel(PanelError::Timeout(1))));
}
