//! `vgl listen` — backend realtime ingestion endpoint probes.

use vigil_config::VigilConfig;
use vigil_core::ProbeReport;
use vigil_probes::realtime::{BackendProbe, WsReachability};

use crate::cli::ListenArgs;

pub async fn handle(args: &ListenArgs, config: &VigilConfig) -> ProbeReport {
    let mut report = ProbeReport::default();
    let probe = BackendProbe::new(config.backend.clone());

    match probe.health().await {
        Ok(200) => report.ok("Backend Health", "health endpoint answered 200"),
        Ok(status) => report.fail(
            "Backend Health",
            format!("health endpoint answered {status}"),
        ),
        Err(error) => report.fail("Backend Health", error.to_string()),
    }

    let connected = match probe.reachability(&args.stt_service).await {
        Ok(WsReachability::Connected) => {
            report.ok("Backend WebSocket", "listen handshake completed");
            true
        }
        Ok(WsReachability::AuthRejected(status)) => {
            // The endpoint exists and enforces auth; that still proves
            // reachability.
            report.ok(
                "Backend WebSocket",
                format!("reachable, handshake rejected with {status} (auth required)"),
            );
            false
        }
        Err(error) => {
            report.fail("Backend WebSocket", error.to_string());
            false
        }
    };

    if args.send_audio {
        if connected {
            match probe.send_audio(&args.stt_service).await {
                Ok(result) if result.got_segments => report.ok(
                    "Backend Audio",
                    format!(
                        "{} responses, transcription segments received",
                        result.responses.len()
                    ),
                ),
                Ok(result) => report.ok(
                    "Backend Audio",
                    format!(
                        "audio streamed, {} responses (no segments; tone audio rarely transcribes)",
                        result.responses.len()
                    ),
                ),
                Err(error) => report.fail("Backend Audio", error.to_string()),
            }
        } else {
            report.skip("Backend Audio", "no open session to stream over");
        }
    }

    // Requesting a different STT backend exercises the server-side fallback:
    // a session that still opens means the backend substituted a working one.
    if args.stt_service == "deepgram" {
        match probe.reachability("soniox").await {
            Ok(WsReachability::Connected) => {
                report.ok("Backend STT Fallback", "soniox-requested session opened");
            }
            Ok(WsReachability::AuthRejected(status)) => report.ok(
                "Backend STT Fallback",
                format!("reachable, handshake rejected with {status} (auth required)"),
            ),
            Err(error) => report.fail("Backend STT Fallback", error.to_string()),
        }
    }
    report
}
