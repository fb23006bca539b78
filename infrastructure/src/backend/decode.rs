//! Wire event decoding.
//!
//! [`decode_event`] is the single dispatch switch from the backend's
//! named push-events to the typed [`ConferenceEvent`] union. It is a pure
//! function, called once per well-formed frame.
//!
//! Tolerance rules, in order of the damage they could do:
//! - unknown event names are ignored (never fatal)
//! - payloads missing a required field (e.g. an agent event without a
//!   parseable `role`) drop that one event with a warning
//! - optional fields fall back to sensible defaults

use conclave_domain::{
    AgentRole, ConferenceEvent, Critique, DeliberationMode, FragilityReport, Lane,
    RoutingDecision, Verdict,
};
use serde_json::Value;
use tracing::{trace, warn};

fn get_str<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| payload.get(key).and_then(|v| v.as_str()))
}

fn get_u64(payload: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .find_map(|key| payload.get(key).and_then(|v| v.as_u64()))
}

fn get_f64(payload: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| payload.get(key).and_then(|v| v.as_f64()))
}

fn get_bool(payload: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .find_map(|key| payload.get(key).and_then(|v| v.as_bool()))
}

/// Required role field; `None` drops the whole event.
fn require_role(name: &str, payload: &Value) -> Option<AgentRole> {
    match get_str(payload, &["role"]) {
        Some(raw) => match raw.parse() {
            Ok(role) => Some(role),
            Err(_) => {
                warn!("Decode: '{}' addressed to unknown role '{}', dropping", name, raw);
                None
            }
        },
        None => {
            warn!("Decode: '{}' carries no role, dropping", name);
            None
        }
    }
}

fn parse_mode(payload: &Value) -> Option<DeliberationMode> {
    let raw = get_str(payload, &["mode"])?;
    match raw.parse() {
        Ok(mode) => Some(mode),
        Err(_) => {
            warn!("Decode: unknown deliberation mode '{}'", raw);
            None
        }
    }
}

fn parse_roster(payload: &Value) -> Vec<AgentRole> {
    let Some(raw) = payload
        .get("activeAgents")
        .or_else(|| payload.get("roster"))
        .and_then(|v| v.as_array())
    else {
        return Vec::new();
    };
    raw.iter()
        .filter_map(|v| v.as_str())
        .filter_map(|s| match s.parse() {
            Ok(role) => Some(role),
            Err(_) => {
                warn!("Decode: unknown roster role '{}', skipping", s);
                None
            }
        })
        .collect()
}

fn parse_fragility(payload: &Value) -> Option<FragilityReport> {
    let survived = get_u64(payload, &["survived"])?;
    let total = get_u64(payload, &["total", "testsRun"]).unwrap_or(survived);
    Some(FragilityReport {
        survived: survived as u32,
        total: total as u32,
    })
}

fn parse_verdict(payload: &Value) -> Option<Verdict> {
    if !payload.is_object() {
        return None;
    }
    let summary = get_str(payload, &["summary", "conclusion"])
        .unwrap_or_default()
        .to_string();
    let confidence = get_f64(payload, &["confidence"]);
    let fragility = payload.get("fragility").and_then(parse_fragility);
    let mode = parse_mode(payload);
    if summary.is_empty() && confidence.is_none() && fragility.is_none() && mode.is_none() {
        return None;
    }
    Some(Verdict {
        summary,
        confidence,
        mode,
        fragility,
    })
}

/// Lane-scoped agent events nest the lifecycle step in a `status` field
/// and otherwise carry the flat agent-event payload.
fn decode_lane_agent(name: &str, lane: Lane, payload: &Value) -> Option<ConferenceEvent> {
    let role = require_role(name, payload)?;
    match get_str(payload, &["status"]) {
        Some("thinking") | Some("start") => Some(ConferenceEvent::AgentStarted {
            role,
            lane: Some(lane),
        }),
        Some("token") | Some("progress") | Some("streaming") => {
            Some(ConferenceEvent::AgentProgress {
                role,
                lane: Some(lane),
                tokens_generated: get_u64(payload, &["tokensGenerated"]),
                tokens_estimated: get_u64(payload, &["tokensEstimated"]),
                content_delta: get_str(payload, &["content", "delta"]).map(String::from),
            })
        }
        Some("complete") => Some(ConferenceEvent::AgentCompleted {
            role,
            lane: Some(lane),
            confidence: get_f64(payload, &["confidence"]),
            content: get_str(payload, &["content"]).map(String::from),
        }),
        Some("error") => Some(ConferenceEvent::AgentFailed {
            role,
            lane: Some(lane),
            message: get_str(payload, &["message", "error"])
                .unwrap_or("agent failed")
                .to_string(),
        }),
        other => {
            warn!("Decode: '{}' with unknown status {:?}, dropping", name, other);
            None
        }
    }
}

/// Decode one named wire event into the typed union.
///
/// Returns `None` for unknown names and for payloads too broken to use;
/// the caller keeps the stream alive either way.
pub fn decode_event(name: &str, payload: &Value) -> Option<ConferenceEvent> {
    match name {
        "conference_start" => Some(ConferenceEvent::ConferenceStarted),

        "routing_start" => Some(ConferenceEvent::RoutingStarted),
        "routing_complete" => Some(ConferenceEvent::RoutingDecided(RoutingDecision {
            mode: parse_mode(payload),
            roster: parse_roster(payload),
            scout_enabled: get_bool(payload, &["scoutActivated", "scoutEnabled"])
                .unwrap_or(true),
        })),

        "scout_start" => Some(ConferenceEvent::ScoutStarted),
        "scout_complete" => Some(ConferenceEvent::ScoutCompleted {
            sources_found: get_u64(payload, &["sourcesFound", "sources"]),
        }),

        // Flat agent addressing; §"agent_start"/"agent_progress" are
        // accepted as aliases of the thinking/token spellings.
        "agent_thinking" | "agent_start" => {
            let role = require_role(name, payload)?;
            Some(ConferenceEvent::AgentStarted { role, lane: None })
        }
        "agent_token" | "agent_progress" => {
            let role = require_role(name, payload)?;
            Some(ConferenceEvent::AgentProgress {
                role,
                lane: None,
                tokens_generated: get_u64(payload, &["tokensGenerated"]),
                tokens_estimated: get_u64(payload, &["tokensEstimated"]),
                content_delta: get_str(payload, &["content", "delta"]).map(String::from),
            })
        }
        "agent_complete" => {
            let role = require_role(name, payload)?;
            Some(ConferenceEvent::AgentCompleted {
                role,
                lane: None,
                confidence: get_f64(payload, &["confidence"]),
                content: get_str(payload, &["content"]).map(String::from),
            })
        }
        "agent_error" => {
            let role = require_role(name, payload)?;
            Some(ConferenceEvent::AgentFailed {
                role,
                lane: None,
                message: get_str(payload, &["message", "error"])
                    .unwrap_or("agent failed")
                    .to_string(),
            })
        }

        "lane_a_agent" => decode_lane_agent(name, Lane::Evidence, payload),
        "lane_b_agent" => decode_lane_agent(name, Lane::Exploratory, payload),

        "cross_exam_start" => Some(ConferenceEvent::CrossExamStarted),
        "cross_exam_critique" => Some(ConferenceEvent::CritiqueRaised(Critique {
            critic: get_str(payload, &["critic"]).and_then(|s| s.parse().ok()),
            target: get_str(payload, &["target"]).and_then(|s| s.parse().ok()),
            summary: get_str(payload, &["summary", "critique"])
                .unwrap_or_default()
                .to_string(),
        })),
        "cross_exam_complete" => Some(ConferenceEvent::CrossExamCompleted),

        "arbitration_start" => Some(ConferenceEvent::ArbitrationStarted),
        "arbitration_token" => Some(ConferenceEvent::ArbitrationDelta {
            content: get_str(payload, &["content", "delta"])
                .unwrap_or_default()
                .to_string(),
        }),
        "arbitration_complete" => Some(ConferenceEvent::ArbitrationCompleted {
            verdict: payload
                .get("verdict")
                .and_then(parse_verdict)
                .or_else(|| parse_verdict(payload)),
        }),

        "fragility_start" => Some(ConferenceEvent::FragilityStarted),
        "fragility_test" => Some(ConferenceEvent::FragilityProbed {
            probe: get_str(payload, &["probe", "test"]).unwrap_or_default().to_string(),
            held: get_bool(payload, &["held", "survived"]).unwrap_or(true),
        }),
        "fragility_complete" => Some(ConferenceEvent::FragilityCompleted {
            report: parse_fragility(payload).unwrap_or(FragilityReport {
                survived: 0,
                total: 0,
            }),
        }),

        "conference_complete" => Some(ConferenceEvent::ConferenceCompleted {
            result: payload
                .get("result")
                .and_then(parse_verdict)
                .or_else(|| parse_verdict(payload)),
        }),
        "error" | "conference_error" => Some(ConferenceEvent::ConferenceFailed {
            message: get_str(payload, &["message", "error"])
                .unwrap_or("connection lost")
                .to_string(),
        }),

        other => {
            trace!("Decode: ignoring unknown event '{}'", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_routing_complete() {
        let payload = json!({
            "mode": "COMPLEX_DILEMMA",
            "activeAgents": ["empiricist", "theorist", "unknown_role"],
            "scoutActivated": false,
        });
        let event = decode_event("routing_complete", &payload).unwrap();
        let ConferenceEvent::RoutingDecided(decision) = event else {
            panic!("wrong variant");
        };
        assert_eq!(decision.mode, Some(DeliberationMode::ComplexDilemma));
        // Unknown roster roles are skipped, not fatal.
        assert_eq!(
            decision.roster,
            vec![AgentRole::Empiricist, AgentRole::Theorist]
        );
        assert!(!decision.scout_enabled);
    }

    #[test]
    fn decode_agent_aliases() {
        let payload = json!({"role": "empiricist"});
        assert_eq!(
            decode_event("agent_thinking", &payload),
            decode_event("agent_start", &payload)
        );

        let progress = json!({"role": "empiricist", "tokensGenerated": 100, "tokensEstimated": 500});
        assert_eq!(
            decode_event("agent_token", &progress),
            decode_event("agent_progress", &progress)
        );
    }

    #[test]
    fn decode_agent_progress_fields() {
        let payload = json!({
            "role": "skeptic",
            "tokensGenerated": 42,
            "tokensEstimated": 400,
            "content": "because ",
        });
        let event = decode_event("agent_token", &payload).unwrap();
        assert_eq!(
            event,
            ConferenceEvent::AgentProgress {
                role: AgentRole::Skeptic,
                lane: None,
                tokens_generated: Some(42),
                tokens_estimated: Some(400),
                content_delta: Some("because ".to_string()),
            }
        );
    }

    #[test]
    fn agent_event_without_role_dropped() {
        assert!(decode_event("agent_token", &json!({"tokensGenerated": 5})).is_none());
        assert!(decode_event("agent_complete", &json!({"role": "oracle"})).is_none());
    }

    #[test]
    fn decode_lane_scoped_agent() {
        let payload = json!({
            "role": "theorist",
            "status": "token",
            "tokensGenerated": 10,
        });
        let event = decode_event("lane_b_agent", &payload).unwrap();
        let ConferenceEvent::AgentProgress { role, lane, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(role, AgentRole::Theorist);
        assert_eq!(lane, Some(Lane::Exploratory));

        let errored = json!({"role": "theorist", "status": "error", "message": "timeout"});
        assert!(matches!(
            decode_event("lane_a_agent", &errored),
            Some(ConferenceEvent::AgentFailed { .. })
        ));
    }

    #[test]
    fn decode_terminal_events() {
        let complete = json!({"result": {"summary": "proceed", "confidence": 0.82}});
        let event = decode_event("conference_complete", &complete).unwrap();
        let ConferenceEvent::ConferenceCompleted { result: Some(verdict) } = event else {
            panic!("wrong variant");
        };
        assert_eq!(verdict.summary, "proceed");
        assert_eq!(verdict.confidence, Some(0.82));

        let failed = decode_event("conference_error", &json!({"message": "budget exceeded"}));
        assert_eq!(
            failed,
            Some(ConferenceEvent::ConferenceFailed {
                message: "budget exceeded".to_string()
            })
        );

        // No structured payload: normalized description.
        let bare = decode_event("error", &Value::Null);
        assert_eq!(
            bare,
            Some(ConferenceEvent::ConferenceFailed {
                message: "connection lost".to_string()
            })
        );
    }

    #[test]
    fn decode_conference_complete_without_result() {
        assert_eq!(
            decode_event("conference_complete", &json!({})),
            Some(ConferenceEvent::ConferenceCompleted { result: None })
        );
    }

    #[test]
    fn decode_fragility_events() {
        let probe = json!({"probe": "reverse the premise", "held": false});
        assert_eq!(
            decode_event("fragility_test", &probe),
            Some(ConferenceEvent::FragilityProbed {
                probe: "reverse the premise".to_string(),
                held: false,
            })
        );

        let done = json!({"survived": 4, "total": 5});
        assert_eq!(
            decode_event("fragility_complete", &done),
            Some(ConferenceEvent::FragilityCompleted {
                report: FragilityReport {
                    survived: 4,
                    total: 5
                }
            })
        );
    }

    #[test]
    fn decode_critique() {
        let payload = json!({
            "critic": "skeptic",
            "target": "empiricist",
            "summary": "correlation only",
        });
        let event = decode_event("cross_exam_critique", &payload).unwrap();
        let ConferenceEvent::CritiqueRaised(critique) = event else {
            panic!("wrong variant");
        };
        assert_eq!(critique.critic, Some(AgentRole::Skeptic));
        assert_eq!(critique.target, Some(AgentRole::Empiricist));
        assert_eq!(critique.summary, "correlation only");
    }

    #[test]
    fn unknown_event_names_ignored() {
        assert!(decode_event("heartbeat", &json!({})).is_none());
        assert!(decode_event("", &Value::Null).is_none());
    }
}
