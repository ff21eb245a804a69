//! Chat responder
//!
//! Proxies chat messages to a richer upstream assistant when one is
//! configured, with a bounded timeout. When the upstream is missing or
//! unreachable the canned keyword-matched responses keep the endpoint
//! useful in degraded mode; only a message with no recognized keyword
//! gets a random pick.

use std::env;
use std::time::Duration;

use rand::seq::SliceRandom;
use serde_json::json;

use crate::models::chat::ChatResponse;

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

const CANNED_RESPONSES: [&str; 6] = [
    "**Waterfalls of Jharkhand**: Hundru Falls (98m, near Ranchi), Dassam Falls (44m, 40km from Ranchi), and Jonha Falls are must-visits. Best time: July-October during the monsoon.",
    "**Tribal Heritage**: Jharkhand is home to 32 tribal communities including Santhal, Munda, and Oraon. Plan around Sarhul (March-April) and Karma (August-September) for the festivals.",
    "**Trekking**: Parasnath Hill (1365m, the state's highest peak) offers spiritual trekking with Jain temples; Netarhat (1128m) has famous sunrise and sunset points. Best season: October-March.",
    "**Local Cuisine**: Try Litti Chokha, Rugra (mushroom curry), and bamboo-shoot preparations. The main food markets are Main Road in Ranchi and Sakchi in Jamshedpur.",
    "**Wildlife**: Betla National Park (Palamau) for tigers and elephants, Dalma Wildlife Sanctuary for elephant herds. Best time: November-April; book forest rest houses in advance.",
    "**Temples**: Jagannath Temple Ranchi, Baidyanath Dham Deoghar (one of the 12 Jyotirlingas), and the Sun Temple at Bundu. Deoghar is about 250km from Ranchi.",
];

// (keywords, index into CANNED_RESPONSES)
const KEYWORD_TABLE: [(&[&str], usize); 6] = [
    (&["waterfall", "falls"], 0),
    (&["tribal", "culture", "festival"], 1),
    (&["trek", "hill", "mountain"], 2),
    (&["food", "cuisine", "eat"], 3),
    (&["wildlife", "animal", "safari"], 4),
    (&["temple", "religious", "spiritual"], 5),
];

struct Upstream {
    client: reqwest::Client,
    url: String,
}

pub struct ChatService {
    upstream: Option<Upstream>,
}

impl ChatService {
    pub fn from_env() -> Self {
        let upstream = env::var("CHAT_BACKEND_URL").ok().and_then(|url| {
            let timeout_secs = env::var("CHAT_BACKEND_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

            match reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
            {
                Ok(client) => Some(Upstream { client, url }),
                Err(err) => {
                    log::warn!(
                        "Chat upstream client failed to build, serving canned responses only: {}",
                        err
                    );
                    None
                }
            }
        });

        Self { upstream }
    }

    pub fn upstream_configured(&self) -> bool {
        self.upstream.is_some()
    }

    /// Answer a chat message, degrading to the canned responder when the
    /// upstream is unavailable or slow.
    pub async fn respond(&self, message: &str) -> String {
        if let Some(upstream) = &self.upstream {
            match upstream
                .client
                .post(&upstream.url)
                .json(&json!({ "message": message }))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    match response.json::<ChatResponse>().await {
                        Ok(body) => return body.response,
                        Err(err) => {
                            log::warn!("Chat upstream returned a malformed body: {}", err);
                        }
                    }
                }
                Ok(response) => {
                    log::warn!("Chat upstream answered with status {}", response.status());
                }
                Err(err) => {
                    log::warn!("Chat upstream unreachable: {}", err);
                }
            }
        }
        fallback_response(message)
    }
}

/// Deterministic keyword match over the canned categories; a random pick
/// only when nothing matches.
pub fn fallback_response(message: &str) -> String {
    let message = message.to_lowercase();
    for (keywords, index) in KEYWORD_TABLE {
        if keywords.iter().any(|keyword| message.contains(keyword)) {
            return CANNED_RESPONSES[index].to_string();
        }
    }
    CANNED_RESPONSES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&CANNED_RESPONSES[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waterfall_keyword_selects_waterfalls_response() {
        let response = fallback_response("best waterfalls near Ranchi");
        assert!(response.contains("Hundru Falls"));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert_eq!(
            fallback_response("TEMPLE tour?"),
            fallback_response("temple tour?")
        );
    }

    #[test]
    fn unmatched_message_still_gets_a_canned_response() {
        let response = fallback_response("hello there");
        assert!(CANNED_RESPONSES.contains(&response.as_str()));
    }

    #[actix_rt::test]
    async fn service_without_upstream_answers_from_canned_set() {
        let service = ChatService { upstream: None };
        assert!(!service.upstream_configured());
        let response = service.respond("best waterfalls near Ranchi").await;
        assert!(response.contains("Hundru Falls"));
    }
}
