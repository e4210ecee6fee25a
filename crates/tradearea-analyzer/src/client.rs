//! HTTP client for the chat-completions endpoint that writes area analyses.

use std::time::Duration;

use reqwest::{Client, Url};
use tradearea_core::{Coordinates, LocationAnalysis, LocationDetails};

use crate::error::AnalyzerError;
use crate::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::types::{
    AnalysisPayload, ChatMessage, ChatRequest, ChatResponse, ErrorEnvelope, ResponseFormat,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/";

pub struct AnalyzerClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

impl AnalyzerClient {
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, AnalyzerError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`AnalyzerError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tradearea/0.1 (location-analysis)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| AnalyzerError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    /// Requests a generated analysis of the trade area around `address`.
    ///
    /// # Errors
    ///
    /// - [`AnalyzerError::UnexpectedStatus`] on a non-2xx response.
    /// - [`AnalyzerError::EmptyResponse`] when the completion has no content.
    /// - [`AnalyzerError::Deserialize`] when the envelope or the model's JSON
    ///   does not match the expected shape.
    /// - [`AnalyzerError::Http`] on network failure.
    pub async fn analyze(
        &self,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<LocationAnalysis, AnalyzerError> {
        let url = self
            .base_url
            .join("v1/chat/completions")
            .map_err(|_| AnalyzerError::InvalidBaseUrl(self.base_url.to_string()))?;

        let prompt = user_prompt(address, coordinates);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 0.7,
        };

        tracing::info!(model = %self.model, %address, "requesting location analysis");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "no error message".to_string());
            tracing::warn!(status = status.as_u16(), %message, "analysis request rejected");
            return Err(AnalyzerError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse =
            serde_json::from_str(&body).map_err(|e| AnalyzerError::Deserialize {
                context: "chat completion envelope".to_string(),
                source: e,
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AnalyzerError::EmptyResponse)?;

        parse_analysis(&content, address, coordinates)
    }
}

/// Parses the model's JSON reply. Tolerates a surrounding Markdown code fence.
fn parse_analysis(
    content: &str,
    address: &str,
    coordinates: Coordinates,
) -> Result<LocationAnalysis, AnalyzerError> {
    let json = strip_code_fence(content);
    let payload: AnalysisPayload =
        serde_json::from_str(json).map_err(|e| AnalyzerError::Deserialize {
            context: "analysis payload".to_string(),
            source: e,
        })?;

    let name = payload
        .location_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| address.to_owned());

    Ok(LocationAnalysis {
        location: LocationDetails {
            name,
            address: address.to_owned(),
            coordinates,
        },
        rankings: payload.rankings,
        analysis: payload.analysis,
        error: None,
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradearea_core::AreaType;

    const PAYLOAD: &str = r#"{
        "location_name": "South Congress",
        "rankings": {
            "areaType": {"value": "Urban", "description": "Walkable commercial corridor"},
            "population": {"value": "250k-500k", "description": "Dense core"}
        },
        "analysis": {
            "demographic_profile": "Young professionals.",
            "lifestyle_trends": "Live music.",
            "relevant_industries": "Tech, hospitality.",
            "physical_characteristics": "Grid streets.",
            "type_of_center": "Lifestyle center.",
            "nearby_businesses": "Boutiques."
        }
    }"#;

    #[test]
    fn parse_analysis_builds_location_details() {
        let analysis =
            parse_analysis(PAYLOAD, "1 S Congress Ave", Coordinates::new(-97.74, 30.25)).unwrap();
        assert_eq!(analysis.location.name, "South Congress");
        assert_eq!(analysis.location.address, "1 S Congress Ave");
        assert_eq!(analysis.rankings.area_type.value, AreaType::Urban);
        assert_eq!(analysis.analysis.nearby_businesses, "Boutiques.");
        assert!(analysis.error.is_none());
    }

    #[test]
    fn parse_analysis_accepts_fenced_json() {
        let fenced = format!("```json\n{PAYLOAD}\n```");
        let analysis = parse_analysis(&fenced, "addr", Coordinates::new(-97.74, 30.25)).unwrap();
        assert_eq!(analysis.rankings.population.value, "250k-500k");
    }

    #[test]
    fn parse_analysis_falls_back_to_address_for_name() {
        let payload = r#"{"rankings": {
            "areaType": {"value": "Frontier", "description": ""},
            "population": {"value": "", "description": ""}
        }}"#;
        let analysis = parse_analysis(payload, "9 Elm St", Coordinates::new(-90.0, 40.0)).unwrap();
        assert_eq!(analysis.location.name, "9 Elm St");
        assert_eq!(analysis.rankings.area_type.value, AreaType::Error);
        assert!(analysis.analysis.is_empty());
    }

    #[test]
    fn parse_analysis_rejects_prose() {
        let err = parse_analysis("Sorry, I can't help.", "addr", Coordinates::new(-90.0, 40.0))
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Deserialize { .. }));
    }
}
