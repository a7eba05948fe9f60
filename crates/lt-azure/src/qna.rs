//! Custom question answering client

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lt_core::QnaConfig;

use crate::error::{AzureError, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    top: u32,
    question: &'a str,
    include_unstructured_sources: bool,
    answer_span_request: AnswerSpanRequest,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerSpanRequest {
    enable: bool,
    top_answers_with_span: u32,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    answers: Vec<KnowledgeBaseAnswer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnowledgeBaseAnswer {
    answer: String,
    #[serde(default)]
    confidence_score: Option<f32>,
}

/// Knowledge-base question answering client
#[derive(Clone)]
pub struct QnaClient {
    client: Client,
    config: QnaConfig,
}

impl QnaClient {
    /// Create a new question answering client
    pub fn new(config: &QnaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AzureError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Ask the knowledge base for its best answer to `question`.
    ///
    /// Any status other than 200 yields `None`, as does a response
    /// without answers.
    pub async fn answer(&self, question: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/language/:query-knowledgebases",
            self.config.endpoint.trim_end_matches('/')
        );

        let body = QueryRequest {
            top: 1,
            question,
            include_unstructured_sources: true,
            answer_span_request: AnswerSpanRequest {
                enable: true,
                top_answers_with_span: 1,
            },
        };

        debug!("Querying knowledge base {}", self.config.project_name);

        let response = self
            .client
            .post(&url)
            .query(&[
                ("projectName", self.config.project_name.as_str()),
                ("api-version", self.config.api_version.as_str()),
                ("deploymentName", self.config.deployment_name.as_str()),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Knowledge base query returned {}", status);
            return Ok(None);
        }

        let data: QueryResponse = response
            .json()
            .await
            .map_err(|e| AzureError::ParseError(e.to_string()))?;

        let answer = data.answers.into_iter().next();
        if let Some(answer) = &answer {
            info!(
                "Knowledge base answered (confidence {:?})",
                answer.confidence_score
            );
        }

        Ok(answer.map(|a| a.answer))
    }
}
