//! Request/response shapes of the `documents:annotateText` REST method.
//! Proto3 JSON omits zero values, so every numeric field defaults.

use serde::{Deserialize, Serialize};

use crate::models::signal::{EntityType, Sentiment};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnnotateRequest<'a> {
    document: Document<'a>,
    features: Features,
    encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    doc_type: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Features {
    extract_syntax: bool,
    extract_entities: bool,
    extract_document_sentiment: bool,
    extract_entity_sentiment: bool,
    classify_text: bool,
}

impl<'a> AnnotateRequest<'a> {
    pub(super) fn plain_text(content: &'a str, classify: bool) -> Self {
        Self {
            document: Document {
                doc_type: "PLAIN_TEXT",
                content,
            },
            features: Features {
                extract_syntax: true,
                extract_entities: true,
                extract_document_sentiment: true,
                extract_entity_sentiment: true,
                classify_text: classify,
            },
            encoding_type: "UTF8",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct WireSentiment {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    magnitude: f64,
}

impl From<WireSentiment> for Sentiment {
    fn from(s: WireSentiment) -> Self {
        Sentiment {
            score: s.score,
            magnitude: s.magnitude,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct WireEntity {
    pub name: String,
    #[serde(rename = "type", default)]
    pub entity_type: EntityType,
    #[serde(default)]
    pub salience: f64,
    #[serde(default)]
    pub sentiment: WireSentiment,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct TextSpan {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireSentence {
    #[serde(default)]
    pub text: TextSpan,
    #[serde(default)]
    pub sentiment: WireSentiment,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireCategory {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnnotateResponse {
    #[serde(default)]
    pub document_sentiment: WireSentiment,
    #[serde(default)]
    pub entities: Vec<WireEntity>,
    #[serde(default)]
    pub sentences: Vec<WireSentence>,
    #[serde(default)]
    pub categories: Vec<WireCategory>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_to_backend_shape() {
        let req = AnnotateRequest::plain_text("hello", true);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["document"]["type"], "PLAIN_TEXT");
        assert_eq!(v["document"]["content"], "hello");
        assert_eq!(v["features"]["extractEntitySentiment"], true);
        assert_eq!(v["features"]["classifyText"], true);
        assert_eq!(v["encodingType"], "UTF8");
    }

    #[test]
    fn test_empty_response_deserializes() {
        let resp: AnnotateResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.entities.is_empty());
        assert_eq!(resp.document_sentiment.score, 0.0);
    }
}
