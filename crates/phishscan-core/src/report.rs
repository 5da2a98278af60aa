//! Verdicts and output formatting for check results.

use std::fmt;

use serde::Serialize;

use crate::error::{DetectError, Result};

/// Binary verdict. Class indices follow the sorted label encoding of the
/// training data: `legitimate` is 0, `phishing` is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Legitimate,
    Phishing,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Legitimate, Label::Phishing];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Decode a dataset `status` value.
    pub fn from_status(status: &str) -> Option<Self> {
        match status.trim() {
            "legitimate" => Some(Label::Legitimate),
            "phishing" => Some(Label::Phishing),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Legitimate => "legitimate",
            Label::Phishing => "phishing",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted label and the probability the model assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub confidence: f32,
}

impl Prediction {
    pub fn is_phishing(&self) -> bool {
        self.label == Label::Phishing
    }

    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headline = match self.label {
            Label::Phishing => "Phishing/Fake Website Detected!",
            Label::Legitimate => "Legitimate Website",
        };
        write!(f, "{headline} (Confidence: {:.2}%)", self.confidence_percent())
    }
}

/// Result of checking one URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn new(url: impl Into<String>, outcome: Result<Prediction>) -> Self {
        let url = url.into();
        match outcome {
            Ok(p) => Self {
                url,
                label: Some(p.label),
                confidence: Some(p.confidence),
                error: None,
            },
            Err(e) => Self {
                url,
                label: None,
                confidence: None,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_phishing(&self) -> bool {
        self.label == Some(Label::Phishing)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {s}. Use 'text' or 'json'.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub phishing: usize,
    pub legitimate: usize,
    pub errors: usize,
}

impl Summary {
    pub fn of(results: &[CheckResult]) -> Self {
        let phishing = results.iter().filter(|r| r.is_phishing()).count();
        let errors = results.iter().filter(|r| r.is_error()).count();
        Self {
            total: results.len(),
            phishing,
            legitimate: results.len() - phishing - errors,
            errors,
        }
    }
}

pub fn render_results(results: &[CheckResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(results)),
        OutputFormat::Json => render_json(results),
    }
}

pub fn print_results(results: &[CheckResult], format: OutputFormat) -> Result<()> {
    println!("{}", render_results(results, format)?);
    Ok(())
}

fn render_text(results: &[CheckResult]) -> String {
    let summary = Summary::of(results);
    let rule = "=".repeat(70);
    let mut out = Vec::new();

    out.push(String::new());
    out.push(rule.clone());
    out.push("CHECK RESULTS".to_string());
    out.push(rule.clone());

    let phishing: Vec<_> = results.iter().filter(|r| r.is_phishing()).collect();
    if !phishing.is_empty() {
        out.push(String::new());
        out.push(format!("PHISHING URLS ({}):", phishing.len()));
        for r in phishing {
            let confidence = r.confidence.unwrap_or_default() * 100.0;
            out.push(format!("  [{confidence:6.2}%] {}", r.url));
        }
    }

    let errors: Vec<_> = results.iter().filter(|r| r.is_error()).collect();
    if !errors.is_empty() {
        out.push(String::new());
        out.push(format!("ERRORS ({}):", errors.len()));
        for r in errors {
            let err = r.error.as_deref().unwrap_or("unknown");
            out.push(format!("  [ERR    ] {} -- {}", r.url, err));
        }
    }

    out.push(String::new());
    out.push("SUMMARY:".to_string());
    out.push(format!("  Total URLs checked: {}", summary.total));
    out.push(format!("  Phishing:           {}", summary.phishing));
    out.push(format!("  Legitimate:         {}", summary.legitimate));
    out.push(format!("  Errors:             {}", summary.errors));
    out.push(rule);

    out.join("\n")
}

fn render_json(results: &[CheckResult]) -> Result<String> {
    let output = serde_json::json!({
        "results": results,
        "summary": Summary::of(results),
    });
    serde_json::to_string_pretty(&output).map_err(DetectError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CheckResult> {
        vec![
            CheckResult::new(
                "http://paypal-login.example/verify",
                Ok(Prediction {
                    label: Label::Phishing,
                    confidence: 0.9712,
                }),
            ),
            CheckResult::new(
                "https://example.com/",
                Ok(Prediction {
                    label: Label::Legitimate,
                    confidence: 0.88,
                }),
            ),
            CheckResult::new("", Err(DetectError::Extraction("empty URL".into()))),
        ]
    }

    #[test]
    fn verdict_messages() {
        let phishing = Prediction {
            label: Label::Phishing,
            confidence: 0.9712,
        };
        assert_eq!(
            phishing.to_string(),
            "Phishing/Fake Website Detected! (Confidence: 97.12%)"
        );
        let legit = Prediction {
            label: Label::Legitimate,
            confidence: 0.88,
        };
        assert_eq!(legit.to_string(), "Legitimate Website (Confidence: 88.00%)");
    }

    #[test]
    fn label_encoding_is_sorted() {
        assert_eq!(Label::from_index(0), Some(Label::Legitimate));
        assert_eq!(Label::from_index(1), Some(Label::Phishing));
        assert_eq!(Label::from_index(2), None);
        assert_eq!(Label::from_status(" phishing "), Some(Label::Phishing));
        assert_eq!(Label::from_status("Phishing"), None);
        assert_eq!(Label::Phishing.index(), 1);
    }

    #[test]
    fn summary_counts() {
        let summary = Summary::of(&sample());
        assert_eq!(
            summary,
            Summary {
                total: 3,
                phishing: 1,
                legitimate: 1,
                errors: 1,
            }
        );
    }

    #[test]
    fn json_output_skips_absent_fields() {
        let json = render_results(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["total"], 3);
        assert_eq!(value["results"][0]["label"], "phishing");
        assert!(value["results"][0].get("error").is_none());
        assert!(value["results"][2].get("label").is_none());
        assert_eq!(
            value["results"][2]["error"],
            "feature extraction failed: empty URL"
        );
    }

    #[test]
    fn text_output_lists_phishing_and_errors() {
        let text = render_results(&sample(), OutputFormat::Text).unwrap();
        assert!(text.contains("PHISHING URLS (1):"));
        assert!(text.contains("http://paypal-login.example/verify"));
        assert!(text.contains("ERRORS (1):"));
        assert!(text.contains("Legitimate:         1"));
        assert!(!text.contains("https://example.com/"));
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
