//! Remote captioning: one blocking vision call per image, no retries.
//!
//! The request inlines the original (pre-filter) image as a base64 data-URI
//! in an OpenAI-compatible `chat/completions` body. Failure of any kind —
//! missing snapshot file, connection error, non-2xx status, malformed JSON,
//! missing response field — degrades to an empty description: the caption is
//! decoration, and losing it must never cost the image its other filters or
//! its re-insertion.
//!
//! There is deliberately no retry and no explicit timeout beyond what the
//! transport defaults to; the pipeline blocks on each call.

use crate::config::RunConfig;
use crate::pipeline::encode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

// ── Wire format ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CaptionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: usize,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct CaptionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// ── Captioner ────────────────────────────────────────────────────────────

/// Describe the image stored at `image_path` via the configured endpoint.
///
/// Returns the description text, or `""` on any failure (logged, never
/// propagated). The path points at the scoped per-image snapshot of the
/// *original* pixels, written by the caller immediately before this call.
pub fn describe_image(
    client: &reqwest::blocking::Client,
    image_path: &Path,
    config: &RunConfig,
) -> String {
    let bytes = match std::fs::read(image_path) {
        Ok(b) => b,
        Err(e) => {
            warn!("describe_image: cannot read '{}': {e}", image_path.display());
            return String::new();
        }
    };

    let request = CaptionRequest {
        model: &config.model,
        messages: vec![Message {
            role: "user",
            content: vec![
                ContentPart::Text {
                    text: &config.description_prompt,
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: encode::jpeg_data_uri(&bytes),
                    },
                },
            ],
        }],
        max_tokens: config.max_tokens,
    };

    let response = match client
        .post(&config.api_base)
        .bearer_auth(config.openai_key.as_deref().unwrap_or(""))
        .json(&request)
        .send()
    {
        Ok(r) => r,
        Err(e) => {
            warn!("describe_image: request failed: {e}");
            return String::new();
        }
    };

    let status = response.status();
    let body = match response.text() {
        Ok(b) => b,
        Err(e) => {
            warn!("describe_image: failed to read response body: {e}");
            return String::new();
        }
    };
    debug!("describe_image: response ({status}): {body}");

    if !status.is_success() {
        warn!("describe_image: endpoint returned {status}");
        return String::new();
    }

    match serde_json::from_str::<CaptionResponse>(&body) {
        Ok(parsed) => match parsed.choices.into_iter().next() {
            Some(choice) => choice.message.content,
            None => {
                warn!("describe_image: response contained no choices");
                String::new()
            }
        },
        Err(e) => {
            warn!("describe_image: malformed response: {e}");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// One-shot HTTP stub: accepts a single request, reads it fully, answers
    /// with the given status line and body, then closes.
    fn stub_endpoint(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut data = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers, then the declared body length.
            let header_end = loop {
                let n = stream.read(&mut buf).unwrap_or(0);
                if n == 0 {
                    return;
                }
                data.extend_from_slice(&buf[..n]);
                if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let headers = String::from_utf8_lossy(&data[..header_end]).to_lowercase();
            let content_length: usize = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            while data.len() < header_end + content_length {
                let n = stream.read(&mut buf).unwrap_or(0);
                if n == 0 {
                    break;
                }
                data.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).ok();
        });

        format!("http://{addr}")
    }

    fn snapshot_file() -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([255, 0, 0]),
        ));
        std::fs::write(tmp.path(), encode::jpeg_bytes(&img).unwrap()).unwrap();
        tmp
    }

    fn config_for(api_base: String) -> RunConfig {
        RunConfig::builder()
            .describe(true)
            .openai_key("sk-test")
            .api_base(api_base)
            .build()
            .unwrap()
    }

    #[test]
    fn well_formed_response_yields_description() {
        let base = stub_endpoint(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"A red square on white"}}]}"#,
        );
        let snapshot = snapshot_file();
        let client = reqwest::blocking::Client::new();
        let description = describe_image(&client, snapshot.path(), &config_for(base));
        assert_eq!(description, "A red square on white");
    }

    #[test]
    fn non_2xx_yields_empty_string() {
        let base = stub_endpoint("500 Internal Server Error", r#"{"error":"boom"}"#);
        let snapshot = snapshot_file();
        let client = reqwest::blocking::Client::new();
        let description = describe_image(&client, snapshot.path(), &config_for(base));
        assert_eq!(description, "");
    }

    #[test]
    fn malformed_json_yields_empty_string() {
        let base = stub_endpoint("200 OK", "not json at all {{{");
        let snapshot = snapshot_file();
        let client = reqwest::blocking::Client::new();
        let description = describe_image(&client, snapshot.path(), &config_for(base));
        assert_eq!(description, "");
    }

    #[test]
    fn missing_choices_yields_empty_string() {
        let base = stub_endpoint("200 OK", r#"{"choices":[]}"#);
        let snapshot = snapshot_file();
        let client = reqwest::blocking::Client::new();
        let description = describe_image(&client, snapshot.path(), &config_for(base));
        assert_eq!(description, "");
    }

    #[test]
    fn missing_snapshot_yields_empty_string_without_network() {
        // api_base is never contacted: the file read fails first.
        let config = config_for("http://127.0.0.1:1".to_string());
        let client = reqwest::blocking::Client::new();
        let description = describe_image(&client, Path::new("/nonexistent/snap.jpg"), &config);
        assert_eq!(description, "");
    }

    #[test]
    fn request_body_serialises_to_expected_shape() {
        let request = CaptionRequest {
            model: "gpt-4o",
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text { text: "describe" },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: "data:image/jpeg;base64,AAAA".into(),
                        },
                    },
                ],
            }],
            max_tokens: 300,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 300);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"][0]["type"], "text");
        assert_eq!(value["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            value["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }
}
