use crate::domain::model::OutgoingEmail;
use crate::domain::ports::{EmailProvider, SendOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Brevo 風格的 transactional email HTTP API adapter。
/// 所有失敗（網路、逾時、4xx/5xx）一律轉成 Rejected 回傳，
/// 寄送迴圈才能把單封失敗當資料收集。
pub struct HttpEmailProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    from_email: String,
    from_name: String,
}

impl HttpEmailProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        // 單封寄送的逾時在這裡設定，批次迴圈本身不設總時限
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            from_email: from_email.into(),
            from_name: from_name.into(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: Party<'a>,
    to: Vec<Recipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
    headers: UnsubscribeHeaders,
}

#[derive(Serialize)]
struct Party<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct Recipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct UnsubscribeHeaders {
    #[serde(rename = "List-Unsubscribe")]
    list_unsubscribe: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: Option<String>,
}

#[async_trait]
impl EmailProvider for HttpEmailProvider {
    async fn send(&self, email: &OutgoingEmail) -> SendOutcome {
        let request = SendRequest {
            sender: Party {
                name: &self.from_name,
                email: &self.from_email,
            },
            to: vec![Recipient { email: &email.to }],
            subject: &email.subject,
            html_content: &email.html,
            headers: UnsubscribeHeaders {
                list_unsubscribe: format!(
                    "<https://fanreach.app/unsubscribe/{}>",
                    email.unsubscribe_token
                ),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&request)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                return SendOutcome::Rejected {
                    error: format!("transport error: {}", e),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return SendOutcome::Rejected {
                error: format!("provider returned {}: {}", status, body.trim()),
            };
        }

        match response.json::<SendResponse>().await {
            Ok(body) => SendOutcome::Accepted {
                message_id: body
                    .message_id
                    .unwrap_or_else(|| "unknown".to_string()),
            },
            // 2xx 但 body 不是預期格式：寄送已被受理，不當失敗
            Err(e) => {
                tracing::debug!("Provider response body not parseable: {}", e);
                SendOutcome::Accepted {
                    message_id: "unknown".to_string(),
                }
            }
        }
    }
}
