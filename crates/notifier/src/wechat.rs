// In crates/notifier/src/wechat.rs

use std::time::Duration;

use app_config::WeChatSettings;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{AlertPayload, Error, Notifier, Result};

/// Pushes alerts as text messages through a WeChat official (test) account.
#[derive(Debug, Clone)]
pub struct WeChatNotifier {
    http_client: reqwest::Client,
    api_base_url: String,
    app_id: String,
    app_secret: String,
    open_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    touser: &'a str,
    msgtype: &'static str,
    text: TextContent,
}

#[derive(Debug, Serialize)]
struct TextContent {
    content: String,
}

impl WeChatNotifier {
    pub fn new(settings: &WeChatSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            app_id: settings.app_id.clone(),
            app_secret: settings.app_secret.clone(),
            open_id: settings.open_id.clone(),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let body = self
            .http_client
            .get(format!("{}/cgi-bin/token", self.api_base_url))
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.app_id.as_str()),
                ("secret", self.app_secret.as_str()),
            ])
            .send()
            .await?
            .text()
            .await?;

        parse_token(&body)
    }

    fn text_message(&self, payload: &AlertPayload) -> TextMessage<'_> {
        TextMessage {
            touser: &self.open_id,
            msgtype: "text",
            text: TextContent { content: payload.message() },
        }
    }
}

#[async_trait]
impl Notifier for WeChatNotifier {
    fn name(&self) -> &'static str {
        "wechat"
    }

    async fn notify(&self, payload: &AlertPayload) -> Result<()> {
        let token = self.access_token().await?;

        let body = self
            .http_client
            .post(format!("{}/cgi-bin/message/custom/send", self.api_base_url))
            .query(&[("access_token", token.as_str())])
            .json(&self.text_message(payload))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        check_send(&body)?;
        tracing::info!(alert_id = payload.alert_id, symbol = %payload.symbol, "WeChat alert delivered.");
        Ok(())
    }
}

fn parse_token(body: &str) -> Result<String> {
    let response: TokenResponse = serde_json::from_str(body)?;
    match response.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::TokenUnavailable { code: response.errcode, message: response.errmsg }),
    }
}

fn check_send(body: &str) -> Result<()> {
    let response: SendResponse = serde_json::from_str(body)?;
    if response.errcode != 0 {
        return Err(Error::Rejected { code: response.errcode, message: response.errmsg });
    }
    Ok(())
}
