use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::config::EmailConfig;
use crate::utils::error::{AppError, Result};

const MAIL_SEND_PATH: &str = "/v3/mail/send";

pub struct EmailNotifier {
    client: Client,
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        EmailNotifier {
            client: Client::new(),
            config,
        }
    }

    /// Submits the single restock alert to the delivery API. The alert goes
    /// to the verified sender address. One call sends one email; the caller
    /// is responsible for invoking this at most once per run.
    pub async fn notify_restock(&self, product_url: &str, size: &str) -> Result<()> {
        info!("Preparing to send the restock notification email");

        let endpoint = format!(
            "{}{}",
            self.config.api_base.trim_end_matches('/'),
            MAIL_SEND_PATH
        );
        let payload = self.mail_payload(product_url, size);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(
                "Notification email accepted by the delivery API (status {})",
                status.as_u16()
            );
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(AppError::Delivery {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn format_subject(&self, size: &str) -> String {
        format!("Stock Alert: Size {} is Back!", size)
    }

    fn format_text_body(&self, product_url: &str, size: &str) -> String {
        let mut text = String::new();

        text.push_str("Hello,\n\n");
        text.push_str(&format!(
            "Good news! Size '{}' for the item you were watching is back in stock.\n\n",
            size
        ));
        text.push_str(&format!(
            "Buy it now before it's gone again:\n{}\n\n",
            product_url
        ));
        text.push_str("Regards,\nRestock Sentry");

        text
    }

    fn mail_payload(&self, product_url: &str, size: &str) -> serde_json::Value {
        json!({
            "personalizations": [{
                "to": [{ "email": self.config.sender }]
            }],
            "from": { "email": self.config.sender },
            "subject": self.format_subject(size),
            "content": [{
                "type": "text/plain",
                "value": self.format_text_body(product_url, size)
            }]
        })
    }
}
