//! WhatsApp front end over Twilio webhooks.

pub mod signature;
pub mod twiml;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::ParleyConfig;
use crate::error::{ParleyError, Result};
use crate::provider::http::{error_from_response, shared_client};
use crate::relay::{ImageInput, Relay};
use crate::types::ImageContent;

/// One media attachment of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub url: String,
    pub content_type: String,
}

impl MediaItem {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// The fields of a Twilio inbound-message webhook that the relay uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender, e.g. `whatsapp:+15551234567`; doubles as the conversation id.
    pub from: String,
    pub body: String,
    pub media: Vec<MediaItem>,
}

impl InboundMessage {
    /// Parse webhook form params.
    pub fn from_form(params: &BTreeMap<String, String>) -> Result<Self> {
        let from = params
            .get("From")
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .ok_or_else(|| ParleyError::InvalidArgument("Missing 'From' parameter".into()))?
            .to_string();
        let body = params.get("Body").map(|b| b.trim().to_string()).unwrap_or_default();

        let num_media = match params.get("NumMedia").map(|n| n.trim()) {
            Some(raw) if !raw.is_empty() => raw.parse::<usize>().map_err(|_| {
                ParleyError::InvalidArgument(format!("Invalid NumMedia '{raw}'"))
            })?,
            _ => 0,
        };

        let media = (0..num_media)
            .filter_map(|i| {
                let url = params.get(&format!("MediaUrl{i}"))?;
                let content_type = params
                    .get(&format!("MediaContentType{i}"))
                    .cloned()
                    .unwrap_or_default();
                Some(MediaItem {
                    url: url.clone(),
                    content_type,
                })
            })
            .collect();

        Ok(Self { from, body, media })
    }
}

/// Handles Twilio WhatsApp webhooks by relaying them to the hosted agent.
#[derive(Debug, Clone)]
pub struct TwilioWhatsApp {
    relay: Relay,
    auth_token: Option<String>,
    account_sid: Option<String>,
    validate_signature: bool,
}

impl TwilioWhatsApp {
    pub fn new(relay: Relay, config: &ParleyConfig) -> Result<Self> {
        if config.validate_signature && config.twilio_auth_token.is_none() {
            return Err(ParleyError::Configuration(
                "TWILIO_AUTH_TOKEN is required when signature validation is enabled".into(),
            ));
        }
        Ok(Self {
            relay,
            auth_token: config.twilio_auth_token.clone(),
            account_sid: config.twilio_account_sid.clone(),
            validate_signature: config.validate_signature,
        })
    }

    /// Reject the request unless its signature verifies (when validation is on).
    pub fn check_signature(
        &self,
        url: &str,
        params: &BTreeMap<String, String>,
        signature: Option<&str>,
    ) -> Result<()> {
        if !self.validate_signature {
            return Ok(());
        }
        let token = self
            .auth_token
            .as_deref()
            .ok_or_else(|| ParleyError::Configuration("Missing TWILIO_AUTH_TOKEN".into()))?;
        match signature {
            Some(sig) if signature::verify_signature(token, url, params, sig) => Ok(()),
            _ => {
                warn!(%url, "Rejected webhook with invalid Twilio signature");
                Err(ParleyError::InvalidSignature)
            }
        }
    }

    /// Download image attachments and inline them as `data:` URLs.
    ///
    /// Non-image media is skipped.
    pub async fn fetch_images(&self, message: &InboundMessage) -> Result<Vec<ImageInput>> {
        let mut images = Vec::new();
        for item in message.media.iter() {
            if !item.is_image() {
                debug!(content_type = %item.content_type, "Skipping non-image media");
                continue;
            }
            let mut request = shared_client().get(&item.url);
            if let Some(ref sid) = self.account_sid {
                request = request.basic_auth(sid, self.auth_token.as_deref());
            }
            let resp = request.send().await?;
            if !resp.status().is_success() {
                return Err(error_from_response(resp).await);
            }
            let bytes = resp.bytes().await?;
            let image = ImageContent::from_bytes(&bytes, item.content_type.clone());
            images.push(ImageInput::from_url(image.to_data_url()));
        }
        Ok(images)
    }

    /// Handle one webhook call and return the TwiML reply.
    pub async fn handle(
        &self,
        url: &str,
        signature: Option<&str>,
        params: &BTreeMap<String, String>,
    ) -> Result<String> {
        self.check_signature(url, params, signature)?;
        let message = InboundMessage::from_form(params)?;
        info!(
            from = %message.from,
            media = message.media.len(),
            "Received WhatsApp message"
        );

        if message.body.is_empty() && message.media.is_empty() {
            return Ok(twiml::empty_response());
        }

        let images = self.fetch_images(&message).await?;
        if message.body.is_empty() && images.is_empty() {
            return Ok(twiml::message_response(
                "Sorry, I can only read text and images.",
            ));
        }

        let reply = self
            .relay
            .invoke(&message.from, &message.body, &images)
            .await?;
        Ok(twiml::message_response(&reply))
    }
}
