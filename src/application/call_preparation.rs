//! Prepare-call use case

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::auth_token::TokenManager;
use crate::domain::call::{CallDescriptor, CallRequest, DescriptorStatus};
use crate::domain::dial_strategy::{digits_only, DialStrategy, DialTarget, StrategyKind, StrategyResolver};
use crate::domain::phone::NormalizedPhone;
use crate::domain::shared::CallId;

/// A descriptor plus the steps shown to the person placing the call
#[derive(Debug, Clone)]
pub struct PreparedCall {
    pub descriptor: CallDescriptor,
    pub instructions: Vec<String>,
}

impl PreparedCall {
    pub fn success(&self) -> bool {
        self.descriptor.is_dialable()
    }
}

/// Runs normalize → token → resolve for one call.
pub struct CallPreparationService {
    tokens: Arc<TokenManager>,
    resolver: StrategyResolver,
}

impl CallPreparationService {
    pub fn new(tokens: Arc<TokenManager>, resolver: StrategyResolver) -> Self {
        Self { tokens, resolver }
    }

    /// Always returns something; malformed input and missing configuration
    /// show up in the status and message.
    pub fn prepare_call(&self, request: &CallRequest) -> PreparedCall {
        let call_id = CallId::new();
        let phone = NormalizedPhone::parse(&request.phone_number);

        info!(
            "Preparing call {} for user {:?} to {}",
            call_id, request.user_id, phone.display
        );

        let token = self.tokens.ensure_valid_token();
        let target = DialTarget {
            phone: &phone,
            contact_name: request.contact_name.as_deref(),
            extension: request.extension.as_deref(),
        };
        let strategies = self.resolver.resolve(target, &token);
        let status = DescriptorStatus::classify(&phone, &strategies);

        let message = match phone.check_dialable(&request.phone_number) {
            Err(e) => {
                warn!("Call {}: {}", call_id, e);
                e.to_string()
            }
            Ok(()) => match status {
                DescriptorStatus::FallbackOnly => format!(
                    "Telephony integration unavailable; dial {} from this device",
                    phone.display
                ),
                _ => format!(
                    "Call to {} ready with {} dial options",
                    phone.display,
                    strategies.len()
                ),
            },
        };

        debug!(
            "Call {} resolved {} strategies ({})",
            call_id,
            strategies.len(),
            status.as_str()
        );

        let instructions = instructions(&phone, &strategies, request.extension.as_deref(), status);

        PreparedCall {
            descriptor: CallDescriptor {
                call_id,
                normalized_phone: phone,
                strategies,
                status,
                message,
            },
            instructions,
        }
    }
}

fn instructions(
    phone: &NormalizedPhone,
    strategies: &[DialStrategy],
    extension: Option<&str>,
    status: DescriptorStatus,
) -> Vec<String> {
    let mut steps: Vec<String> = strategies
        .iter()
        .map(|strategy| match strategy.kind {
            StrategyKind::WebDialer => {
                "Open the web dialer link to start the call from your browser".to_string()
            }
            StrategyKind::Sip => {
                "Open the SIP link in your softphone to place the call over VoIP".to_string()
            }
            StrategyKind::DirectTel => {
                format!("Tap the phone link to dial {} from this device", phone.display)
            }
        })
        .collect();

    if let Some(ext) = extension.map(digits_only).filter(|ext| !ext.is_empty()) {
        steps.push(format!(
            "Extension {} is dialed automatically once the call connects",
            ext
        ));
    }

    if status == DescriptorStatus::FallbackOnly {
        steps.push("Configure telephony credentials to enable click-to-dial".to_string());
    }

    steps
}
