use crate::actors::messages::{AppError, PaymentOutcome};
use crate::actors::traits::PaymentGateway;
use crate::models::{CheckoutSession, DonorDetails, Money};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Stand-in for a card processor: every session succeeds after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    campaign_id: String,
    completion_delay: Duration,
}

impl SimulatedGateway {
    pub fn new(campaign_id: impl Into<String>, completion_delay: Duration) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            completion_delay,
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    #[instrument(skip(self, donor), fields(amount = %amount))]
    async fn create_session(
        &self,
        amount: Money,
        donor: &DonorDetails,
    ) -> Result<CheckoutSession, AppError> {
        let session = CheckoutSession {
            session_id: format!("demo_session_{}", Uuid::new_v4().simple()),
            amount,
            currency: "usd".to_string(),
            campaign_id: self.campaign_id.clone(),
        };
        info!(
            session_id = %session.session_id,
            donor_email = %donor.email,
            "checkout session opened"
        );
        Ok(session)
    }

    async fn await_completion(&self, session: &CheckoutSession) -> PaymentOutcome {
        if !self.completion_delay.is_zero() {
            tokio::time::sleep(self.completion_delay).await;
        }
        info!(session_id = %session.session_id, "simulated payment settled");
        PaymentOutcome::Succeeded
    }
}
