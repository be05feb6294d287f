use crate::actors::messages::{AppError, PaymentOutcome};
use crate::models::{CheckoutSession, DonorDetails, Money};
use async_trait::async_trait;

/// Defines the public interface for the payment boundary.
///
/// A real provider would issue the session server-side and report completion
/// through a webhook. The donation actor only relies on this contract, so any
/// provider (or the simulated one) can be plugged in.
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Opens a checkout session for `amount`.
    async fn create_session(
        &self,
        amount: Money,
        donor: &DonorDetails,
    ) -> Result<CheckoutSession, AppError>;

    /// Resolves once the provider has settled the session.
    async fn await_completion(&self, session: &CheckoutSession) -> PaymentOutcome;
}
