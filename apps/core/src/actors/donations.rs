use crate::actors::messages::{
    ActorError, AppError, DonationMessage, DonationReceipt, PaymentOutcome,
};
use crate::actors::traits::PaymentGateway;
use crate::models::{CheckoutSession, DonorDetails, Money, ProgressState};
use crate::notifications::{CampaignEvent, Notification};
use crate::progress::{ProgressTracker, ProgressUpdate};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};
use validator::Validate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAYMENT_TIMED_OUT: &str = "payment timed out";
const EVENT_CAPACITY: usize = 64;

pub const GOAL_REACHED_MESSAGE: &str = "🎉 Campaign goal reached! Thank you to all our supporters!";
pub const PAYMENT_FAILED_MESSAGE: &str = "Unable to process donation. Please try again.";

/// A handle to the donation actor.
///
/// The actor owns the [`ProgressTracker`]; every mutation of the running total
/// goes through it. State changes and notifications are broadcast as
/// [`CampaignEvent`]s to every subscriber.
#[derive(Clone)]
pub struct DonationHandle {
    sender: mpsc::Sender<DonationMessage>,
    events: broadcast::Sender<CampaignEvent>,
}

impl DonationHandle {
    /// Spawns the actor with a tracker, a payment boundary and the smallest
    /// accepted donation.
    ///
    /// A payment still unsettled after `payment_timeout` is settled as failed;
    /// a completion arriving later is ignored.
    pub fn new<G: PaymentGateway>(
        tracker: ProgressTracker,
        gateway: Arc<G>,
        min_donation: Money,
        payment_timeout: Duration,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let runner = DonationRunner {
            receiver,
            loopback: sender.downgrade(),
            events: events.clone(),
            tracker,
            gateway,
            min_donation,
            payment_timeout,
            open_sessions: HashMap::new(),
        };
        tokio::spawn(async move { runner.run().await });
        Self { sender, events }
    }

    /// Runs the donation flow: validate, open a checkout session, wait for the
    /// payment to settle, then record the contribution.
    ///
    /// The actor bounds the wait with the payment timeout, so the result always
    /// agrees with the recorded total.
    #[instrument(skip(self, donor))]
    pub async fn donate(
        &self,
        amount_text: &str,
        donor: DonorDetails,
    ) -> Result<DonationReceipt, AppError> {
        let (send, recv) = oneshot::channel();
        self.dispatch(DonationMessage::Donate {
            amount_text: amount_text.to_string(),
            donor,
            responder: send,
        })
        .await?;
        recv.await
            .map_err(|e| ActorError::Dropped(e.to_string()))?
    }

    /// Delivers a completion for `session_id`, as a provider webhook would.
    ///
    /// Returns `false` when the session is unknown or was already settled; the
    /// total is then left untouched.
    #[instrument(skip(self))]
    pub async fn confirm_payment(
        &self,
        session_id: &str,
        outcome: PaymentOutcome,
    ) -> Result<bool, AppError> {
        let (send, recv) = oneshot::channel();
        self.dispatch(DonationMessage::PaymentCompleted {
            session_id: session_id.to_string(),
            outcome,
            responder: Some(send),
        })
        .await?;
        Ok(timeout(REQUEST_TIMEOUT, recv)
            .await?
            .map_err(|e| ActorError::Dropped(e.to_string()))?)
    }

    pub async fn state(&self) -> Result<ProgressState, AppError> {
        let (send, recv) = oneshot::channel();
        self.dispatch(DonationMessage::GetState { responder: send })
            .await?;
        self.await_state(recv).await
    }

    /// Overrides the running total. Administrative use only.
    pub async fn set_total(&self, total: Money) -> Result<ProgressState, AppError> {
        let (send, recv) = oneshot::channel();
        self.dispatch(DonationMessage::SetTotal {
            total,
            responder: send,
        })
        .await?;
        self.await_state(recv).await
    }

    /// Resets the running total to zero. Administrative use only.
    pub async fn reset(&self) -> Result<ProgressState, AppError> {
        let (send, recv) = oneshot::channel();
        self.dispatch(DonationMessage::Reset { responder: send })
            .await?;
        self.await_state(recv).await
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CampaignEvent> {
        self.events.subscribe()
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.dispatch(DonationMessage::Shutdown).await
    }

    async fn await_state(
        &self,
        recv: oneshot::Receiver<ProgressState>,
    ) -> Result<ProgressState, AppError> {
        Ok(timeout(REQUEST_TIMEOUT, recv)
            .await?
            .map_err(|e| ActorError::Dropped(e.to_string()))?)
    }

    async fn dispatch(&self, msg: DonationMessage) -> Result<(), AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::Unavailable(e.to_string()).into())
    }
}

/// A checkout that has been opened but not settled yet.
struct PendingDonation {
    session: CheckoutSession,
    responder: oneshot::Sender<Result<DonationReceipt, AppError>>,
}

// --- Actor Runner ---
struct DonationRunner<G: PaymentGateway> {
    receiver: mpsc::Receiver<DonationMessage>,
    /// Used by settlement tasks to report back without keeping the actor alive.
    loopback: mpsc::WeakSender<DonationMessage>,
    events: broadcast::Sender<CampaignEvent>,
    tracker: ProgressTracker,
    gateway: Arc<G>,
    min_donation: Money,
    payment_timeout: Duration,
    open_sessions: HashMap<String, PendingDonation>,
}

impl<G: PaymentGateway> DonationRunner<G> {
    async fn run(mut self) {
        info!("Donation actor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, DonationMessage::Shutdown) {
                info!("Donation actor shutting down...");
                break;
            }
            if let Err(e) = self.handle_message(msg).await {
                error!("Error handling message: {:?}", e);
            }
        }
        info!("Donation actor stopped");
    }

    async fn handle_message(&mut self, msg: DonationMessage) -> Result<(), AppError> {
        match msg {
            DonationMessage::Donate {
                amount_text,
                donor,
                responder,
            } => match self.open_checkout(&amount_text, &donor).await {
                Ok(session) => {
                    self.spawn_settlement(session.clone());
                    self.open_sessions
                        .insert(session.session_id.clone(), PendingDonation { session, responder });
                }
                Err(e) => {
                    warn!("Donation rejected: {}", e);
                    if matches!(e, AppError::Payment(_)) {
                        self.publish(CampaignEvent::Notification(Notification::error(
                            PAYMENT_FAILED_MESSAGE,
                        )));
                    }
                    let _ = responder.send(Err(e));
                }
            },
            DonationMessage::PaymentCompleted {
                session_id,
                outcome,
                responder,
            } => {
                let applied = self.settle(&session_id, outcome).await;
                if let Some(responder) = responder {
                    let _ = responder.send(applied);
                }
            }
            DonationMessage::GetState { responder } => {
                let _ = responder.send(self.tracker.state());
            }
            DonationMessage::SetTotal { total, responder } => {
                let update = self.tracker.set_total(total).await;
                self.publish_update(update);
                let _ = responder.send(update.state);
            }
            DonationMessage::Reset { responder } => {
                let state = self.tracker.reset().await;
                self.publish(CampaignEvent::ProgressChanged(state));
                let _ = responder.send(state);
            }
            DonationMessage::Shutdown => {}
        }
        Ok(())
    }

    async fn open_checkout(
        &self,
        amount_text: &str,
        donor: &DonorDetails,
    ) -> Result<CheckoutSession, AppError> {
        let amount = Money::parse_contribution(amount_text)?;
        if amount < self.min_donation {
            return Err(AppError::InvalidAmount(format!(
                "{} is below the minimum donation of {}",
                amount, self.min_donation
            )));
        }
        donor.validate()?;
        timeout(REQUEST_TIMEOUT, self.gateway.create_session(amount, donor))
            .await
            .map_err(|_| AppError::Payment("checkout timed out".to_string()))?
    }

    fn spawn_settlement(&self, session: CheckoutSession) {
        let gateway = Arc::clone(&self.gateway);
        let loopback = self.loopback.clone();
        let limit = self.payment_timeout;
        tokio::spawn(async move {
            let outcome = timeout(limit, gateway.await_completion(&session))
                .await
                .unwrap_or_else(|_| PaymentOutcome::Failed(PAYMENT_TIMED_OUT.to_string()));
            let Some(sender) = loopback.upgrade() else {
                return;
            };
            let _ = sender
                .send(DonationMessage::PaymentCompleted {
                    session_id: session.session_id,
                    outcome,
                    responder: None,
                })
                .await;
        });
    }

    /// Applies a completion once. Unknown and repeated sessions are ignored.
    #[instrument(skip(self, outcome))]
    async fn settle(&mut self, session_id: &str, outcome: PaymentOutcome) -> bool {
        let Some(pending) = self.open_sessions.remove(session_id) else {
            warn!("Ignoring completion for unknown or settled session");
            return false;
        };
        let PendingDonation { session, responder } = pending;

        let result = match outcome {
            PaymentOutcome::Succeeded => self.record(session).await,
            PaymentOutcome::Failed(reason) => {
                warn!("Payment failed: {}", reason);
                self.publish(CampaignEvent::Notification(Notification::error(
                    PAYMENT_FAILED_MESSAGE,
                )));
                Err(AppError::Payment(reason))
            }
        };
        let _ = responder.send(result);
        true
    }

    async fn record(&mut self, session: CheckoutSession) -> Result<DonationReceipt, AppError> {
        let update = self.tracker.record_contribution(session.amount).await?;
        info!(amount = %session.amount, raised = %update.state.raised, "donation recorded");

        self.publish(CampaignEvent::Notification(Notification::success(format!(
            "Thank you for your {} contribution!",
            session.amount
        ))));
        self.publish_update(update);

        Ok(DonationReceipt {
            session,
            progress: update.state,
            goal_reached: update.goal_reached,
        })
    }

    fn publish_update(&self, update: ProgressUpdate) {
        self.publish(CampaignEvent::ProgressChanged(update.state));
        if update.goal_reached {
            self.publish(CampaignEvent::GoalReached(update.state));
            self.publish(CampaignEvent::Notification(Notification::success(
                GOAL_REACHED_MESSAGE,
            )));
        }
    }

    fn publish(&self, event: CampaignEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
