use crate::actors::messages::{ActorError, AppError, AssistantMessage, Reply};
use crate::assistant::{Category, QuickTopic, ResponseEngine, TranscriptStore};
use crate::config::Pacing;
use crate::models::ConversationEntry;
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, instrument};

const MAILBOX_CAPACITY: usize = 32;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A handle to the chat assistant actor.
///
/// Requests are served strictly in arrival order. Dropping the future returned
/// by [`AssistantHandle::ask`] before it resolves cancels the pending reply: the
/// visitor's message stays in the transcript, the answer is never recorded.
#[derive(Clone)]
pub struct AssistantHandle {
    sender: mpsc::Sender<AssistantMessage>,
    request_timeout: Duration,
}

impl AssistantHandle {
    /// Spawns the actor. It owns the engine and today's transcript.
    pub fn new(engine: ResponseEngine, transcript: TranscriptStore, pacing: Pacing) -> Self {
        let (sender, receiver) = mpsc::channel(MAILBOX_CAPACITY);
        let request_timeout = request_timeout(&pacing);
        let runner = AssistantRunner {
            receiver,
            engine,
            transcript,
            pacing,
        };
        tokio::spawn(async move { runner.run().await });
        Self {
            sender,
            request_timeout,
        }
    }

    /// Sends a free-text question and waits for the canned answer.
    #[instrument(skip(self, text))]
    pub async fn ask(&self, text: impl Into<String>) -> Result<Reply, AppError> {
        let (send, recv) = oneshot::channel();
        self.dispatch(AssistantMessage::Ask {
            text: text.into(),
            responder: send,
        })
        .await?;
        timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| ActorError::Dropped(e.to_string()))?
    }

    /// Answers a quick-select button. An unknown id is ignored and yields `None`.
    #[instrument(skip(self))]
    pub async fn quick_question(&self, topic_id: &str) -> Result<Option<Reply>, AppError> {
        let Some(topic) = QuickTopic::from_id(topic_id) else {
            debug!(topic_id, "unknown quick topic ignored");
            return Ok(None);
        };

        let (send, recv) = oneshot::channel();
        self.dispatch(AssistantMessage::Quick {
            topic,
            responder: send,
        })
        .await?;
        let reply = timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| ActorError::Dropped(e.to_string()))??;
        Ok(Some(reply))
    }

    /// Today's transcript, oldest first.
    pub async fn history(&self) -> Result<Vec<ConversationEntry>, AppError> {
        let (send, recv) = oneshot::channel();
        self.dispatch(AssistantMessage::History { responder: send })
            .await?;
        Ok(timeout(self.request_timeout, recv)
            .await?
            .map_err(|e| ActorError::Dropped(e.to_string()))?)
    }

    /// Stops the actor once earlier requests have been served.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.dispatch(AssistantMessage::Shutdown).await
    }

    async fn dispatch(&self, msg: AssistantMessage) -> Result<(), AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::Unavailable(e.to_string()).into())
    }
}

/// Worst case for one request: a full mailbox ahead of it plus its own reply,
/// each at the slowest pacing.
fn request_timeout(pacing: &Pacing) -> Duration {
    let queued = u32::try_from(MAILBOX_CAPACITY + 1).unwrap_or(u32::MAX);
    pacing
        .slowest_reply()
        .saturating_mul(queued)
        .saturating_add(REQUEST_TIMEOUT)
}

// --- Actor Runner ---
struct AssistantRunner {
    receiver: mpsc::Receiver<AssistantMessage>,
    engine: ResponseEngine,
    transcript: TranscriptStore,
    pacing: Pacing,
}

impl AssistantRunner {
    async fn run(mut self) {
        info!("Assistant started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, AssistantMessage::Shutdown) {
                info!("Assistant shutting down...");
                break;
            }
            self.handle_message(msg).await;
        }
        info!("Assistant stopped");
    }

    async fn handle_message(&mut self, msg: AssistantMessage) {
        match msg {
            AssistantMessage::Ask { text, responder } => {
                if text.trim().is_empty() {
                    let _ = responder.send(Err(AppError::InvalidInput));
                    return;
                }
                let now = self.transcript.clock().now();
                self.transcript
                    .append(ConversationEntry::user(text.clone(), now))
                    .await;

                let classification = self.engine.respond(&text);
                let category = Some(classification.category);
                let delay = self.reply_delay();
                self.reply(classification.response, category, delay, responder)
                    .await;
            }
            AssistantMessage::Quick { topic, responder } => {
                let now = self.transcript.clock().now();
                self.transcript
                    .append(ConversationEntry::user(topic.question(), now))
                    .await;

                let delay = Duration::from_millis(self.pacing.quick_reply_ms);
                self.reply(topic.answer().to_string(), None, delay, responder)
                    .await;
            }
            AssistantMessage::History { responder } => {
                if self.transcript.day() != self.transcript.clock().today() {
                    self.transcript.reload().await;
                }
                let _ = responder.send(self.transcript.entries().to_vec());
            }
            AssistantMessage::Shutdown => {}
        }
    }

    /// Waits out the typing delay, then records and delivers the answer unless
    /// the caller went away in the meantime.
    async fn reply(
        &mut self,
        text: String,
        category: Option<Category>,
        delay: Duration,
        mut responder: oneshot::Sender<Result<Reply, AppError>>,
    ) {
        if !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = responder.closed() => {}
            }
        }
        if responder.is_closed() {
            info!("reply cancelled before delivery");
            return;
        }

        let entry = ConversationEntry::assistant(text, self.transcript.clock().now());
        self.transcript.append(entry.clone()).await;
        if responder.send(Ok(Reply { category, entry })).is_err() {
            error!("requester went away after the reply was recorded");
        }
    }

    fn reply_delay(&self) -> Duration {
        let (min, max) = (self.pacing.reply_min_ms, self.pacing.reply_max_ms);
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}
