// Campaign console
// Line-oriented front end over the campaign core: chat, donations, progress.

use anyhow::Context;
use campaign_core::actors::{AssistantHandle, DonationHandle, SimulatedGateway};
use campaign_core::assistant::{QuickTopic, ResponseEngine, TranscriptStore};
use campaign_core::clock::{Clock, SystemClock};
use campaign_core::config::CampaignConfig;
use campaign_core::fs_manager::PortablePathManager;
use campaign_core::models::DonorDetails;
use campaign_core::notifications::{CampaignEvent, NotificationCenter};
use campaign_core::progress::ProgressTracker;
use campaign_core::site::share::DEFAULT_SHARE_TEXT;
use campaign_core::site::{share_url, ElectionCountdown, FormKind, FormSubmission, ShareTarget};
use campaign_core::store::{KeyValueStore, MemoryStore, SqliteStore};
use campaign_core::telemetry::{self, LogFormat};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

const HELP: &str = "\
Commands:
  <question>                          ask the campaign assistant
  /quick <voting|candidate|issues|resources>
  /donate <amount> <first> <last> <email>
  /volunteer <name> <email>
  /progress
  /countdown
  /share <facebook|twitter|linkedin|email>
  /history
  /reset                              (admin) zero the running total
  /help
  /quit";

struct Console {
    config: CampaignConfig,
    clock: Arc<dyn Clock>,
    assistant: AssistantHandle,
    donations: DonationHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init(LogFormat::from_env()?);

    let config = CampaignConfig::from_env().context("loading campaign configuration")?;
    let paths = PortablePathManager::from_env();
    if let Err(e) = paths.init() {
        error!("Failed to initialize data directory: {}", e);
    }

    let store: Arc<dyn KeyValueStore> = match SqliteStore::open(&paths.db_path()).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Falling back to in-memory storage: {}", e);
            Arc::new(MemoryStore::new())
        }
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let tracker =
        ProgressTracker::load(config.goal()?, config.starting_raised()?, store.clone()).await?;
    let transcript = TranscriptStore::open(store, clock.clone()).await;
    let gateway = Arc::new(SimulatedGateway::new(
        config.campaign_id.clone(),
        config.pacing.payment_completion(),
    ));

    let console = Console {
        assistant: AssistantHandle::new(ResponseEngine::new(), transcript, config.pacing),
        donations: DonationHandle::new(
            tracker,
            gateway,
            config.min_donation()?,
            config.pacing.payment_timeout(),
        ),
        clock,
        config,
    };

    spawn_event_printer(&console);
    info!("Campaign console ready");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if let Err(e) = console.handle_line(line).await {
            warn!("Command failed: {}", e);
            println!("{}", e.user_message());
        }
    }

    console.assistant.shutdown().await?;
    console.donations.shutdown().await?;
    Ok(())
}

/// Prints campaign events as they arrive, keeping the notification stack current.
fn spawn_event_printer(console: &Console) {
    let mut events = console.donations.subscribe();
    let mut center = NotificationCenter::new(console.config.pacing.notification_ttl());
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                CampaignEvent::Notification(notification) => {
                    println!("[{:?}] {}", notification.kind, notification.message);
                    center.push(notification);
                }
                CampaignEvent::ProgressChanged(state) => {
                    println!(
                        "Raised {} of {} ({:.1}%), {} to go",
                        state.raised, state.goal, state.percentage, state.remaining
                    );
                }
                CampaignEvent::GoalReached(_) => {
                    println!("*** GOAL REACHED ***");
                }
            }
            info!(visible = center.visible().len(), "notifications on screen");
        }
    });
}

impl Console {
    async fn handle_line(&self, line: &str) -> Result<(), campaign_core::AppError> {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();

        match command {
            "/help" => println!("{}", HELP),
            "/quick" => match self.assistant.quick_question(rest.trim()).await? {
                Some(reply) => println!("Assistant: {}", reply.entry.text),
                None => {
                    let ids: Vec<&str> = QuickTopic::ALL.iter().map(|t| t.id()).collect();
                    println!("Quick topics: {}", ids.join(", "));
                }
            },
            "/donate" => {
                let [amount, first, last, email] = args[..] else {
                    println!("Usage: /donate <amount> <first> <last> <email>");
                    return Ok(());
                };
                let donor = DonorDetails {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: email.to_string(),
                    ..Default::default()
                };
                println!("Processing...");
                let receipt = self.donations.donate(amount, donor).await?;
                println!("Session {} settled.", receipt.session.session_id);
            }
            "/volunteer" => {
                let [name, email] = args[..] else {
                    println!("Usage: /volunteer <name> <email>");
                    return Ok(());
                };
                let form = FormSubmission {
                    kind: FormKind::Volunteer,
                    name: name.to_string(),
                    email: email.to_string(),
                    message: None,
                };
                println!("Submitting...");
                println!("{}", form.submit(self.config.pacing.form_submit()).await?);
            }
            "/progress" => {
                let state = self.donations.state().await?;
                println!(
                    "Raised {} of {} ({:.1}%), {} to go",
                    state.raised, state.goal, state.percentage, state.remaining
                );
            }
            "/countdown" => {
                let countdown = ElectionCountdown::new(self.config.election_at);
                println!("{}", countdown.at(self.clock.now().naive_local()));
            }
            "/share" => {
                let target: ShareTarget = rest.parse()?;
                println!(
                    "{}",
                    share_url(target, &self.config.site_url, DEFAULT_SHARE_TEXT)?
                );
            }
            "/history" => {
                for entry in self.assistant.history().await? {
                    println!(
                        "{} {:?}: {}",
                        entry.timestamp.format("%H:%M"),
                        entry.sender,
                        entry.text
                    );
                }
            }
            "/reset" => {
                self.donations.reset().await?;
            }
            "" => {}
            _ => {
                let reply = self.assistant.ask(line).await?;
                println!("Assistant: {}", reply.entry.text);
            }
        }
        Ok(())
    }
}
