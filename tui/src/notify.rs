//! Background rest notifier.
//!
//! Receives [`NotificationCommand`]s and raises a [`RestAlert`] when the
//! scheduled rest runs out, whatever screen is showing. Delivery is best
//! effort and never feeds back into the tracker.

use std::future;
use std::time::Duration;

use chrono::Utc;
use gymtrack_core::NotificationCommand;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestAlert {
    pub exercise_name: String,
}

pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<NotificationCommand>>,
}

impl Notifier {
    /// Spawns the worker. When notifications are disabled no worker runs and
    /// every command is dropped.
    pub fn spawn(enabled: bool) -> (Self, mpsc::UnboundedReceiver<RestAlert>) {
        let (alert_tx, alert_rx) = mpsc::unbounded_channel();
        if !enabled {
            return (Self::disabled(), alert_rx);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, alert_tx));
        (Self { tx: Some(tx) }, alert_rx)
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, command: NotificationCommand) {
        match &self.tx {
            Some(tx) => {
                if tx.send(command).is_err() {
                    debug!("notifier worker gone");
                }
            }
            None => debug!(?command, "notifications disabled, dropping"),
        }
    }
}

struct Scheduled {
    deadline: Instant,
    exercise_name: String,
}

async fn run(
    mut rx: mpsc::UnboundedReceiver<NotificationCommand>,
    alerts: mpsc::UnboundedSender<RestAlert>,
) {
    let mut scheduled: Option<Scheduled> = None;

    loop {
        let deadline = scheduled.as_ref().map(|s| s.deadline);
        let fire = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            command = rx.recv() => match command {
                Some(NotificationCommand::ScheduleRest { duration_ms, exercise_name, start_time }) => {
                    let end_ms = start_time.saturating_add(duration_ms as i64);
                    let remaining_ms = end_ms.saturating_sub(Utc::now().timestamp_millis()).max(0);
                    debug!(%exercise_name, remaining_ms, "rest notification scheduled");
                    scheduled = Some(Scheduled {
                        deadline: Instant::now() + Duration::from_millis(remaining_ms as u64),
                        exercise_name,
                    });
                }
                Some(NotificationCommand::CancelRest) => {
                    if scheduled.take().is_some() {
                        debug!("rest notification cancelled");
                    }
                }
                None => break,
            },
            () = fire => {
                if let Some(done) = scheduled.take()
                    && alerts.send(RestAlert { exercise_name: done.exercise_name }).is_err()
                {
                    break;
                }
            }
        }
    }
}
