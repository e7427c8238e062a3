use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use sysinfo::{ProcessesToUpdate, System};

use crate::launcher::backend::{BackendEvent, EventSender};

pub const PING_INTERVAL: Duration = Duration::from_secs(2);

/// Either of these counts as YACC running, the launcher exe may hand off to the game and exit.
const YACC_PROCESS_NAMES: [&str; 2] = ["yacc.exe", "iw3mp.exe"];

pub trait ProcessCheck: Send + Sync {
    fn is_yacc_running(&self) -> bool;
}

#[derive(Default)]
pub struct SystemProcessCheck {
    system: Mutex<System>,
}

impl SystemProcessCheck {
    pub fn new() -> Self {
        SystemProcessCheck { system: Mutex::new(System::new()) }
    }
}

impl ProcessCheck for SystemProcessCheck {
    fn is_yacc_running(&self) -> bool {
        let mut system = self.system.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        system.refresh_processes(ProcessesToUpdate::All, true);

        system.processes().values().any(|process| is_yacc_process(&process.name().to_string_lossy()))
    }
}

fn is_yacc_process(name: &str) -> bool {
    YACC_PROCESS_NAMES.iter().any(|candidate| name.eq_ignore_ascii_case(candidate))
}

/// Periodically pings and reports whether YACC is running, until the event receiver goes away.
pub struct Heartbeat {
    events: EventSender,
    check: Arc<dyn ProcessCheck>,
    interval: Duration,
}

impl Heartbeat {
    pub fn new(events: EventSender, check: Arc<dyn ProcessCheck>, interval: Duration) -> Self {
        Heartbeat { events, check, interval }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            ticker.tick().await;
            if !self.events.send(BackendEvent::Ping) {
                break;
            }

            let check = self.check.clone();
            let running = match tokio::task::spawn_blocking(move || check.is_yacc_running()).await {
                Ok(running) => running,
                Err(e) => {
                    tracing::warn!("Process check failed: {}", e);
                    continue;
                }
            };
            if !self.events.send(BackendEvent::YaccRunning(running)) {
                break;
            }
        }

        tracing::debug!("Heartbeat stopped");
    }
}
