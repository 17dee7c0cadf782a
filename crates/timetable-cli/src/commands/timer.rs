use clap::Subcommand;
use timetable_core::storage::settings::{load_settings_or, load_task, save_settings};
use timetable_core::{
    Config, Database, HttpTaskApi, Notice, Notification, TaskId, TimerController, TimerEvent,
    TimerObserver, TimerSettings, TimerStateMachine,
};
use tracing::warn;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer, printing each event as a JSON line
    Run {
        /// Focus length in minutes (saved for later runs)
        #[arg(long, allow_negative_numbers = true)]
        focus: Option<i64>,
        /// Task ID to associate with this run
        #[arg(long)]
        task: Option<String>,
        /// Number of phases (focus or break) to run before exiting
        #[arg(long, default_value = "1")]
        phases: u32,
    },
    /// Print the idle timer state as JSON
    Status,
    /// Print the schedule derived from a focus length
    Plan {
        /// Focus length in minutes (defaults to the saved one)
        #[arg(long, allow_negative_numbers = true)]
        focus: Option<i64>,
    },
    /// Set and save the focus length
    Focus {
        /// Focus length in minutes
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
}

/// Events to stdout, everything meant for a human to stderr.
struct ConsoleObserver;

impl TimerObserver for ConsoleObserver {
    fn on_event(&mut self, event: &TimerEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!(error = %e, "could not serialize event"),
        }
    }

    fn on_notification(&mut self, notification: &Notification) {
        eprintln!("{}: {}", notification.title, notification.body);
    }

    fn on_notice(&mut self, notice: &Notice) {
        eprintln!("[{:?}] {}", notice.level, notice.message);
    }
}

fn fallback_settings(config: &Config) -> TimerSettings {
    TimerSettings::from_focus(i64::from(config.timer.default_focus_minutes))
}

/// Collaborator failures never stop the timer.
fn report(result: timetable_core::error::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "timer side effect failed");
    }
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;

    match action {
        TimerAction::Run {
            focus,
            task,
            phases,
        } => {
            let api = HttpTaskApi::from_config(&config.api)?;
            let mut controller = TimerController::with_fallback(api, db, fallback_settings(&config))
                .with_tick_period(config.tick_interval())
                .with_notifications(config.notifications.enabled);
            controller.subscribe(Box::new(ConsoleObserver));

            if let Some(minutes) = focus {
                report(controller.set_focus_minutes(minutes).await);
            }
            if let Some(id) = task {
                report(controller.select_task(TaskId::parse(&id)).await);
            }

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            'phases: for _ in 0..phases {
                report(controller.start().await);
                loop {
                    let tick = tokio::select! {
                        tick = controller.next_tick() => Some(tick),
                        _ = &mut ctrl_c => None,
                    };
                    match tick {
                        Some(Ok(Some(_))) => {}
                        Some(Ok(None)) => break,
                        Some(Err(e)) => warn!(error = %e, "timer side effect failed"),
                        None => {
                            // Also finishes whatever the dropped tick left queued.
                            report(controller.pause().await);
                            break 'phases;
                        }
                    }
                }
            }

            println!("{}", serde_json::to_string(&controller.snapshot())?);
        }
        TimerAction::Status => {
            let settings = load_settings_or(&db, fallback_settings(&config));
            let machine = TimerStateMachine::new(settings).with_task(load_task(&db)?);
            println!("{}", serde_json::to_string_pretty(&machine.snapshot())?);
        }
        TimerAction::Plan { focus } => {
            let settings = match focus {
                Some(minutes) => TimerSettings::from_focus(minutes),
                None => load_settings_or(&db, fallback_settings(&config)),
            };
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        TimerAction::Focus { minutes } => {
            let settings = TimerSettings::from_focus(minutes);
            save_settings(&db, &settings)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
