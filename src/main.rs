//! Red Bite - auto fishing bot
//!
//! Startup glue: logging, settings, region setup, hotkeys, and the threads
//! running the control loop and the hotkey listener.

use std::io;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use red_bite::keybinds::HotkeyBindings;
use red_bite::pause::{PauseController, PauseFlag, ShutdownSignal};
use red_bite::setup::setup_region;
use red_bite::{get_data_dir, ControlLoop, EnigoInput, ScreenService, SessionStats, Settings};

// Log filter configuration:
// - Sets default level to 'info'
// - Keeps the native event loop quiet
const LOG_FILTER: &str = "info,red_bite=info,tao=warn,mio=warn";

fn init_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_dir = get_data_dir().join("debug").join("log");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_file_path = log_dir.join("debug.log");
    let file_result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LOG_FILTER));

    match file_result {
        Ok(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            let stdout_layer = tracing_subscriber::fmt::layer();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(stdout_layer)
                .init();

            tracing::info!("[INIT] Logging initialized, file: {:?}", log_file_path);
        }
        Err(e) => {
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
            eprintln!(
                "[INIT] Failed to create debug log file at {:?}: {}",
                log_file_path, e
            );
        }
    }
}

/// Worker threads and shared handles of a running bot
struct Session {
    shutdown: ShutdownSignal,
    stats: SessionStats,
    control: JoinHandle<()>,
    hotkeys: JoinHandle<()>,
}

impl Session {
    fn finish(self) {
        self.shutdown.trigger();
        if self.control.join().is_err() {
            tracing::error!("[LOOP] Control loop thread panicked");
        }
        if self.hotkeys.join().is_err() {
            tracing::error!("[HOTKEY] Hotkey thread panicked");
        }
        println!("{}", self.stats.summary());
    }
}

fn main() -> Result<()> {
    init_logging();

    println!("Red Bite {}", env!("CARGO_PKG_VERSION"));
    println!("================================");

    let settings = Settings::load().context("Failed to load settings")?;
    settings.validate().context("Invalid settings")?;

    let region = match settings.roi {
        Some(roi) => roi.to_region().context("Invalid region in settings")?,
        None => {
            let input = EnigoInput::new().context("Failed to initialise input")?;
            setup_region(&mut io::stdin().lock(), || input.cursor_position())
                .context("Region setup failed")?
        }
    };
    println!("Region set: {}x{} at ({}, {})", region.width, region.height, region.left, region.top);

    let pause = PauseFlag::new();
    let shutdown = ShutdownSignal::new();
    let stats = SessionStats::new();

    let bindings = HotkeyBindings::register(&settings.pause_key, &settings.stop_key)?;
    let ids = bindings.ids();
    let controller = PauseController::new(pause.clone(), shutdown.clone());
    let hotkeys = thread::Builder::new()
        .name("hotkeys".to_string())
        .spawn(move || controller.run(|timeout| ids.next_command(timeout)))
        .context("Failed to spawn hotkey thread")?;

    // The input backend is created on the thread that uses it.
    let control = {
        let settings = settings.clone();
        let shutdown = shutdown.clone();
        let stats = stats.clone();
        thread::Builder::new()
            .name("control-loop".to_string())
            .spawn(move || {
                let input = match EnigoInput::new() {
                    Ok(input) => input,
                    Err(e) => {
                        tracing::error!("[INPUT] {}", e);
                        shutdown.trigger();
                        return;
                    }
                };
                ControlLoop::from_settings(&settings, region, ScreenService::new(), input)
                    .with_pause(pause)
                    .with_shutdown(shutdown)
                    .with_stats(stats)
                    .run();
            })
            .context("Failed to spawn control loop thread")?
    };

    println!(
        ">>> Bot running. Press {} to pause/resume, {} to stop.",
        settings.pause_key, settings.stop_key
    );

    let session = Session { shutdown, stats, control, hotkeys };
    wait_for_shutdown(bindings, session);
    Ok(())
}

/// Pump the native event loop so hotkeys are delivered, until shutdown.
#[cfg(feature = "event-loop")]
fn wait_for_shutdown(bindings: HotkeyBindings, session: Session) {
    use std::time::{Duration, Instant};
    use tao::event_loop::{ControlFlow, EventLoop};

    let event_loop = EventLoop::new();
    let mut bindings = Some(bindings);
    let mut session = Some(session);

    event_loop.run(move |_event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(Instant::now() + Duration::from_millis(100));

        let stopping = session
            .as_ref()
            .is_some_and(|s| s.shutdown.is_triggered() || s.control.is_finished());
        if stopping {
            drop(bindings.take());
            if let Some(session) = session.take() {
                session.finish();
            }
            *control_flow = ControlFlow::Exit;
        }
    })
}

#[cfg(not(feature = "event-loop"))]
fn wait_for_shutdown(bindings: HotkeyBindings, session: Session) {
    while !session.control.is_finished() {
        if !session.shutdown.sleep(std::time::Duration::from_millis(200)) {
            break;
        }
    }
    drop(bindings);
    session.finish();
}
