//! Bootstrap Middleware
//!
//! Manages application startup sequence:
//! - Starts tick thread for the loading spinner on BootstrapStart
//! - Loads the step list from the step source
//! - Stops tick thread on GlobalQuit

use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::log_source::StepSource;
use crate::middleware::Middleware;
use crate::state::AppState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Bootstrap middleware - manages application startup and tick generation
pub struct BootstrapMiddleware {
    step_source: Arc<dyn StepSource>,
    tick_thread_running: Arc<AtomicBool>,
    tick_rate: Duration,
}

impl BootstrapMiddleware {
    pub fn new(step_source: Arc<dyn StepSource>, tick_rate: Duration) -> Self {
        Self {
            step_source,
            tick_thread_running: Arc::new(AtomicBool::new(false)),
            tick_rate,
        }
    }

    fn start_tick_thread(&self, dispatcher: &Dispatcher) {
        if self.tick_thread_running.swap(true, Ordering::SeqCst) {
            return;
        }

        let dispatcher = dispatcher.clone();
        let should_continue = self.tick_thread_running.clone();
        let tick_rate = self.tick_rate;

        // Spawn tick generation thread
        thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop {
                if !should_continue.load(Ordering::SeqCst) {
                    log::debug!("Bootstrap: Tick thread terminating");
                    break;
                }
                // Wait for next tick
                let elapsed = last_tick.elapsed();
                if elapsed >= tick_rate {
                    dispatcher.dispatch(Action::Tick);
                    last_tick = Instant::now();
                } else {
                    // Sleep for the remaining time
                    thread::sleep(tick_rate - elapsed);
                }
            }
        });

        log::debug!("Bootstrap: Tick thread started");
    }
}

impl Middleware for BootstrapMiddleware {
    fn handle(&mut self, action: &Action, _state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::BootstrapStart => {
                log::info!("BootstrapMiddleware: Bootstrap starting");
                self.start_tick_thread(dispatcher);

                match self.step_source.load_steps() {
                    Ok(steps) => {
                        log::info!("BootstrapMiddleware: Loaded {} steps", steps.len());
                        dispatcher.dispatch(Action::StepsLoaded(steps));
                    }
                    Err(e) => {
                        log::error!("BootstrapMiddleware: Failed to load steps: {:#}", e);
                        dispatcher.dispatch(Action::StepsLoadError(format!("{:#}", e)));
                    }
                }

                // Pass through
                true
            }

            Action::GlobalQuit => {
                self.tick_thread_running.store(false, Ordering::SeqCst);
                true
            }

            // All other actions pass through
            _ => true,
        }
    }
}
