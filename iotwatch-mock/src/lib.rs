use std::sync::Arc;

use anyhow::Context;
use tokio::time::Instant;

use crate::monitor::AlertMonitor;
use crate::profile::SessionProfile;
use crate::registry::SensorRegistry;
use crate::settings::Settings;
use crate::simulator::Simulator;
use crate::views::{default_selection, history_rows, render_history_table, render_sensor_table, sensor_options};

pub mod error;
pub mod monitor;
pub mod profile;
pub mod registry;
pub mod settings;
pub mod simulator;
mod task;
pub mod views;

pub async fn run(settings: &Arc<Settings>) -> anyhow::Result<()> {
    let registry = Arc::new(SensorRegistry::default());

    let profile = SessionProfile::load_or_default(&settings.profile.path);
    let count = profile.sensor_count() as usize;
    tracing::info!("Hello, {}! {} sensor(s) registered", profile.display_name(), count);

    let mut simulator =
        Simulator::new(Arc::clone(&registry), settings.simulator_options()).context("Invalid simulator settings")?;
    let mut monitor = AlertMonitor::new(Arc::clone(&registry), simulator.subscribe(), settings.monitor_options())
        .context("Invalid monitor settings")?;

    let mut readings = simulator.subscribe();
    let mut views = monitor.subscribe();

    simulator.activate(count);

    let options = sensor_options(&registry, count);
    let selection = match settings.monitor.sensor.as_deref() {
        Some(name) => Some(name.to_string()),
        None => default_selection(&options).map(str::to_string),
    };

    if let Some(name) = &selection {
        monitor
            .select(name)
            .with_context(|| format!("Cannot observe sensor {name}"))?;
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                break;
            }
            changed = readings.changed() => {
                if changed.is_err() {
                    break;
                }

                let set = readings.borrow_and_update().clone();
                let history = history_rows(selection.as_deref(), &set, settings.history.alert_threshold);

                println!("{}", render_sensor_table(&set));
                println!("{}", render_history_table(&history));
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }

                let view = views.borrow_and_update().clone();
                let now = Instant::now();

                tracing::info!(
                    sensor = view.sensor.as_deref().unwrap_or("none"),
                    band = %view.band,
                    fraction = view.fraction_at(now),
                    target = view.target(),
                    colour = %view.colour_at(now),
                    "alert level"
                );
            }
        }
    }

    monitor.deselect();
    simulator.stop();
    tracing::info!("Shutting down");

    Ok(())
}
