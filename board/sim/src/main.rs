use driver::baro::STD_SEA_LEVEL_PRESSURE_PA;
use driver::{Bmp180, Bmp180Config, Bmp180SensorDriver, OversamplingMode};
use embassy_futures::block_on;
use embassy_time::{Delay, Duration, Instant, Timer};
use hal::{SensorDriver, SensorKind, SensorRegistry};
use log::{error, info};

mod device;

use device::SimulatedBmp180;

type SimSensor = Bmp180SensorDriver<LoggingRegistry, SimulatedBmp180, Delay>;

enum State {
    Initializing,
    Running,
    Stopping,
}

/// Stands in for the platform sensor subsystem
struct LoggingRegistry;

impl SensorRegistry for LoggingRegistry {
    fn register(&mut self, kind: SensorKind) {
        info!("sensor {:?} registered", kind);
    }

    fn unregister(&mut self, kind: SensorKind) {
        info!("sensor {:?} unregistered", kind);
    }
}

fn cycles_from_env() -> u32 {
    std::env::var("SIM_CYCLES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(12)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let total_cycles = cycles_from_env();
    let minimum_elapsed_duration = Duration::from_millis(250); // 4 Hz
    let mut last_update_time = Instant::now();
    let mut state = State::Initializing;
    let mut sensor: Option<SimSensor> = None;
    let mut update_cycle_count = 0;

    loop {
        let dt = last_update_time.elapsed();
        if dt < minimum_elapsed_duration {
            block_on(Timer::after(minimum_elapsed_duration - dt));
            continue;
        }
        last_update_time = Instant::now();

        match state {
            State::Initializing => {
                info!("Initializing...");
                let config =
                    Bmp180Config::default().with_sea_level_pressure(STD_SEA_LEVEL_PRESSURE_PA);
                match block_on(Bmp180::open(SimulatedBmp180::new(), Delay, config)) {
                    Ok(device) => {
                        let mut driver: SimSensor = Bmp180SensorDriver::new(device, LoggingRegistry);
                        driver.register(SensorKind::Barometer);
                        sensor = Some(driver);
                        state = State::Running;
                    }
                    Err(err) => {
                        error!("Failed to open BMP180: {}", err);
                        state = State::Stopping;
                    }
                }
            }
            State::Running => {
                let Some(driver) = sensor.as_ref() else {
                    state = State::Stopping;
                    continue;
                };

                // walk through the oversampling modes every few samples
                let mode = OversamplingMode::ALL[(update_cycle_count / 3) as usize % 4];
                block_on(driver.device().set_mode(mode));

                let reading = block_on(driver.read(SensorKind::Barometer))?;
                info!(
                    "[{:?}] p = {} Pa, t = {} C, alt = {:.1} m",
                    mode, reading.values[0], reading.values[1], reading.values[2]
                );

                update_cycle_count += 1;
                if update_cycle_count >= total_cycles {
                    state = State::Stopping;
                }
            }
            State::Stopping => {
                info!("Stopping");
                if let Some(driver) = sensor.take() {
                    let _ = driver.close();
                }
                break;
            }
        }
    }
    Ok(())
}
