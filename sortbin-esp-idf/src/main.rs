use std::time::{Duration, Instant};

use esp_idf_sys as _;
use log::LevelFilter;
use sortbin::app::App;
use sortbin::svc::clock::StdClock;

use sortbin_esp_idf::config::sorter_config;
use sortbin_esp_idf::platform;

const TASK_WAKEUP_PERIOD: Duration = Duration::from_millis(20);

fn main() -> anyhow::Result<()> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = sorter_config();
    log::info!("Config: {}", serde_json::to_string(&config)?);

    log::info!("Create platform");
    let platform = platform::create(&config)?;
    let clock = StdClock::default();

    log::info!("Create app, console goes quiet");
    let mut app = App::new(platform, &clock, &config);
    silence_console();

    loop {
        let next_wakeup = Instant::now() + TASK_WAKEUP_PERIOD;

        if app.update().is_some() {
            continue;
        }

        if let Some(delay) = next_wakeup.checked_duration_since(Instant::now()) {
            std::thread::sleep(delay);
        }
    }
}

/// The console is UART0, which now carries the protocol. Any log line,
/// from Rust or from IDF components, would corrupt it.
fn silence_console() {
    log::set_max_level(LevelFilter::Off);
    unsafe {
        esp_idf_sys::esp_log_level_set(
            b"*\0".as_ptr() as *const _,
            esp_idf_sys::esp_log_level_t_ESP_LOG_NONE,
        );
    }
}
