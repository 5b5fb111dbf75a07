/// Demo host entry point for native builds.
///
/// Usage: `lazyimg-demo [scenario.json]`. Without an argument the built-in
/// gallery scenario is played. The report is printed to stdout as JSON.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lazyimg::{ConfigError, Scenario};

    let loaded: Result<Scenario, ConfigError> = match std::env::args().nth(1) {
        Some(path) => Scenario::from_file(path),
        None => Scenario::builtin(),
    };
    let scenario = match loaded {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Failed to load scenario: {}", e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::new()
        .filter_level(scenario.config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let report = match scenario.run() {
        Ok(report) => report,
        Err(e) => {
            log::error!("Scenario failed: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "🖼️ Played {} steps, {} handler messages",
        report.frames.len(),
        report.messages.len()
    );

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
