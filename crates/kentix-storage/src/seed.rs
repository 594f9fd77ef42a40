//! Demonstration configurations written to an empty store.
//!
//! They point at gateways that do not exist and are disabled, so an
//! operator has to edit and enable them before anything is polled.

use kentix_core::{ConfigStore, Configuration, StoreResult};

const DEMO_API_KEY: &str = "ikcsjhzrflwz5";
const DEMO_REFRESH_SECS: u64 = 30;

/// The three disabled sample configurations.
pub fn default_configurations() -> Vec<Configuration> {
    [
        ("http://localhost:3031", &["1", "2", "3"][..]),
        ("http://localhost:3032", &["1", "3"][..]),
        ("http://localhost:3033", &["1"][..]),
    ]
    .into_iter()
    .map(|(address, projects)| {
        Configuration::new(address, DEMO_API_KEY)
            .with_enable(false)
            .with_refresh_interval(DEMO_REFRESH_SECS)
            .with_projects(projects.iter().copied())
    })
    .collect()
}

/// Insert the sample configurations if the store holds none.
///
/// Returns the number of rows inserted.
pub fn seed_defaults(store: &dyn ConfigStore) -> StoreResult<usize> {
    if !store.list_configurations()?.is_empty() {
        return Ok(0);
    }

    let defaults = default_configurations();
    let count = defaults.len();
    for config in defaults {
        let stored = store.insert_configuration(config)?;
        tracing::info!(
            id = ?stored.id,
            address = %stored.address,
            "Seeded sample configuration"
        );
    }
    Ok(count)
}
