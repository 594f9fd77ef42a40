//! Health endpoint tests.

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use kentix_api::handlers::basic::{health_handler, health_status_handler};
    use kentix_core::ConfigStore;

    use crate::common::{create_failing_server_state, create_test_server_state, sample_config};

    #[tokio::test]
    async fn test_health_handler() {
        let result = health_handler().await;
        let value = result.0;
        assert_eq!(value["status"], "ok");
        assert_eq!(value["service"], "kentix");
        assert!(value["version"].is_string());
    }

    #[tokio::test]
    async fn test_health_status_counts_configurations() {
        let (state, store) = create_test_server_state();
        store.insert_configuration(sample_config()).unwrap();

        let response = health_status_handler(State(state)).await.unwrap();
        let data = response.0.data.unwrap();
        assert_eq!(data["status"], "healthy");
        assert_eq!(data["configurations"], 1);
        assert!(data["uptime_secs"].as_i64().unwrap() >= 0);
    }

    #[tokio::test]
    async fn test_health_status_degraded_when_store_fails() {
        let state = create_failing_server_state();
        let response = health_status_handler(State(state)).await.unwrap();
        let data = response.0.data.unwrap();
        assert_eq!(data["status"], "degraded");
        assert_eq!(data["store"], "error");
    }
}
