//! Configuration endpoint tests.

#[cfg(test)]
mod tests {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;
    use kentix_api::handlers::configs::{
        create_config_handler, get_config_handler, list_configs_handler, list_sensors_handler,
        update_config_handler,
    };
    use kentix_core::{AssetMapping, ConfigStore, Configuration};

    use crate::common::{create_failing_server_state, create_test_server_state, sample_config};

    #[tokio::test]
    async fn test_create_assigns_id_and_clears_active() {
        let (state, store) = create_test_server_state();
        let mut body = sample_config().with_active(true);
        body.id = Some(77);

        let created = create_config_handler(State(state), Json(body))
            .await
            .unwrap()
            .0
            .data
            .unwrap();

        assert_eq!(created.id, Some(1));
        assert_eq!(created.active, None);
        assert_eq!(created.project_ids(), ["1", "2"]);
        assert!(store.get_configuration(77).unwrap().is_none());
        assert_eq!(store.get_configuration(1).unwrap().unwrap().address, "http://10.0.0.5");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body() {
        let (state, store) = create_test_server_state();
        let body = Configuration::new("localhost:3031", "k").with_refresh_interval(0);

        let err = create_config_handler(State(state), Json(body))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "VALIDATION_FAILED");
        assert!(store.list_configurations().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_configs_in_id_order() {
        let (state, store) = create_test_server_state();
        store.insert_configuration(sample_config()).unwrap();
        store
            .insert_configuration(Configuration::new("http://10.0.0.6", "k"))
            .unwrap();

        let configs = list_configs_handler(State(state)).await.unwrap().0.data.unwrap();
        let ids: Vec<_> = configs.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_get_config() {
        let (state, store) = create_test_server_state();
        store.insert_configuration(sample_config()).unwrap();

        let config = get_config_handler(State(state.clone()), Path("1".to_string()))
            .await
            .unwrap()
            .0
            .data
            .unwrap();
        assert_eq!(config.refresh_interval, 30);

        let err = get_config_handler(State(state.clone()), Path("2".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = get_config_handler(State(state), Path("abc".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_keeps_path_id_and_stored_active() {
        let (state, store) = create_test_server_state();
        store.insert_configuration(sample_config()).unwrap();
        store.update_configuration_active_state(1, true).unwrap();

        let mut body = sample_config()
            .with_enable(false)
            .with_active(false)
            .with_refresh_interval(90);
        body.id = Some(5);

        let updated = update_config_handler(State(state), Path("1".to_string()), Json(body))
            .await
            .unwrap()
            .0
            .data
            .unwrap();

        assert_eq!(updated.id, Some(1));
        assert_eq!(updated.active, Some(true));

        let stored = store.get_configuration(1).unwrap().unwrap();
        assert_eq!(stored.enable, Some(false));
        assert_eq!(stored.refresh_interval, 90);
        assert_eq!(stored.active, Some(true));
        assert!(store.get_configuration(5).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_config_is_not_found() {
        let (state, store) = create_test_server_state();

        let err = update_config_handler(State(state), Path("3".to_string()), Json(sample_config()))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(store.list_configurations().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sensors() {
        let (state, store) = create_test_server_state();
        store.insert_configuration(sample_config()).unwrap();
        store.insert_configuration(sample_config()).unwrap();
        store
            .insert_asset_mapping(AssetMapping::new(1, "1", "GW-1", 100))
            .unwrap();
        store
            .insert_asset_mapping(AssetMapping::new(1, "2", "GW-1", 101))
            .unwrap();
        store
            .insert_asset_mapping(AssetMapping::new(2, "1", "GW-2", 102))
            .unwrap();

        let sensors = list_sensors_handler(State(state.clone()), Path("1".to_string()))
            .await
            .unwrap()
            .0
            .data
            .unwrap();
        assert_eq!(sensors.len(), 2);
        assert!(sensors.iter().all(|m| m.configuration_id == 1));

        let err = list_sensors_handler(State(state), Path("9".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let state = create_failing_server_state();

        let err = list_configs_handler(State(state.clone())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err = create_config_handler(State(state), Json(sample_config()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("database unavailable"));
    }
}
