//! Configuration validation
//!
//! Rules:
//! - store location / collection / field non-empty
//! - group_size >= 1
//! - cycle_interval_ms > 0
//! - transport name non-empty, sockets >= 1
//! - udp transport has parseable targets and a known format

use std::net::SocketAddr;

use contracts::{ConfigError, StreamBlueprint, TransportKind};

/// Validate a StreamBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &StreamBlueprint) -> Result<(), ConfigError> {
    validate_store(blueprint)?;
    validate_dispatch(blueprint)?;
    validate_transport(blueprint)?;
    Ok(())
}

fn validate_store(blueprint: &StreamBlueprint) -> Result<(), ConfigError> {
    let store = &blueprint.store;

    if store.location.as_os_str().is_empty() {
        return Err(ConfigError::validation(
            "store.location",
            "location cannot be empty",
        ));
    }
    if store.collection.is_empty() {
        return Err(ConfigError::validation(
            "store.collection",
            "collection name cannot be empty",
        ));
    }
    if store.field.is_empty() {
        return Err(ConfigError::validation(
            "store.field",
            "field name cannot be empty",
        ));
    }
    Ok(())
}

fn validate_dispatch(blueprint: &StreamBlueprint) -> Result<(), ConfigError> {
    let dispatch = &blueprint.dispatch;

    if dispatch.group_size == 0 {
        return Err(ConfigError::validation(
            "dispatch.group_size",
            "group_size must be >= 1",
        ));
    }
    if dispatch.cycle_interval_ms == 0 {
        return Err(ConfigError::validation(
            "dispatch.cycle_interval_ms",
            "cycle_interval_ms must be > 0",
        ));
    }
    Ok(())
}

fn validate_transport(blueprint: &StreamBlueprint) -> Result<(), ConfigError> {
    let transport = &blueprint.transport;

    if transport.name.is_empty() {
        return Err(ConfigError::validation(
            "transport.name",
            "transport name cannot be empty",
        ));
    }

    match transport.kind {
        TransportKind::Log | TransportKind::File => {
            if transport.sockets == 0 {
                return Err(ConfigError::validation(
                    "transport.sockets",
                    "sockets must be >= 1",
                ));
            }
        }
        TransportKind::Udp => validate_udp_params(blueprint)?,
    }
    Ok(())
}

/// Udp derives its socket count from the target list, so the list must
/// exist and every entry must parse before the pipeline starts.
fn validate_udp_params(blueprint: &StreamBlueprint) -> Result<(), ConfigError> {
    let params = &blueprint.transport.params;

    let targets = params.get("targets").ok_or_else(|| {
        ConfigError::validation(
            "transport.params.targets",
            "udp transport requires a 'targets' parameter",
        )
    })?;

    let mut count = 0;
    for part in targets.split(',') {
        let part = part.trim();
        part.parse::<SocketAddr>().map_err(|e| {
            ConfigError::validation(
                "transport.params.targets",
                format!("invalid target address '{part}': {e}"),
            )
        })?;
        count += 1;
    }
    if count == 0 {
        return Err(ConfigError::validation(
            "transport.params.targets",
            "target list cannot be empty",
        ));
    }

    if let Some(format) = params.get("format") {
        if format != "json" && format != "bincode" {
            return Err(ConfigError::validation(
                "transport.params.format",
                format!("unknown format '{format}' (expected 'json' or 'bincode')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ConfigVersion, DispatchConfig, FieldLayout, StoreConfig, TransportConfig,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn minimal_blueprint() -> StreamBlueprint {
        StreamBlueprint {
            version: ConfigVersion::V1,
            store: StoreConfig {
                location: PathBuf::from("events.json"),
                collection: "events".into(),
                field: "hits".into(),
                layout: FieldLayout::Scalar,
            },
            dispatch: DispatchConfig {
                group_size: 2,
                cycle_interval_ms: 100,
                max_cycles: 0,
            },
            transport: TransportConfig {
                name: "out".into(),
                kind: TransportKind::Log,
                sockets: 1,
                params: HashMap::new(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_empty_collection() {
        let mut bp = minimal_blueprint();
        bp.store.collection = String::new();
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("collection"), "got: {err}");
    }

    #[test]
    fn test_empty_field() {
        let mut bp = minimal_blueprint();
        bp.store.field = String::new();
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_zero_group_size() {
        let mut bp = minimal_blueprint();
        bp.dispatch.group_size = 0;
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("group_size"), "got: {err}");
    }

    #[test]
    fn test_zero_interval() {
        let mut bp = minimal_blueprint();
        bp.dispatch.cycle_interval_ms = 0;
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_zero_sockets() {
        let mut bp = minimal_blueprint();
        bp.transport.sockets = 0;
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_udp_requires_targets() {
        let mut bp = minimal_blueprint();
        bp.transport.kind = TransportKind::Udp;
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("targets"), "got: {err}");
    }

    #[test]
    fn test_udp_rejects_malformed_target() {
        let mut bp = minimal_blueprint();
        bp.transport.kind = TransportKind::Udp;
        bp.transport
            .params
            .insert("targets".into(), "127.0.0.1:9001,not-an-addr".into());
        let result = validate(&bp);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("not-an-addr"), "got: {err}");
    }

    #[test]
    fn test_udp_rejects_unknown_format() {
        let mut bp = minimal_blueprint();
        bp.transport.kind = TransportKind::Udp;
        bp.transport
            .params
            .insert("targets".into(), "127.0.0.1:9001".into());
        bp.transport.params.insert("format".into(), "xml".into());
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_udp_with_valid_params() {
        let mut bp = minimal_blueprint();
        bp.transport.kind = TransportKind::Udp;
        bp.transport
            .params
            .insert("targets".into(), "127.0.0.1:9001, 127.0.0.1:9002".into());
        bp.transport.params.insert("format".into(), "bincode".into());
        assert!(validate(&bp).is_ok());
    }
}
