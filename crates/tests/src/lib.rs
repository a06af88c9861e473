//! # Integration Tests
//!
//! End-to-end tests across the workspace crates.
//!
//! Covers:
//! - Store open / read / extract flows over real fixture files
//! - Full wiring: config -> store -> transport -> dispatcher
//! - Drain behavior at the end of a stream

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use contracts::{FieldLayout, StoreConfig, Transport};
    use dispatcher::{BatchDispatcher, BoundedStore, PartEnvelope, SharedStore};
    use record_store::RecordStore;
    use serde_json::Value;
    use tempfile::NamedTempFile;

    /// Write a scalar fixture of `n` numbered records
    fn write_store_doc(n: usize) -> NamedTempFile {
        let slots: Vec<String> = (0..n).map(|i| format!("{{ \"hits\": {i} }}")).collect();
        let doc = format!("{{ \"events\": [{}] }}", slots.join(", "));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(doc.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn store_config(file: &NamedTempFile, layout: FieldLayout) -> StoreConfig {
        StoreConfig {
            location: file.path().to_path_buf(),
            collection: "events".into(),
            field: "hits".into(),
            layout,
        }
    }

    fn open_shared(n: usize) -> (SharedStore, NamedTempFile) {
        let file = write_store_doc(n);
        let mut store = RecordStore::new();
        store
            .open(&store_config(&file, FieldLayout::Scalar))
            .unwrap();
        (Arc::new(Mutex::new(store)), file)
    }

    /// Host-side drain loop: dispatch until no whole group remains
    fn run_until_drained(
        batch: &BatchDispatcher,
        transport: &Arc<dyn Transport>,
        total: i64,
        group_size: usize,
    ) -> u64 {
        let mut cycles = 0u64;
        while transport.current_index() + (group_size as i64) < total {
            batch.dispatch(group_size).unwrap();
            cycles += 1;
            assert!(cycles < 1000, "pipeline did not drain");
        }
        cycles
    }

    #[test]
    fn test_file_stream_until_drained() {
        let (store, _fixture) = open_shared(14);
        let out_dir = tempfile::tempdir().unwrap();

        let config = dispatcher::transports::FileTransportConfig {
            base_path: out_dir.path().to_path_buf(),
            sockets: 2,
        };
        let transport: Arc<dyn Transport> = Arc::new(
            dispatcher::FileTransport::new("out", config, Arc::clone(&store)).unwrap(),
        );

        let bound: Arc<dyn BoundedStore + Send + Sync> = store.clone();
        let mut batch = BatchDispatcher::new(bound);
        batch.bind_transport(Arc::clone(&transport));

        // 14 records, 2 sockets, groups of 3: two full cycles (12 parts),
        // then 12 + 3 >= 14 stops the host loop.
        let cycles = run_until_drained(&batch, &transport, 14, 3);
        assert_eq!(cycles, 2);
        assert_eq!(transport.current_index(), 12);

        let socket_0 = std::fs::read_to_string(out_dir.path().join("socket_0.jsonl")).unwrap();
        let envelopes: Vec<PartEnvelope> = socket_0
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        // Socket 0 served first in every cycle: parts 0..3 then 6..9
        let indices: Vec<i64> = envelopes.iter().map(|e| e.part_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 6, 7, 8]);
        for envelope in &envelopes {
            assert_eq!(envelope.socket, 0);
            assert_eq!(envelope.payload, serde_json::json!(envelope.part_index));
        }

        let socket_1 = std::fs::read_to_string(out_dir.path().join("socket_1.jsonl")).unwrap();
        let indices: Vec<i64> = socket_1
            .lines()
            .map(|line| serde_json::from_str::<PartEnvelope>(line).unwrap().part_index)
            .collect();
        assert_eq!(indices, vec![3, 4, 5, 9, 10, 11]);
    }

    #[test]
    fn test_trailing_records_are_never_sent() {
        let (store, _fixture) = open_shared(10);

        let transport: Arc<dyn Transport> = Arc::new(dispatcher::LogTransport::new(
            "log",
            3,
            Arc::clone(&store),
        ));

        let bound: Arc<dyn BoundedStore + Send + Sync> = store.clone();
        let mut batch = BatchDispatcher::new(bound);
        batch.bind_transport(Arc::clone(&transport));

        // First cycle: entry index 0 admits all 3 sockets (9 sends).
        batch.dispatch(3).unwrap();
        assert_eq!(transport.current_index(), 9);

        // Second cycle: entry index 9, 9 + 3 >= 10, every socket skipped.
        batch.dispatch(3).unwrap();
        assert_eq!(transport.current_index(), 9);
    }

    #[test]
    fn test_partial_binding_sends_nothing() {
        let (store, _fixture) = open_shared(10);

        let transport = Arc::new(dispatcher::LogTransport::new(
            "log",
            1,
            Arc::clone(&store),
        ));

        let bound: Arc<dyn BoundedStore + Send + Sync> = store.clone();
        let mut batch = BatchDispatcher::new(bound);

        // Bind only two of the three capabilities
        let t = Arc::clone(&transport);
        batch
            .binding_mut()
            .bind_socket_count(Arc::new(move || t.socket_count()));
        let t = Arc::clone(&transport);
        batch
            .binding_mut()
            .bind_send_one(Arc::new(move |socket_id| t.send_one(socket_id)));

        let result = batch.dispatch(2);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("current_index"));
        assert_eq!(transport.metrics().parts_sent, 0);
        assert_eq!(transport.current_index(), 0);
    }

    #[test]
    fn test_bulk_extraction_is_independent_of_streaming() {
        let file = {
            let doc = r#"{ "events": [
                { "hits": [10, 11, 12] },
                { "hits": [20, 21, 22] }
            ] }"#;
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(doc.as_bytes()).unwrap();
            file.flush().unwrap();
            file
        };

        let mut store = RecordStore::<Value>::new();
        store
            .open(&store_config(&file, FieldLayout::Collection))
            .unwrap();

        let groups: Vec<Vec<u32>> = store.extract_all();
        assert_eq!(groups, vec![vec![10, 11, 12], vec![20, 21, 22]]);

        // Extraction never touched the read cursor
        assert_eq!(store.position(), 0);
    }

    #[test]
    fn test_config_drives_full_pipeline() {
        let fixture = write_store_doc(8);
        let out_dir = tempfile::tempdir().unwrap();

        let toml = format!(
            r#"
[store]
location = "{}"
collection = "events"
field = "hits"

[dispatch]
group_size = 2
cycle_interval_ms = 10

[transport]
name = "out"
kind = "file"
sockets = 1

[transport.params]
base_path = "{}"
"#,
            fixture.path().display(),
            out_dir.path().display()
        );

        let blueprint =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();

        let mut store = RecordStore::new();
        store.open(&blueprint.store).unwrap();
        let total = store.count();
        let store: SharedStore = Arc::new(Mutex::new(store));

        let transport =
            dispatcher::create_transport(&blueprint.transport, Arc::clone(&store)).unwrap();

        let bound: Arc<dyn BoundedStore + Send + Sync> = store.clone();
        let mut batch = BatchDispatcher::new(bound);
        batch.bind_transport(Arc::clone(&transport));

        // 8 records, 1 socket, groups of 2: cycles at 0, 2, 4; 6 + 2 >= 8 stops.
        let cycles = run_until_drained(&batch, &transport, total, blueprint.dispatch.group_size);
        assert_eq!(cycles, 3);
        assert_eq!(transport.current_index(), 6);

        let lines = std::fs::read_to_string(out_dir.path().join("socket_0.jsonl")).unwrap();
        assert_eq!(lines.lines().count(), 6);
    }

    #[test]
    fn test_udp_parts_arrive_in_order() {
        let receiver = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(std::time::Duration::from_secs(2)))
            .unwrap();
        let target = receiver.local_addr().unwrap();

        let (store, _fixture) = open_shared(5);
        let config = dispatcher::transports::UdpTransportConfig {
            targets: vec![target],
            format: dispatcher::transports::WireFormat::Json,
            max_packet_size: 65000,
        };
        let transport =
            dispatcher::UdpTransport::new("udp", config, Arc::clone(&store)).unwrap();

        transport.send_one(0);
        transport.send_one(0);

        let mut buf = [0u8; 65000];
        for expected in 0..2i64 {
            let (len, _) = receiver.recv_from(&mut buf).unwrap();
            let envelope: PartEnvelope = serde_json::from_slice(&buf[..len]).unwrap();
            assert_eq!(envelope.part_index, expected);
            assert_eq!(envelope.payload, serde_json::json!(expected));
        }
    }
}
