mod common;

use std::time::{Duration, Instant};

use solicitud_pdf::{ErrorKind, MongoStore, StoreConfig};

#[test]
fn failed_ping_is_a_connection_error() {
    let config = StoreConfig {
        host: "127.0.0.1".to_owned(),
        port: common::unused_local_port(),
        server_selection_timeout: Some(Duration::from_millis(300)),
        ..StoreConfig::default()
    };

    let started = Instant::now();
    let Err(err) = MongoStore::connect(&config) else {
        panic!("nothing should answer on port {}", config.port);
    };

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(err.to_string().starts_with("No se pudo conectar a la base de datos"));
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "the configured timeout should bound the attempt"
    );
}
