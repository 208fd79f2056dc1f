mod common;

use deluge_events::{
    registry, Event, EventError, EventKind, EventRegistry, EventSchema, FieldSchema,
    ParameterType, Value,
};
use pretty_assertions::assert_eq;

#[test]
fn test_every_kind_is_registered_with_its_arity() {
    let registry = registry();
    assert_eq!(registry.len(), 19);
    for kind in EventKind::all() {
        let schema = registry.lookup(kind.name()).unwrap();
        assert_eq!(schema.fields.len(), kind.fields().len(), "{}", kind);
    }
}

#[test]
fn test_declared_field_names() {
    let expected: Vec<(&str, Vec<&str>)> = vec![
        ("TorrentAdded", vec!["torrent_id", "from_state"]),
        ("TorrentRemoved", vec!["torrent_id"]),
        ("PreTorrentRemoved", vec!["torrent_id"]),
        ("TorrentStateChanged", vec!["torrent_id", "state"]),
        ("TorrentQueueChanged", vec![]),
        ("TorrentFolderRenamed", vec!["torrent_id", "old_path", "new_path"]),
        ("TorrentFileRenamed", vec!["torrent_id", "file_index", "new_name"]),
        ("TorrentFinished", vec!["torrent_id"]),
        ("TorrentResumed", vec!["torrent_id"]),
        ("TorrentFileCompleted", vec!["torrent_id", "file_index"]),
        ("TorrentStorageMoved", vec!["torrent_id", "new_path"]),
        ("CreateTorrentProgress", vec!["piece_count", "num_pieces"]),
        ("NewVersionAvailable", vec!["new_release"]),
        ("SessionStarted", vec![]),
        ("SessionPaused", vec![]),
        ("SessionResumed", vec![]),
        ("ConfigValueChanged", vec!["key", "value"]),
        ("PluginEnabled", vec!["plugin_name"]),
        ("PluginDisabled", vec!["plugin_name"]),
    ];

    let actual: Vec<(&str, Vec<&str>)> = registry()
        .all_kinds()
        .map(|schema| (schema.kind_name.as_str(), schema.field_names().collect()))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_registering_twice_fails() {
    let mut registry = EventRegistry::new();
    registry.register(EventSchema::of(EventKind::TorrentAdded)).unwrap();
    let err = registry
        .register(EventSchema::new(
            "TorrentAdded",
            vec![FieldSchema::new("torrent_id", ParameterType::String)],
            "same name, different shape",
        ))
        .unwrap_err();
    assert_eq!(
        err,
        EventError::DuplicateKind {
            kind: "TorrentAdded".to_string()
        }
    );
    assert_eq!(registry.lookup("TorrentAdded").unwrap().arity(), 2);
}

#[test]
fn test_lookup_unknown_kind() {
    assert_eq!(
        registry().lookup("TorrentAddedEvent"),
        Err(EventError::UnknownKind("TorrentAddedEvent".to_string()))
    );
}

#[test]
fn test_schema_json_for_documentation() {
    let schema = registry().lookup("TorrentFileCompleted").unwrap();
    let json = serde_json::to_value(schema).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind_name": "TorrentFileCompleted",
            "fields": [
                {"name": "torrent_id", "type": "string"},
                {"name": "file_index", "type": "int"}
            ],
            "description": "Emitted when a file completes."
        })
    );
}

#[test]
fn test_validate_incoming_wire_data() {
    let registry = registry();
    let event = Event::torrent_added("abc123", true);
    registry
        .validate_args(event.kind_name(), &event.args())
        .unwrap();

    let err = registry
        .validate_args("TorrentAdded", &[Value::from("abc123"), Value::from("yes")])
        .unwrap_err();
    assert!(err.is_invalid_args());

    let err = registry.validate_args("TorrentAdded", &[]).unwrap_err();
    assert!(err.is_invalid_args());
}
