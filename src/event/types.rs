//! # Event variants
//!
//! [`Event`] is the closed set of notifications the daemon raises. Each variant
//! carries its payload as named, typed fields; [`Event::args`] projects them into
//! the positional [`Value`] list that goes on the wire.
//!
//! The field order of every variant is part of the wire contract. Reordering or
//! inserting a field in an existing variant breaks every client.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::{
    error::{EventError, EventResult},
    value::Value,
};

/// Declared type of a positional event argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Int,
    Boolean,
    /// Any wire primitive, used for config values.
    Any,
}

impl ParameterType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParameterType::String => matches!(value, Value::String(_)),
            ParameterType::Int => matches!(value, Value::Integer(_)),
            ParameterType::Boolean => matches!(value, Value::Boolean(_)),
            ParameterType::Any => true,
        }
    }
}

/// One named, typed slot in an event's argument list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: ParameterType,
}

impl FieldSchema {
    pub const fn new(name: &'static str, ty: ParameterType) -> Self {
        Self { name, ty }
    }
}

const TORRENT_ID: FieldSchema = FieldSchema::new("torrent_id", ParameterType::String);

/// Notification raised by the daemon and fanned out to subscribers.
///
/// The discriminant is available as [`EventKind`]; its name is the event's
/// registered kind name.
#[derive(Debug, Clone, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(
    name(EventKind),
    derive(
        Hash,
        PartialOrd,
        Ord,
        strum::EnumIter,
        strum::EnumString,
        strum::Display,
        strum::IntoStaticStr
    )
)]
pub enum Event {
    /// A new torrent was added to the session.
    TorrentAdded { torrent_id: String, from_state: bool },
    TorrentRemoved { torrent_id: String },
    PreTorrentRemoved { torrent_id: String },
    TorrentStateChanged { torrent_id: String, state: String },
    TorrentQueueChanged,
    TorrentFolderRenamed {
        torrent_id: String,
        old_path: String,
        new_path: String,
    },
    TorrentFileRenamed {
        torrent_id: String,
        file_index: u32,
        new_name: String,
    },
    TorrentFinished { torrent_id: String },
    TorrentResumed { torrent_id: String },
    TorrentFileCompleted { torrent_id: String, file_index: u32 },
    TorrentStorageMoved { torrent_id: String, new_path: String },
    /// Progress of a torrent file being created remotely.
    CreateTorrentProgress { piece_count: u32, num_pieces: u32 },
    NewVersionAvailable { new_release: String },
    SessionStarted,
    SessionPaused,
    SessionResumed,
    ConfigValueChanged { key: String, value: Value },
    PluginEnabled { plugin_name: String },
    PluginDisabled { plugin_name: String },
}

impl EventKind {
    /// Registered kind name. Identical to the variant name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn parse(name: &str) -> EventResult<Self> {
        EventKind::from_str(name).map_err(|_| EventError::UnknownKind(name.to_string()))
    }

    pub fn all() -> impl Iterator<Item = EventKind> {
        EventKind::iter()
    }

    /// Declared positional fields, in wire order.
    pub fn fields(self) -> &'static [FieldSchema] {
        use ParameterType::{Any, Boolean, Int, String};
        match self {
            EventKind::TorrentAdded => const { &[TORRENT_ID, FieldSchema::new("from_state", Boolean)] },
            EventKind::TorrentRemoved
            | EventKind::PreTorrentRemoved
            | EventKind::TorrentFinished
            | EventKind::TorrentResumed => const { &[TORRENT_ID] },
            EventKind::TorrentStateChanged => const { &[TORRENT_ID, FieldSchema::new("state", String)] },
            EventKind::TorrentFolderRenamed => const { &[
                TORRENT_ID,
                FieldSchema::new("old_path", String),
                FieldSchema::new("new_path", String),
            ] },
            EventKind::TorrentFileRenamed => const { &[
                TORRENT_ID,
                FieldSchema::new("file_index", Int),
                FieldSchema::new("new_name", String),
            ] },
            EventKind::TorrentFileCompleted => const { &[TORRENT_ID, FieldSchema::new("file_index", Int)] },
            EventKind::TorrentStorageMoved => const { &[TORRENT_ID, FieldSchema::new("new_path", String)] },
            EventKind::CreateTorrentProgress => const { &[
                FieldSchema::new("piece_count", Int),
                FieldSchema::new("num_pieces", Int),
            ] },
            EventKind::NewVersionAvailable => const { &[FieldSchema::new("new_release", String)] },
            EventKind::ConfigValueChanged => {
                const { &[FieldSchema::new("key", String), FieldSchema::new("value", Any)] }
            }
            EventKind::PluginEnabled | EventKind::PluginDisabled => {
                const { &[FieldSchema::new("plugin_name", String)] }
            }
            EventKind::TorrentQueueChanged
            | EventKind::SessionStarted
            | EventKind::SessionPaused
            | EventKind::SessionResumed => const { &[] },
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            EventKind::TorrentAdded => {
                "Emitted when a new torrent is successfully added to the session."
            }
            EventKind::TorrentRemoved => {
                "Emitted when a torrent has been removed from the session."
            }
            EventKind::PreTorrentRemoved => {
                "Emitted when a torrent is about to be removed from the session."
            }
            EventKind::TorrentStateChanged => "Emitted when a torrent changes state.",
            EventKind::TorrentQueueChanged => "Emitted when the queue order has changed.",
            EventKind::TorrentFolderRenamed => {
                "Emitted when a folder within a torrent has been renamed."
            }
            EventKind::TorrentFileRenamed => {
                "Emitted when a file within a torrent has been renamed."
            }
            EventKind::TorrentFinished => "Emitted when a torrent finishes downloading.",
            EventKind::TorrentResumed => "Emitted when a torrent resumes from a paused state.",
            EventKind::TorrentFileCompleted => "Emitted when a file completes.",
            EventKind::TorrentStorageMoved => {
                "Emitted when the storage location for a torrent has been moved."
            }
            EventKind::CreateTorrentProgress => "Emitted when creating a torrent file remotely.",
            EventKind::NewVersionAvailable => {
                "Emitted when a more recent version of the daemon is available."
            }
            EventKind::SessionStarted => {
                "Emitted when a session has started. Typically once, when the daemon starts."
            }
            EventKind::SessionPaused => "Emitted when the session has been paused.",
            EventKind::SessionResumed => "Emitted when the session has been resumed.",
            EventKind::ConfigValueChanged => "Emitted when a config value changes in the core.",
            EventKind::PluginEnabled => "Emitted when a plugin is enabled in the core.",
            EventKind::PluginDisabled => "Emitted when a plugin is disabled in the core.",
        }
    }
}

impl Event {
    pub fn torrent_added(torrent_id: impl Into<String>, from_state: bool) -> Self {
        Event::TorrentAdded {
            torrent_id: torrent_id.into(),
            from_state,
        }
    }

    pub fn torrent_removed(torrent_id: impl Into<String>) -> Self {
        Event::TorrentRemoved {
            torrent_id: torrent_id.into(),
        }
    }

    pub fn pre_torrent_removed(torrent_id: impl Into<String>) -> Self {
        Event::PreTorrentRemoved {
            torrent_id: torrent_id.into(),
        }
    }

    pub fn torrent_state_changed(torrent_id: impl Into<String>, state: impl Into<String>) -> Self {
        Event::TorrentStateChanged {
            torrent_id: torrent_id.into(),
            state: state.into(),
        }
    }

    pub fn torrent_folder_renamed(
        torrent_id: impl Into<String>,
        old_path: impl Into<String>,
        new_path: impl Into<String>,
    ) -> Self {
        Event::TorrentFolderRenamed {
            torrent_id: torrent_id.into(),
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }

    pub fn torrent_file_renamed(
        torrent_id: impl Into<String>,
        file_index: u32,
        new_name: impl Into<String>,
    ) -> Self {
        Event::TorrentFileRenamed {
            torrent_id: torrent_id.into(),
            file_index,
            new_name: new_name.into(),
        }
    }

    pub fn torrent_finished(torrent_id: impl Into<String>) -> Self {
        Event::TorrentFinished {
            torrent_id: torrent_id.into(),
        }
    }

    pub fn torrent_resumed(torrent_id: impl Into<String>) -> Self {
        Event::TorrentResumed {
            torrent_id: torrent_id.into(),
        }
    }

    pub fn torrent_file_completed(torrent_id: impl Into<String>, file_index: u32) -> Self {
        Event::TorrentFileCompleted {
            torrent_id: torrent_id.into(),
            file_index,
        }
    }

    pub fn torrent_storage_moved(
        torrent_id: impl Into<String>,
        new_path: impl Into<String>,
    ) -> Self {
        Event::TorrentStorageMoved {
            torrent_id: torrent_id.into(),
            new_path: new_path.into(),
        }
    }

    pub fn create_torrent_progress(piece_count: u32, num_pieces: u32) -> Self {
        Event::CreateTorrentProgress {
            piece_count,
            num_pieces,
        }
    }

    pub fn new_version_available(new_release: impl Into<String>) -> Self {
        Event::NewVersionAvailable {
            new_release: new_release.into(),
        }
    }

    pub fn config_value_changed(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Event::ConfigValueChanged {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn plugin_enabled(plugin_name: impl Into<String>) -> Self {
        Event::PluginEnabled {
            plugin_name: plugin_name.into(),
        }
    }

    pub fn plugin_disabled(plugin_name: impl Into<String>) -> Self {
        Event::PluginDisabled {
            plugin_name: plugin_name.into(),
        }
    }

    pub fn kind(&self) -> EventKind {
        EventKind::from(self)
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Fields in declaration order. Field-less kinds yield an empty list.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Event::TorrentAdded {
                torrent_id,
                from_state,
            } => vec![torrent_id.as_str().into(), (*from_state).into()],
            Event::TorrentRemoved { torrent_id }
            | Event::PreTorrentRemoved { torrent_id }
            | Event::TorrentFinished { torrent_id }
            | Event::TorrentResumed { torrent_id } => vec![torrent_id.as_str().into()],
            Event::TorrentStateChanged { torrent_id, state } => {
                vec![torrent_id.as_str().into(), state.as_str().into()]
            }
            Event::TorrentFolderRenamed {
                torrent_id,
                old_path,
                new_path,
            } => vec![
                torrent_id.as_str().into(),
                old_path.as_str().into(),
                new_path.as_str().into(),
            ],
            Event::TorrentFileRenamed {
                torrent_id,
                file_index,
                new_name,
            } => vec![
                torrent_id.as_str().into(),
                (*file_index).into(),
                new_name.as_str().into(),
            ],
            Event::TorrentFileCompleted {
                torrent_id,
                file_index,
            } => vec![torrent_id.as_str().into(), (*file_index).into()],
            Event::TorrentStorageMoved {
                torrent_id,
                new_path,
            } => vec![torrent_id.as_str().into(), new_path.as_str().into()],
            Event::CreateTorrentProgress {
                piece_count,
                num_pieces,
            } => vec![(*piece_count).into(), (*num_pieces).into()],
            Event::NewVersionAvailable { new_release } => vec![new_release.as_str().into()],
            Event::ConfigValueChanged { key, value } => vec![key.as_str().into(), value.clone()],
            Event::PluginEnabled { plugin_name } | Event::PluginDisabled { plugin_name } => {
                vec![plugin_name.as_str().into()]
            }
            Event::TorrentQueueChanged
            | Event::SessionStarted
            | Event::SessionPaused
            | Event::SessionResumed => Vec::new(),
        }
    }

    /// Builds an event from its kind name and positional args, as received
    /// from the wire. No coercion is applied.
    pub fn from_args(kind_name: &str, args: Vec<Value>) -> EventResult<Self> {
        let kind = EventKind::parse(kind_name)?;
        let expected = kind.fields().len();
        if args.len() != expected {
            return Err(EventError::ArgsLengthNotMatched {
                kind: kind_name.to_string(),
                expected,
                got: args.len(),
            });
        }

        let mut args = ArgCursor::new(kind, args);
        let event = match kind {
            EventKind::TorrentAdded => Event::TorrentAdded {
                torrent_id: args.string()?,
                from_state: args.boolean()?,
            },
            EventKind::TorrentRemoved => Event::TorrentRemoved {
                torrent_id: args.string()?,
            },
            EventKind::PreTorrentRemoved => Event::PreTorrentRemoved {
                torrent_id: args.string()?,
            },
            EventKind::TorrentStateChanged => Event::TorrentStateChanged {
                torrent_id: args.string()?,
                state: args.string()?,
            },
            EventKind::TorrentQueueChanged => Event::TorrentQueueChanged,
            EventKind::TorrentFolderRenamed => Event::TorrentFolderRenamed {
                torrent_id: args.string()?,
                old_path: args.string()?,
                new_path: args.string()?,
            },
            EventKind::TorrentFileRenamed => Event::TorrentFileRenamed {
                torrent_id: args.string()?,
                file_index: args.index()?,
                new_name: args.string()?,
            },
            EventKind::TorrentFinished => Event::TorrentFinished {
                torrent_id: args.string()?,
            },
            EventKind::TorrentResumed => Event::TorrentResumed {
                torrent_id: args.string()?,
            },
            EventKind::TorrentFileCompleted => Event::TorrentFileCompleted {
                torrent_id: args.string()?,
                file_index: args.index()?,
            },
            EventKind::TorrentStorageMoved => Event::TorrentStorageMoved {
                torrent_id: args.string()?,
                new_path: args.string()?,
            },
            EventKind::CreateTorrentProgress => Event::CreateTorrentProgress {
                piece_count: args.count()?,
                num_pieces: args.count()?,
            },
            EventKind::NewVersionAvailable => Event::NewVersionAvailable {
                new_release: args.string()?,
            },
            EventKind::SessionStarted => Event::SessionStarted,
            EventKind::SessionPaused => Event::SessionPaused,
            EventKind::SessionResumed => Event::SessionResumed,
            EventKind::ConfigValueChanged => Event::ConfigValueChanged {
                key: args.string()?,
                value: args.any()?,
            },
            EventKind::PluginEnabled => Event::PluginEnabled {
                plugin_name: args.string()?,
            },
            EventKind::PluginDisabled => Event::PluginDisabled {
                plugin_name: args.string()?,
            },
        };
        Ok(event)
    }

    /// Id of the torrent the event is about, if it concerns a single torrent.
    pub fn torrent_id(&self) -> Option<&str> {
        match self {
            Event::TorrentAdded { torrent_id, .. }
            | Event::TorrentRemoved { torrent_id }
            | Event::PreTorrentRemoved { torrent_id }
            | Event::TorrentStateChanged { torrent_id, .. }
            | Event::TorrentFolderRenamed { torrent_id, .. }
            | Event::TorrentFileRenamed { torrent_id, .. }
            | Event::TorrentFinished { torrent_id }
            | Event::TorrentResumed { torrent_id }
            | Event::TorrentFileCompleted { torrent_id, .. }
            | Event::TorrentStorageMoved { torrent_id, .. } => Some(torrent_id),
            _ => None,
        }
    }

    pub fn to_wire(&self) -> WireEvent {
        WireEvent(self.kind_name().to_string(), self.args())
    }
}

/// Walks positional args in declaration order, checking each against its field.
struct ArgCursor {
    kind: EventKind,
    values: std::vec::IntoIter<Value>,
    position: usize,
}

impl ArgCursor {
    fn new(kind: EventKind, values: Vec<Value>) -> Self {
        Self {
            kind,
            values: values.into_iter(),
            position: 0,
        }
    }

    fn next(&mut self) -> EventResult<(FieldSchema, Value)> {
        let fields = self.kind.fields();
        let field = fields.get(self.position).copied();
        let value = self.values.next();
        self.position += 1;
        match (field, value) {
            (Some(field), Some(value)) => Ok((field, value)),
            _ => Err(EventError::ArgsLengthNotMatched {
                kind: self.kind.name().to_string(),
                expected: fields.len(),
                got: self.position,
            }),
        }
    }

    fn mismatch(&self, field: FieldSchema, expected: &str, got: &Value) -> EventError {
        EventError::ArgTypeMismatch {
            kind: self.kind.name().to_string(),
            field: field.name.to_string(),
            expected: expected.to_string(),
            got: got.type_name().to_string(),
        }
    }

    fn string(&mut self) -> EventResult<String> {
        match self.next()? {
            (_, Value::String(s)) => Ok(s),
            (field, other) => Err(self.mismatch(field, "string", &other)),
        }
    }

    fn boolean(&mut self) -> EventResult<bool> {
        match self.next()? {
            (_, Value::Boolean(b)) => Ok(b),
            (field, other) => Err(self.mismatch(field, "boolean", &other)),
        }
    }

    fn index(&mut self) -> EventResult<u32> {
        let (field, value) = self.next()?;
        value
            .as_i64()
            .and_then(|i| u32::try_from(i).ok())
            .ok_or_else(|| self.mismatch(field, "non-negative 32-bit integer", &value))
    }

    fn count(&mut self) -> EventResult<u32> {
        let (field, value) = self.next()?;
        value
            .as_i64()
            .and_then(|i| u32::try_from(i).ok())
            .ok_or_else(|| self.mismatch(field, "non-negative 32-bit count", &value))
    }

    fn any(&mut self) -> EventResult<Value> {
        self.next().map(|(_, value)| value)
    }
}

/// Canonical wire shape of an event: `[kind_name, [args...]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEvent(pub String, pub Vec<Value>);

impl WireEvent {
    pub fn kind_name(&self) -> &str {
        &self.0
    }

    pub fn args(&self) -> &[Value] {
        &self.1
    }

    pub fn into_event(self) -> EventResult<Event> {
        Event::from_args(&self.0, self.1)
    }
}

impl From<&Event> for WireEvent {
    fn from(event: &Event) -> Self {
        event.to_wire()
    }
}

impl TryFrom<WireEvent> for Event {
    type Error = EventError;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        wire.into_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_events() -> Vec<Event> {
        vec![
            Event::torrent_added("abc123", false),
            Event::torrent_removed("abc123"),
            Event::pre_torrent_removed("abc123"),
            Event::torrent_state_changed("abc123", "Seeding"),
            Event::TorrentQueueChanged,
            Event::torrent_folder_renamed("abc123", "old", "new"),
            Event::torrent_file_renamed("abc123", 2, "b.iso"),
            Event::torrent_finished("abc123"),
            Event::torrent_resumed("abc123"),
            Event::torrent_file_completed("abc123", 7),
            Event::torrent_storage_moved("abc123", "/data"),
            Event::create_torrent_progress(10, 250),
            Event::new_version_available("2.1.0"),
            Event::SessionStarted,
            Event::SessionPaused,
            Event::SessionResumed,
            Event::config_value_changed("max_connections_global", 200_i64),
            Event::plugin_enabled("Label"),
            Event::plugin_disabled("Label"),
        ]
    }

    #[test]
    fn test_every_kind_has_a_sample() {
        let mut kinds: Vec<EventKind> = sample_events().iter().map(Event::kind).collect();
        kinds.sort();
        let all: Vec<EventKind> = EventKind::all().collect();
        assert_eq!(kinds, all);
    }

    #[test]
    fn test_args_follow_constructor_order() {
        assert_eq!(
            Event::torrent_added("abc123", false).args(),
            vec![Value::from("abc123"), Value::from(false)]
        );
        assert_eq!(
            Event::torrent_file_renamed("abc123", 2, "b.iso").args(),
            vec![Value::from("abc123"), Value::Integer(2), Value::from("b.iso")]
        );
        assert_eq!(
            Event::create_torrent_progress(10, 250).args(),
            vec![Value::Integer(10), Value::Integer(250)]
        );
    }

    #[test]
    fn test_fieldless_kind() {
        let event = Event::TorrentQueueChanged;
        assert_eq!(event.args(), Vec::<Value>::new());
        assert_eq!(event.kind_name(), "TorrentQueueChanged");
    }

    #[test]
    fn test_args_len_matches_declared_fields() {
        for event in sample_events() {
            assert_eq!(
                event.args().len(),
                event.kind().fields().len(),
                "{}",
                event.kind_name()
            );
        }
    }

    #[test]
    fn test_args_match_declared_types() {
        for event in sample_events() {
            for (field, value) in event.kind().fields().iter().zip(event.args()) {
                assert!(
                    field.ty.accepts(&value),
                    "{}.{} rejects {:?}",
                    event.kind_name(),
                    field.name,
                    value
                );
            }
        }
    }

    #[test]
    fn test_from_args_rebuilds_every_kind() {
        for event in sample_events() {
            let rebuilt = Event::from_args(event.kind_name(), event.args()).unwrap();
            assert_eq!(rebuilt, event);
        }
    }

    #[test]
    fn test_from_args_unknown_kind() {
        let err = Event::from_args("TorrentExploded", vec![]).unwrap_err();
        assert_eq!(err, EventError::UnknownKind("TorrentExploded".to_string()));
        assert!(!err.is_invalid_args());
    }

    #[test]
    fn test_from_args_wrong_arity() {
        let err = Event::from_args("TorrentAdded", vec![Value::from("abc")]).unwrap_err();
        assert_eq!(
            err,
            EventError::ArgsLengthNotMatched {
                kind: "TorrentAdded".to_string(),
                expected: 2,
                got: 1,
            }
        );
        assert!(err.is_invalid_args());

        let err = Event::from_args("SessionStarted", vec![Value::Null]).unwrap_err();
        assert!(err.is_invalid_args());
    }

    #[test]
    fn test_from_args_rejects_coercion() {
        let err = Event::from_args("TorrentAdded", vec![Value::from("abc"), Value::Integer(0)])
            .unwrap_err();
        assert_eq!(
            err,
            EventError::ArgTypeMismatch {
                kind: "TorrentAdded".to_string(),
                field: "from_state".to_string(),
                expected: "boolean".to_string(),
                got: "integer".to_string(),
            }
        );

        let err = Event::from_args(
            "TorrentFileCompleted",
            vec![Value::from("abc"), Value::from("3")],
        )
        .unwrap_err();
        assert!(err.is_invalid_args());

        let err = Event::from_args(
            "TorrentFileCompleted",
            vec![Value::from("abc"), Value::Integer(-1)],
        )
        .unwrap_err();
        assert!(err.is_invalid_args());
    }

    #[test]
    fn test_progress_counts_round_trip_at_max() {
        let event = Event::create_torrent_progress(u32::MAX, u32::MAX);
        assert_eq!(
            event.args(),
            vec![Value::Integer(i64::from(u32::MAX)), Value::Integer(i64::from(u32::MAX))]
        );
        assert_eq!(Event::from_args(event.kind_name(), event.args()).unwrap(), event);

        let err = Event::from_args(
            "CreateTorrentProgress",
            vec![Value::Integer(i64::from(u32::MAX) + 1), Value::Integer(1)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            EventError::ArgTypeMismatch {
                kind: "CreateTorrentProgress".to_string(),
                field: "piece_count".to_string(),
                expected: "non-negative 32-bit count".to_string(),
                got: "integer".to_string(),
            }
        );
    }

    #[test]
    fn test_config_value_accepts_any_value() {
        let event = Event::from_args(
            "ConfigValueChanged",
            vec![Value::from("listen_ports"), Value::from(vec![6881_i64, 6891])],
        )
        .unwrap();
        assert_eq!(
            event,
            Event::config_value_changed("listen_ports", vec![6881_i64, 6891])
        );
    }

    #[test]
    fn test_wire_json_shape() {
        let wire = Event::torrent_added("abc123", false).to_wire();
        let json = serde_json::to_string(&wire).unwrap();
        assert_eq!(json, r#"["TorrentAdded",["abc123",false]]"#);

        let wire = Event::SessionStarted.to_wire();
        assert_eq!(serde_json::to_string(&wire).unwrap(), r#"["SessionStarted",[]]"#);
    }

    #[test]
    fn test_wire_json_into_event() {
        let wire: WireEvent =
            serde_json::from_str(r#"["TorrentStateChanged",["abc123","Paused"]]"#).unwrap();
        let event = Event::try_from(wire).unwrap();
        assert_eq!(event, Event::torrent_state_changed("abc123", "Paused"));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(EventKind::parse("PluginEnabled").unwrap(), EventKind::PluginEnabled);
        assert!(EventKind::parse("pluginenabled").is_err());
        assert_eq!(EventKind::PluginEnabled.to_string(), "PluginEnabled");
    }

    #[test]
    fn test_torrent_id() {
        assert_eq!(Event::torrent_finished("x").torrent_id(), Some("x"));
        assert_eq!(Event::plugin_enabled("Label").torrent_id(), None);
    }
}
