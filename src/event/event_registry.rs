//! # Event Registry
//!
//! Catalog of event kinds and their positional argument shapes.
//!
//! The process-wide instance ([`registry`]) is built once, on first access, by
//! registering every [`EventKind`] in declaration order. It is never mutated
//! afterwards, so readers need no locking.
//!
//! The registry describes events, it does not gate them: the dispatcher
//! delivers events without consulting it.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;
use tracing::debug;

use super::{
    error::{EventError, EventResult},
    types::{EventKind, FieldSchema},
    value::Value,
};

/// Metadata for one event kind.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventSchema {
    pub kind_name: String,
    pub fields: Vec<FieldSchema>,
    pub description: String,
}

impl EventSchema {
    pub fn new(
        kind_name: impl Into<String>,
        fields: Vec<FieldSchema>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind_name: kind_name.into(),
            fields,
            description: description.into(),
        }
    }

    /// Schema of a built-in kind.
    pub fn of(kind: EventKind) -> Self {
        Self::new(kind.name(), kind.fields().to_vec(), kind.description())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Default, Debug)]
pub struct EventRegistry {
    schemas: Vec<EventSchema>,
    index: HashMap<String, usize>,
}

lazy_static! {
    static ref REGISTRY: EventRegistry = EventRegistry::with_builtin_kinds()
        .expect("built-in event kinds must have unique names");
}

/// The process-wide registry holding every built-in kind.
pub fn registry() -> &'static EventRegistry {
    &REGISTRY
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with one entry per built-in [`EventKind`].
    pub fn with_builtin_kinds() -> EventResult<Self> {
        let mut registry = Self::new();
        for kind in EventKind::all() {
            registry.register(EventSchema::of(kind))?;
        }
        debug!("Registered {} built-in event kinds", registry.len());
        Ok(registry)
    }

    pub fn register(&mut self, schema: EventSchema) -> EventResult<()> {
        if self.index.contains_key(&schema.kind_name) {
            return Err(EventError::DuplicateKind {
                kind: schema.kind_name,
            });
        }
        self.index.insert(schema.kind_name.clone(), self.schemas.len());
        self.schemas.push(schema);
        Ok(())
    }

    pub fn lookup(&self, kind_name: &str) -> EventResult<&EventSchema> {
        self.index
            .get(kind_name)
            .map(|&i| &self.schemas[i])
            .ok_or_else(|| EventError::UnknownKind(kind_name.to_string()))
    }

    pub fn contains(&self, kind_name: &str) -> bool {
        self.index.contains_key(kind_name)
    }

    /// Every schema, in registration order. Each call starts a fresh pass.
    pub fn all_kinds(&self) -> impl Iterator<Item = &EventSchema> + '_ {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Checks positional args claiming to be of `kind_name` against its schema.
    ///
    /// Integer fields accept any integer here; range checks happen when the
    /// args are turned into a typed event.
    pub fn validate_args(&self, kind_name: &str, args: &[Value]) -> EventResult<()> {
        let schema = self.lookup(kind_name)?;

        if args.len() != schema.arity() {
            return Err(EventError::ArgsLengthNotMatched {
                kind: kind_name.to_string(),
                expected: schema.arity(),
                got: args.len(),
            });
        }

        for (field, value) in schema.fields.iter().zip(args) {
            if !field.ty.accepts(value) {
                return Err(EventError::ArgTypeMismatch {
                    kind: kind_name.to_string(),
                    field: field.name.to_string(),
                    expected: field.ty.to_string(),
                    got: value.type_name().to_string(),
                });
            }
        }

        Ok(())
    }
}
