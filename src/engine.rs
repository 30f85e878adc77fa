//! Engine Module
//!
//! The command engine that owns the key space.
//!
//! ## Responsibilities
//! - Execute one request at a time against the state
//! - Type-check every operation against the stored value
//! - Overflow-checked integer arithmetic
//! - Leave the state untouched whenever a command fails

use std::collections::{BTreeSet, HashMap};

use crate::error::{CommandError, DecodeError};
use crate::protocol::{Request, Response, Value};

/// Result of applying a single command
type CommandResult = Result<Value, CommandError>;

/// The command engine
///
/// ## Concurrency Model: Single Thread
///
/// The engine is driven by exactly one thread (the event loop), so all
/// mutation goes through `&mut self` and no locking is involved. Requests
/// are applied in the order they are read, which gives every client the
/// same total order of commands.
#[derive(Debug, Default)]
pub struct Engine {
    /// Key → value bindings
    state: HashMap<String, Value>,
}

impl Engine {
    /// Create an engine with an empty key space
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a request and produce its response
    ///
    /// Never fails: domain errors become `Error` responses.
    pub fn execute(&mut self, request: Request) -> Response {
        tracing::trace!("Executing {:?}", request);

        let result = match request {
            Request::Get { key } => self.get_value(&key),
            Request::SetValue { key, value } => self.set_value(key, value),
            Request::Increment { key } => self.step(key, 1),
            Request::Decrement { key } => self.step(key, -1),
            Request::SetAdd { key, values } => self.set_add(key, values),
            Request::SetUnion { keys } => self.set_union(&keys),
            Request::SetIntersection { keys } => self.set_intersection(&keys),
        };

        if let Err(e) = &result {
            tracing::debug!("Command rejected: {}", e);
        }

        result.into()
    }

    /// Turn a request that failed to decode into its response
    pub fn reject(&self, error: &DecodeError) -> Response {
        tracing::debug!("Malformed request: {}", error);
        error.into()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    fn get_value(&self, key: &str) -> CommandResult {
        self.state.get(key).cloned().ok_or(CommandError::Unbound)
    }

    fn set_value(&mut self, key: String, value: Value) -> CommandResult {
        self.state.insert(key, value);
        Ok(Value::ok())
    }

    /// Add `delta` (±1) to the integer under `key`
    fn step(&mut self, key: String, delta: i64) -> CommandResult {
        let current = match self.state.get(&key) {
            None => 0,
            Some(Value::Integer(i)) => *i,
            Some(_) => return Err(CommandError::NotAnInteger),
        };

        let next = current.checked_add(delta).ok_or(if delta > 0 {
            CommandError::Overflow
        } else {
            CommandError::Underflow
        })?;

        self.state.insert(key, Value::Integer(next));
        Ok(Value::Integer(next))
    }

    fn set_add(&mut self, key: String, values: Vec<String>) -> CommandResult {
        let set = match self
            .state
            .entry(key)
            .or_insert_with(|| Value::Set(BTreeSet::new()))
        {
            Value::Set(set) => set,
            _ => return Err(CommandError::NotASet),
        };

        let mut added: i64 = 0;
        for value in values {
            if set.insert(value) {
                added += 1;
            }
        }
        Ok(Value::Integer(added))
    }

    fn set_union(&self, keys: &[String]) -> CommandResult {
        let mut union = BTreeSet::new();
        for key in keys {
            if let Some(set) = self.lookup_set(key)? {
                union.extend(set.iter().cloned());
            }
        }
        Ok(Value::Set(union))
    }

    /// The first key must hold a set (absent is `Unbound`); later absent keys are skipped
    fn set_intersection(&self, keys: &[String]) -> CommandResult {
        let (first, rest) = keys.split_first().ok_or(CommandError::InvalidPacket)?;

        let mut intersection = self.lookup_set(first)?.ok_or(CommandError::Unbound)?.clone();
        for key in rest {
            if let Some(set) = self.lookup_set(key)? {
                intersection.retain(|element| set.contains(element));
            }
        }
        Ok(Value::Set(intersection))
    }

    /// Resolve `key` to a stored set; absent keys are `Ok(None)`
    fn lookup_set(&self, key: &str) -> Result<Option<&BTreeSet<String>>, CommandError> {
        match self.state.get(key) {
            None => Ok(None),
            Some(Value::Set(set)) => Ok(Some(set)),
            Some(_) => Err(CommandError::NotASet),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Peek at the value bound to `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Number of bound keys
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
