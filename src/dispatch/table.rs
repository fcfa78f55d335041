//! Typed dispatch table
//!
//! Maps `collection.method` names to strongly-typed handler functions.
//! Signatures are declared once at registration — duplicate names are
//! rejected there — and every call is checked against the declared
//! parameter kinds before the handler runs, so handlers can assume
//! well-formed arguments.

use std::collections::HashMap;

use crate::error::ErrorCode;
use crate::server::ServerContext;

use super::value::{Value, ValueKind};

/// Handler signature: validated args in, status-first reply out
pub type HandlerFn = fn(&ServerContext, &[Value]) -> Vec<Value>;

/// Error type for dispatch-table registration
#[derive(Debug, Clone)]
pub enum DispatchError {
    /// A collection with this name is already registered
    DuplicateCollection(String),
    /// A function with this name already exists in the collection
    DuplicateFunction(String),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::DuplicateCollection(name) => {
                write!(f, "Duplicate collection: {}", name)
            }
            DispatchError::DuplicateFunction(name) => {
                write!(f, "Duplicate function: {}", name)
            }
        }
    }
}

impl std::error::Error for DispatchError {}

/// A registered RPC endpoint
pub struct Function {
    name: String,
    params: Vec<ValueKind>,
    handler: HandlerFn,
}

impl Function {
    /// Declare an endpoint with its parameter signature
    pub fn new(name: impl Into<String>, params: Vec<ValueKind>, handler: HandlerFn) -> Self {
        Self {
            name: name.into(),
            params,
            handler,
        }
    }
}

/// A named group of endpoints
pub struct Collection {
    name: String,
    functions: HashMap<String, Function>,
}

impl Collection {
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: HashMap::new(),
        }
    }

    /// Register a function; fails on a duplicate name
    pub fn register_function(&mut self, function: Function) -> Result<(), DispatchError> {
        if self.functions.contains_key(&function.name) {
            return Err(DispatchError::DuplicateFunction(function.name));
        }
        self.functions.insert(function.name.clone(), function);
        Ok(())
    }
}

/// The server's method-routing table
pub struct DispatchTable {
    collections: HashMap<String, Collection>,
}

impl DispatchTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
        }
    }

    /// Register a collection; fails on a duplicate name
    pub fn register_collection(&mut self, collection: Collection) -> Result<(), DispatchError> {
        if self.collections.contains_key(&collection.name) {
            return Err(DispatchError::DuplicateCollection(collection.name));
        }
        self.collections.insert(collection.name.clone(), collection);
        Ok(())
    }

    /// Route one RPC call
    ///
    /// Unknown names and signature mismatches produce an `Error` reply;
    /// nothing escapes as a panic.
    pub fn call(
        &self,
        ctx: &ServerContext,
        collection: &str,
        method: &str,
        args: &[Value],
    ) -> Vec<Value> {
        let Some(cls) = self.collections.get(collection) else {
            return Self::error_reply(format!("Unknown collection: {}", collection));
        };
        let Some(function) = cls.functions.get(method) else {
            return Self::error_reply(format!("Unknown method: {}.{}", collection, method));
        };

        if args.len() != function.params.len() {
            return Self::error_reply(format!(
                "{}.{} expects {} argument(s), got {}",
                collection,
                method,
                function.params.len(),
                args.len()
            ));
        }
        for (index, (arg, expected)) in args.iter().zip(&function.params).enumerate() {
            if arg.kind() != *expected {
                return Self::error_reply(format!(
                    "{}.{} argument {} has wrong type",
                    collection, method, index
                ));
            }
        }

        (function.handler)(ctx, args)
    }

    fn error_reply(message: String) -> Vec<Value> {
        tracing::debug!(%message, "dispatch rejected call");
        vec![
            Value::UInt64(ErrorCode::Error.as_u64()),
            Value::String(message),
        ]
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::native::mock::MockBackend;
    use crate::native::AudioBackend;

    fn context() -> ServerContext {
        ServerContext::new(Arc::new(MockBackend::new()) as Arc<dyn AudioBackend>)
    }

    fn echo(_ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
        let mut reply = vec![Value::UInt64(ErrorCode::Ok.as_u64())];
        reply.extend_from_slice(args);
        reply
    }

    fn table() -> DispatchTable {
        let mut cls = Collection::new("Test");
        cls.register_function(Function::new("Echo", vec![ValueKind::UInt64], echo))
            .unwrap();
        let mut table = DispatchTable::new();
        table.register_collection(cls).unwrap();
        table
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut cls = Collection::new("Test");
        cls.register_function(Function::new("Echo", vec![], echo))
            .unwrap();
        assert!(matches!(
            cls.register_function(Function::new("Echo", vec![], echo)),
            Err(DispatchError::DuplicateFunction(_))
        ));

        let mut table = DispatchTable::new();
        table.register_collection(Collection::new("Test")).unwrap();
        assert!(matches!(
            table.register_collection(Collection::new("Test")),
            Err(DispatchError::DuplicateCollection(_))
        ));
    }

    #[test]
    fn test_valid_call_reaches_handler() {
        let ctx = context();
        let reply = table().call(&ctx, "Test", "Echo", &[Value::UInt64(9)]);
        assert_eq!(reply[0].as_u64(), Some(ErrorCode::Ok.as_u64()));
        assert_eq!(reply[1].as_u64(), Some(9));
    }

    #[test]
    fn test_unknown_names() {
        let ctx = context();
        let table = table();

        let reply = table.call(&ctx, "Nope", "Echo", &[]);
        assert_eq!(reply[0].as_u64(), Some(ErrorCode::Error.as_u64()));

        let reply = table.call(&ctx, "Test", "Nope", &[]);
        assert_eq!(reply[0].as_u64(), Some(ErrorCode::Error.as_u64()));
    }

    #[test]
    fn test_arity_mismatch() {
        let ctx = context();
        let reply = table().call(&ctx, "Test", "Echo", &[]);
        assert_eq!(reply[0].as_u64(), Some(ErrorCode::Error.as_u64()));
        assert!(reply[1].as_str().unwrap().contains("expects 1"));
    }

    #[test]
    fn test_type_mismatch() {
        let ctx = context();
        let reply = table().call(&ctx, "Test", "Echo", &[Value::Int32(1)]);
        assert_eq!(reply[0].as_u64(), Some(ErrorCode::Error.as_u64()));
        assert!(reply[1].as_str().unwrap().contains("wrong type"));
    }
}
