//! RPC dispatch layer
//!
//! Wire values, the typed dispatch table, and the endpoint adapters. Every
//! reply is a value tuple whose first element is a status code; errors are
//! data, never panics, so nothing crosses the process boundary unshaped.

pub mod table;
pub mod value;
pub mod volmeter;

pub use table::{Collection, DispatchError, DispatchTable, Function, HandlerFn};
pub use value::{Value, ValueKind};

use crate::error::{BridgeError, ErrorCode};

/// Build a success reply: `Ok` status followed by the payload
pub(crate) fn reply_ok(payload: Vec<Value>) -> Vec<Value> {
    let mut reply = Vec::with_capacity(payload.len() + 1);
    reply.push(Value::UInt64(ErrorCode::Ok.as_u64()));
    reply.extend(payload);
    reply
}

/// Build a failure reply: status code and human-readable message
pub(crate) fn reply_err(err: &BridgeError) -> Vec<Value> {
    vec![
        Value::UInt64(err.code().as_u64()),
        Value::String(err.to_string()),
    ]
}
