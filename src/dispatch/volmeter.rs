//! VolMeter RPC endpoints
//!
//! Thin adapters between the wire and the volmeter manager: resolve ids,
//! delegate, and shape `(status, ...)` replies. The dispatch table has
//! already checked arity and argument kinds when a handler runs.

use crate::error::BridgeError;
use crate::native::FaderType;
use crate::server::ServerContext;

use super::table::{Collection, DispatchError, DispatchTable, Function};
use super::value::{Value, ValueKind};
use super::{reply_err, reply_ok};

/// Register the `VolMeter` collection on a dispatch table
pub fn register(table: &mut DispatchTable) -> Result<(), DispatchError> {
    let mut cls = Collection::new("VolMeter");
    cls.register_function(Function::new("Create", vec![ValueKind::Int32], create))?;
    cls.register_function(Function::new("Destroy", vec![ValueKind::UInt64], destroy))?;
    cls.register_function(Function::new(
        "GetUpdateInterval",
        vec![ValueKind::UInt64],
        get_update_interval,
    ))?;
    cls.register_function(Function::new(
        "SetUpdateInterval",
        vec![ValueKind::UInt64, ValueKind::UInt32],
        set_update_interval,
    ))?;
    cls.register_function(Function::new(
        "Attach",
        vec![ValueKind::UInt64, ValueKind::UInt64],
        attach,
    ))?;
    cls.register_function(Function::new("Detach", vec![ValueKind::UInt64], detach))?;
    cls.register_function(Function::new(
        "AddCallback",
        vec![ValueKind::UInt64],
        add_callback,
    ))?;
    cls.register_function(Function::new(
        "RemoveCallback",
        vec![ValueKind::UInt64],
        remove_callback,
    ))?;
    table.register_collection(cls)
}

fn malformed() -> Vec<Value> {
    reply_err(&BridgeError::OperationFailed("Malformed argument.".into()))
}

fn create(ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
    let Some(raw) = args[0].as_i32() else {
        return malformed();
    };
    let Some(fader) = FaderType::from_i32(raw) else {
        return reply_err(&BridgeError::OperationFailed("Unknown fader type.".into()));
    };
    match ctx.volmeters.create(fader) {
        Ok((id, interval)) => reply_ok(vec![Value::UInt64(id), Value::UInt32(interval)]),
        Err(err) => reply_err(&err),
    }
}

fn destroy(ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
    let Some(id) = args[0].as_u64() else {
        return malformed();
    };
    match ctx.volmeters.destroy(id) {
        Ok(()) => reply_ok(Vec::new()),
        Err(err) => reply_err(&err),
    }
}

fn get_update_interval(ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
    let Some(id) = args[0].as_u64() else {
        return malformed();
    };
    match ctx.volmeters.update_interval(id) {
        Ok(interval) => reply_ok(vec![Value::UInt32(interval)]),
        Err(err) => reply_err(&err),
    }
}

fn set_update_interval(ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
    let (Some(id), Some(millis)) = (args[0].as_u64(), args[1].as_u32()) else {
        return malformed();
    };
    match ctx.volmeters.set_update_interval(id, millis) {
        Ok(interval) => reply_ok(vec![Value::UInt32(interval)]),
        Err(err) => reply_err(&err),
    }
}

fn attach(ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
    let (Some(meter_id), Some(source_id)) = (args[0].as_u64(), args[1].as_u64()) else {
        return malformed();
    };
    match ctx.volmeters.attach(meter_id, source_id, &ctx.sources) {
        Ok(()) => reply_ok(Vec::new()),
        Err(err) => reply_err(&err),
    }
}

fn detach(ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
    let Some(id) = args[0].as_u64() else {
        return malformed();
    };
    match ctx.volmeters.detach(id) {
        Ok(()) => reply_ok(Vec::new()),
        Err(err) => reply_err(&err),
    }
}

fn add_callback(ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
    let Some(id) = args[0].as_u64() else {
        return malformed();
    };
    match ctx.volmeters.add_callback(id) {
        Ok(refs) => reply_ok(vec![Value::UInt32(refs)]),
        Err(err) => reply_err(&err),
    }
}

fn remove_callback(ctx: &ServerContext, args: &[Value]) -> Vec<Value> {
    let Some(id) = args[0].as_u64() else {
        return malformed();
    };
    match ctx.volmeters.remove_callback(id) {
        Ok(refs) => reply_ok(vec![Value::UInt32(refs)]),
        Err(err) => reply_err(&err),
    }
}
