use std::ptr;

use serde::Serialize;
use serde_json::json;

use crate::{primes, PrimeError, GREETING, VERSION};

/// A JSON message handed to the host.
///
/// The host reads `len` UTF-8 bytes at `ptr` and passes the message back to
/// [`cprimes_release`] once it is done with it.
#[repr(C)]
#[derive(Debug)]
pub struct Message {
    pub ptr: *const u8,
    pub len: usize,
}

fn into_message<T: Serialize>(value: &T) -> Result<*mut Message, PrimeError> {
    let bytes = serde_json::to_vec(value)?.into_boxed_slice();
    let len = bytes.len();
    let ptr = Box::into_raw(bytes) as *const u8;
    Ok(Box::into_raw(Box::new(Message { ptr, len })))
}

fn or_null(result: Result<*mut Message, PrimeError>) -> *mut Message {
    result.unwrap_or_else(|err| {
        tracing::warn!("Returning null message: {}", err);
        ptr::null_mut()
    })
}

/// The first `target` primes as a JSON array, or null if they cannot be
/// allocated.
#[no_mangle]
pub extern "C" fn cprimes_get_primes(target: u32) -> *mut Message {
    or_null(primes::generate(target as usize).and_then(|primes| into_message(&primes)))
}

/// `{"version": ..., "string": ...}`
#[no_mangle]
pub extern "C" fn cprimes_version() -> *mut Message {
    or_null(into_message(&json!({
        "version": VERSION,
        "string": GREETING,
    })))
}

/// Frees a message returned by this library.
///
/// # Safety
///
/// `message` must be null or a pointer obtained from one of the functions
/// above that has not been released yet.
#[no_mangle]
pub unsafe extern "C" fn cprimes_release(message: *mut Message) {
    if message.is_null() {
        return;
    }
    let message = unsafe { Box::from_raw(message) };
    let bytes = ptr::slice_from_raw_parts_mut(message.ptr as *mut u8, message.len);
    drop(unsafe { Box::from_raw(bytes) });
}
