//! # Java Facade Calls
//!
//! Every native SDK object lives on the Kotlin side behind a small facade
//! with a single entry point:
//!
//! ```kotlin
//! fun invoke(method: String, argsJson: String): String
//! ```
//!
//! The reply is `{"ok": <value>}` or `{"error": "<message>"}`. A thrown
//! Java exception is cleared and reported as a JNI failure.

use std::sync::Arc;

use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};
use log::{error, trace};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use navsdk_shared::NativeError;

const INVOKE_SIGNATURE: &str = "(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;";

/// Errors that can occur crossing into Java
#[derive(Error, Debug)]
pub enum JniError {
    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),
    #[error("Java exception in {0}")]
    JavaException(String),
    #[error("malformed facade reply: {0}")]
    Reply(#[from] serde_json::Error),
    #[error("bridge not initialized")]
    NotInitialized,
    #[error("setup failed: {0}")]
    Setup(String),
}

impl From<JniError> for NativeError {
    fn from(e: JniError) -> Self {
        NativeError::Jni(e.to_string())
    }
}

/// Handle to one Kotlin facade object, usable from any thread
#[derive(Clone)]
pub struct JavaFacade {
    vm: Arc<JavaVM>,
    object: GlobalRef,
    name: &'static str,
}

impl JavaFacade {
    pub fn new(vm: Arc<JavaVM>, env: &mut JNIEnv, object: &JObject, name: &'static str) -> Result<Self, JniError> {
        let object = env.new_global_ref(object)?;
        Ok(Self { vm, object, name })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Call `method` and return the `ok` value
    pub fn call(&self, method: &str, args: Value) -> Result<Value, NativeError> {
        trace!("{}.{}({})", self.name, method, args);
        let reply = self.invoke(method, &args.to_string())?;
        parse_reply(&reply)
    }

    pub fn call_unit(&self, method: &str, args: Value) -> Result<(), NativeError> {
        self.call(method, args).map(|_| ())
    }

    /// Call `method` and deserialize the `ok` value
    pub fn call_as<T: DeserializeOwned>(&self, method: &str, args: Value) -> Result<T, NativeError> {
        let value = self.call(method, args)?;
        serde_json::from_value(value).map_err(|e| NativeError::from(JniError::Reply(e)))
    }

    fn invoke(&self, method: &str, args: &str) -> Result<String, JniError> {
        let mut env = self.vm.attach_current_thread()?;
        let jmethod = env.new_string(method)?;
        let jargs = env.new_string(args)?;

        let result = env.call_method(
            self.object.as_obj(),
            "invoke",
            INVOKE_SIGNATURE,
            &[JValue::Object(&jmethod), JValue::Object(&jargs)],
        );
        let reply = match result {
            Ok(value) => value.l()?,
            Err(jni::errors::Error::JavaException) => {
                // Leave no pending exception behind on this thread
                let _ = env.exception_describe();
                let _ = env.exception_clear();
                error!("{}.{} threw", self.name, method);
                return Err(JniError::JavaException(format!("{}.{}", self.name, method)));
            }
            Err(e) => return Err(e.into()),
        };

        if reply.is_null() {
            return Ok(String::new());
        }
        let reply = JString::from(reply);
        let text: String = env.get_string(&reply)?.into();
        Ok(text)
    }
}

/// Interpret a facade reply. An empty reply means success with no value.
pub fn parse_reply(reply: &str) -> Result<Value, NativeError> {
    if reply.trim().is_empty() {
        return Ok(Value::Null);
    }
    let mut value: Value = serde_json::from_str(reply).map_err(JniError::Reply)?;
    if let Some(message) = value.get("error") {
        let message = match message {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(NativeError::Rejected(message));
    }
    match value.get_mut("ok") {
        Some(ok) => Ok(ok.take()),
        None => Ok(Value::Null),
    }
}
