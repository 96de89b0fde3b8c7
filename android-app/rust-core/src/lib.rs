//! # Android JNI Navigation Bridge
//!
//! Native half of the navigation SDK bridge. It owns the shared
//! [`NavBridge`] and connects it to the Kotlin host:
//!
//! - Commands from the app layer arrive through `nativeDispatch`
//! - Native SDK callbacks arrive through `nativeOnCallback` (any thread)
//!   and are applied on the main thread by `nativePump`
//! - Native SDK calls go out through Kotlin facade objects
//!
//! ## JNI Bridge Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Android App (Kotlin)                       │
//! │                                                                 │
//! │  ┌─────────────────┐  ┌──────────────┐  ┌───────────────────┐  │
//! │  │ Map/Nav views   │  │ Navigator    │  │ App layer events  │  │
//! │  │ (facades)       │  │ (facades)    │  │ (sink facade)     │  │
//! │  └────────▲────────┘  └──────▲───────┘  └─────────▲─────────┘  │
//! │           │   invoke(method, json)                │             │
//! │  ┌────────┴──────────────────┴────────────────────┴─────────┐  │
//! │  │                   navsdk_jni (this lib)                   │  │
//! │  │                                                           │  │
//! │  │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────┐   │  │
//! │  │  │  NavBridge  │  │  Callback   │  │  Style loader   │   │  │
//! │  │  │  (shared)   │  │  queue      │  │  (tokio)        │   │  │
//! │  │  └─────────────┘  └─────────────┘  └─────────────────┘   │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## JNI Functions Exported
//!
//! All on `com.navsdk.bridge.NativeBridge`:
//!
//! - `nativeInit`: Initialize logging, the runtime and the bridge
//! - `nativeDispatch`: Run one command, returns a JSON reply
//! - `nativeOnCallback`: Queue a native SDK callback (JSON)
//! - `nativePump`: Apply queued callbacks on the main thread
//! - `nativeRegisterView` / `nativeUnregisterView`: Phone map views
//! - `nativeAttachAutoScreen` / `nativeDetachAutoScreen`: In-car screen
//! - `nativeHostResume` / `nativeHostPause`: Activity lifecycle
//! - `nativeAddNavigationReadyListener` / `nativeRemoveNavigationReadyListener`
//! - `nativeDestroy`: Release the navigator, views and runtime
//!
//! Facade and sink calls happen while the bridge is locked; Kotlin
//! implementations must not call back into `nativeDispatch` synchronously.

use std::sync::{Arc, Mutex, MutexGuard, Once};

use jni::objects::{JClass, JObject, JString};
use jni::sys::{jboolean, jint, jlong, jstring, JNI_FALSE, JNI_TRUE};
use jni::{JNIEnv, JavaVM};
use log::{debug, error, info, warn};
use tokio::runtime::Runtime;

use navsdk_shared::session::ObserverId;
use navsdk_shared::{codes, error_reply, BridgeConfig, CallbackSender, MapViewType, NavBridge};

pub mod facade;
pub mod navigator;
pub mod sink;
pub mod style;
pub mod surface;

use facade::{JavaFacade, JniError};
use navigator::JniNavigationApi;
use sink::{ready_observer, JniEventSink};
use style::HttpStyleLoader;
use surface::JniMapSurface;

// Initialize logging once
static INIT_LOGGER: Once = Once::new();

/// Everything owned by one initialized bridge
struct Core {
    bridge: NavBridge,
    vm: Arc<JavaVM>,
    /// Background runtime for style downloads; dropped with the bridge
    _runtime: Runtime,
}

static CORE: Mutex<Option<Core>> = Mutex::new(None);

/// Callback producer, kept outside `CORE` so SDK threads never wait on a
/// running command
static CALLBACKS: Mutex<Option<CallbackSender>> = Mutex::new(None);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run `f` on the live bridge, or return `default` when not initialized
fn with_core<T>(default: T, f: impl FnOnce(&mut Core) -> T) -> T {
    match lock(&CORE).as_mut() {
        Some(core) => f(core),
        None => {
            warn!("Bridge call before nativeInit");
            default
        }
    }
}

fn get_string(env: &mut JNIEnv, value: &JString) -> Result<String, JniError> {
    if value.is_null() {
        return Ok(String::new());
    }
    Ok(env.get_string(value)?.into())
}

fn new_string(env: &mut JNIEnv, value: &str) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            error!("Failed to create reply string: {:?}", e);
            std::ptr::null_mut()
        }
    }
}

fn build_core(
    env: &mut JNIEnv,
    config: BridgeConfig,
    api: &JObject,
    navigator: &JObject,
    sink: &JObject,
) -> Result<Core, JniError> {
    let vm = Arc::new(env.get_java_vm()?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("navsdk-style")
        .enable_all()
        .build()
        .map_err(|e| JniError::Setup(format!("runtime: {}", e)))?;

    let style_loader = HttpStyleLoader::new(runtime.handle().clone(), config.style_fetch_timeout())
        .map_err(|e| JniError::Setup(format!("http client: {}", e)))?;
    let api = JniNavigationApi::new(
        JavaFacade::new(vm.clone(), env, api, "NavigationApi")?,
        JavaFacade::new(vm.clone(), env, navigator, "Navigator")?,
    );

    let mut bridge = NavBridge::new(config, Box::new(api), Box::new(style_loader));
    bridge.attach_sink(Box::new(JniEventSink::new(JavaFacade::new(vm.clone(), env, sink, "EventSink")?)));

    Ok(Core {
        bridge,
        vm,
        _runtime: runtime,
    })
}

/// Initialize the native bridge
///
/// Called from Kotlin:
/// ```kotlin
/// external fun nativeInit(configJson: String, api: Any, navigator: Any, sink: Any): Boolean
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeInit(
    mut env: JNIEnv,
    _class: JClass,
    config_json: JString,
    api: JObject,
    navigator: JObject,
    sink: JObject,
) -> jboolean {
    let config = match get_string(&mut env, &config_json) {
        Ok(json) => BridgeConfig::from_json(&json),
        Err(e) => {
            error!("Failed to read config: {}", e);
            return JNI_FALSE;
        }
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            // Logging is not up yet; fall back to defaults and say so once it is
            let config = BridgeConfig::default();
            init_logger(&config);
            error!("Invalid bridge config, using defaults: {}", e);
            config
        }
    };
    init_logger(&config);

    let core = match build_core(&mut env, config, &api, &navigator, &sink) {
        Ok(core) => core,
        Err(e) => {
            error!("Failed to initialize bridge: {}", e);
            return JNI_FALSE;
        }
    };

    *lock(&CALLBACKS) = Some(core.bridge.callback_sender());
    if let Some(mut old) = lock(&CORE).replace(core) {
        warn!("nativeInit called twice, replacing the previous bridge");
        old.bridge.shutdown();
    }

    info!("Navigation bridge initialized");
    info!("Bridge version: {}", navsdk_shared::VERSION);
    JNI_TRUE
}

fn init_logger(config: &BridgeConfig) {
    let level = config.level_filter();
    let tag = config.log_tag.clone();
    INIT_LOGGER.call_once(move || {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(level)
                .with_tag(tag),
        );
    });
}

/// Run one command
///
/// Called from Kotlin:
/// ```kotlin
/// external fun nativeDispatch(viewId: Int, commandId: Int, argsJson: String): String
/// ```
///
/// Returns `{"result": ...}` or `{"error": {"code", "message"}}`
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeDispatch(
    mut env: JNIEnv,
    _class: JClass,
    view_id: jint,
    command_id: jint,
    args_json: JString,
) -> jstring {
    let reply = match get_string(&mut env, &args_json) {
        Ok(args) => with_core(
            error_reply(codes::NATIVE_ERROR_CODE, &JniError::NotInitialized.to_string()),
            |core| core.bridge.dispatch_json(view_id, command_id as i64, &args),
        ),
        Err(e) => error_reply(codes::INVALID_ARGUMENT_ERROR_CODE, &e.to_string()),
    };
    new_string(&mut env, &reply.to_string())
}

/// Queue a native SDK callback. Safe to call from any thread.
///
/// Called from Kotlin:
/// ```kotlin
/// external fun nativeOnCallback(callbackJson: String): Boolean
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeOnCallback(
    mut env: JNIEnv,
    _class: JClass,
    callback_json: JString,
) -> jboolean {
    let json = match get_string(&mut env, &callback_json) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to read callback: {}", e);
            return JNI_FALSE;
        }
    };
    let sender = match lock(&CALLBACKS).clone() {
        Some(sender) => sender,
        None => {
            debug!("Callback before nativeInit dropped");
            return JNI_FALSE;
        }
    };
    match sender.send_json(&json) {
        Ok(()) => JNI_TRUE,
        Err(e) => {
            warn!("Dropping callback: {}", e);
            JNI_FALSE
        }
    }
}

/// Apply queued callbacks. Must be called on the main thread.
///
/// Called from Kotlin:
/// ```kotlin
/// external fun nativePump(): Int
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativePump(_env: JNIEnv, _class: JClass) -> jint {
    with_core(0, |core| core.bridge.pump() as jint)
}

/// Called from Kotlin:
/// ```kotlin
/// external fun nativeRegisterView(viewId: Int, viewType: Int, surface: Any): Boolean
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeRegisterView(
    mut env: JNIEnv,
    _class: JClass,
    view_id: jint,
    view_type: jint,
    surface: JObject,
) -> jboolean {
    let kind = MapViewType::from_js_value(view_type as i64);
    with_core(JNI_FALSE, |core| {
        match JavaFacade::new(core.vm.clone(), &mut env, &surface, "MapView") {
            Ok(facade) => {
                core.bridge
                    .register_view(view_id, kind, Box::new(JniMapSurface::new(facade, kind)));
                JNI_TRUE
            }
            Err(e) => {
                error!("Failed to register view {}: {}", view_id, e);
                JNI_FALSE
            }
        }
    })
}

/// Called from Kotlin:
/// ```kotlin
/// external fun nativeUnregisterView(viewId: Int): Boolean
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeUnregisterView(
    _env: JNIEnv,
    _class: JClass,
    view_id: jint,
) -> jboolean {
    with_core(JNI_FALSE, |core| {
        if core.bridge.unregister_view(view_id) {
            JNI_TRUE
        } else {
            JNI_FALSE
        }
    })
}

/// The car screen surface is up
///
/// Called from Kotlin:
/// ```kotlin
/// external fun nativeAttachAutoScreen(surface: Any): Boolean
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeAttachAutoScreen(
    mut env: JNIEnv,
    _class: JClass,
    surface: JObject,
) -> jboolean {
    with_core(JNI_FALSE, |core| {
        match JavaFacade::new(core.vm.clone(), &mut env, &surface, "AutoScreen") {
            Ok(facade) => {
                core.bridge
                    .attach_auto_screen(Box::new(JniMapSurface::new(facade, MapViewType::Navigation)));
                JNI_TRUE
            }
            Err(e) => {
                error!("Failed to attach auto screen: {}", e);
                JNI_FALSE
            }
        }
    })
}

/// Called from Kotlin:
/// ```kotlin
/// external fun nativeDetachAutoScreen()
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeDetachAutoScreen(_env: JNIEnv, _class: JClass) {
    with_core((), |core| core.bridge.detach_auto_screen());
}

#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeHostResume(_env: JNIEnv, _class: JClass) {
    with_core((), |core| core.bridge.on_host_resume());
}

#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeHostPause(_env: JNIEnv, _class: JClass) {
    with_core((), |core| core.bridge.on_host_pause());
}

/// Subscribe to navigator readiness. Returns the subscription id, or -1.
///
/// Called from Kotlin:
/// ```kotlin
/// external fun nativeAddNavigationReadyListener(listener: Any): Long
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeAddNavigationReadyListener(
    mut env: JNIEnv,
    _class: JClass,
    listener: JObject,
) -> jlong {
    with_core(-1, |core| {
        match JavaFacade::new(core.vm.clone(), &mut env, &listener, "NavigationReadyListener") {
            Ok(facade) => core.bridge.add_ready_observer(ready_observer(facade)).as_raw() as jlong,
            Err(e) => {
                error!("Failed to add readiness listener: {}", e);
                -1
            }
        }
    })
}

/// Called from Kotlin:
/// ```kotlin
/// external fun nativeRemoveNavigationReadyListener(id: Long): Boolean
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeRemoveNavigationReadyListener(
    _env: JNIEnv,
    _class: JClass,
    id: jlong,
) -> jboolean {
    with_core(JNI_FALSE, |core| {
        if core.bridge.remove_ready_observer(ObserverId::from_raw(id as u64)) {
            JNI_TRUE
        } else {
            JNI_FALSE
        }
    })
}

/// Release the navigator, every view and the runtime
///
/// Called from Kotlin:
/// ```kotlin
/// external fun nativeDestroy()
/// ```
#[no_mangle]
pub extern "system" fn Java_com_navsdk_bridge_NativeBridge_nativeDestroy(_env: JNIEnv, _class: JClass) {
    *lock(&CALLBACKS) = None;
    let core = lock(&CORE).take();
    match core {
        Some(mut core) => {
            core.bridge.shutdown();
            info!("Navigation bridge destroyed");
        }
        None => debug!("nativeDestroy without a bridge"),
    }
}
