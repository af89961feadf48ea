//! JNI bindings for the Android app.
//!
//! Each public function here corresponds to a `external fun` declaration
//! in RustBridge.kt. The function names follow JNI naming conventions:
//! Java_<package>_<class>_<method> with dots replaced by underscores.
//!
//! Structured data crosses the boundary as JSON strings. A navigator is
//! owned by the Kotlin side through an opaque `Long` handle; the mutex
//! behind it serializes calls arriving from different threads.

use std::sync::Mutex;

use jni::objects::{JClass, JString};
use jni::sys::{jboolean, jdouble, jint, jlong, jstring, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use log::{warn, LevelFilter};
use serde::Serialize;

use crate::describe::describe_route_json;
use crate::navigator::{Navigator, NavigatorConfig};
use crate::renderer::{CommandBuffer, Padding};
use crate::translations::TranslationSet;

struct Session {
    navigator: Navigator,
    renderer: CommandBuffer,
}

/// Returns the rust-core library version.
/// Maps to: RustBridge.version() -> String
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_version(
    env: JNIEnv,
    _class: JClass,
) -> jstring {
    to_jstring(&env, crate::VERSION)
}

/// Route `log` output to logcat. Safe to call more than once.
/// Maps to: RustBridge.initLogging()
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_initLogging(
    _env: JNIEnv,
    _class: JClass,
) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("wayfinder"),
    );
}

/// Maps to: RustBridge.describeRoute(route, translations, config) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_describeRoute(
    mut env: JNIEnv,
    _class: JClass,
    route: JString,
    translations: JString,
    config: JString,
) -> jstring {
    let (Some(route), Some(translations), Some(config)) = (
        read_string(&mut env, &route),
        read_string(&mut env, &translations),
        read_string(&mut env, &config),
    ) else {
        return std::ptr::null_mut();
    };

    match describe_route_json(&route, &translations, or_empty_object(&config)) {
        Ok(json) => to_jstring(&env, &json),
        Err(err) => {
            warn!("describeRoute: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Maps to: RustBridge.createNavigator(config) -> Long (0 on failure)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_createNavigator(
    mut env: JNIEnv,
    _class: JClass,
    config: JString,
) -> jlong {
    let Some(config) = read_string(&mut env, &config) else {
        return 0;
    };
    let config = match NavigatorConfig::from_json(or_empty_object(&config)) {
        Ok(config) => config,
        Err(err) => {
            warn!("createNavigator: {err}");
            return 0;
        }
    };

    let session = Box::new(Mutex::new(Session {
        navigator: Navigator::new(config),
        renderer: CommandBuffer::default(),
    }));
    Box::into_raw(session) as jlong
}

/// Maps to: RustBridge.destroyNavigator(handle)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_destroyNavigator(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if handle != 0 {
        // SAFETY: the handle came from createNavigator and the Kotlin side
        // drops it after this call.
        drop(unsafe { Box::from_raw(handle as *mut Mutex<Session>) });
    }
}

/// Maps to: RustBridge.loadRoute(handle, route, top, right, bottom, left) -> Boolean
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_loadRoute(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    route: JString,
    top: jdouble,
    right: jdouble,
    bottom: jdouble,
    left: jdouble,
) -> jboolean {
    let Some(route) = read_string(&mut env, &route) else {
        return JNI_FALSE;
    };
    let padding = Padding {
        top,
        right,
        bottom,
        left,
    };

    let loaded = with_session(handle, |s| s.navigator.load_route_json(&route, padding));
    match loaded {
        Some(Ok(())) => JNI_TRUE,
        Some(Err(err)) => {
            warn!("loadRoute: {err}");
            JNI_FALSE
        }
        None => JNI_FALSE,
    }
}

/// Maps to: RustBridge.clearRoute(handle)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_clearRoute(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    with_session(handle, |s| s.navigator.clear_route());
}

/// Maps to: RustBridge.setTranslations(handle, translations) -> Boolean
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_setTranslations(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    translations: JString,
) -> jboolean {
    let Some(json) = read_string(&mut env, &translations) else {
        return JNI_FALSE;
    };
    let translations = match TranslationSet::from_json(&json) {
        Ok(t) => t,
        Err(err) => {
            warn!("setTranslations: {err}");
            return JNI_FALSE;
        }
    };

    to_jboolean(with_session(handle, |s| s.navigator.set_translations(translations)).is_some())
}

/// Maps to: RustBridge.next(handle) -> Boolean
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_next(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jboolean {
    to_jboolean(with_session(handle, |s| s.navigator.next()).unwrap_or(false))
}

/// Maps to: RustBridge.previous(handle) -> Boolean
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_previous(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jboolean {
    to_jboolean(with_session(handle, |s| s.navigator.previous()).unwrap_or(false))
}

/// Maps to: RustBridge.setActiveStep(handle, leg, step) -> Boolean
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_setActiveStep(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    leg: jint,
    step: jint,
) -> jboolean {
    let (Some(leg), Some(step)) = (index(leg), index(step)) else {
        return JNI_FALSE;
    };
    match with_session(handle, |s| s.navigator.set_active_step(leg, step)) {
        Some(Ok(moved)) => to_jboolean(moved),
        Some(Err(err)) => {
            warn!("setActiveStep: {err}");
            JNI_FALSE
        }
        None => JNI_FALSE,
    }
}

/// Maps to: RustBridge.clickStep(handle, leg, step, maneuver) -> Boolean
///
/// A negative maneuver means the step itself was clicked.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_clickStep(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    leg: jint,
    step: jint,
    maneuver: jint,
) -> jboolean {
    let (Some(leg), Some(step)) = (index(leg), index(step)) else {
        return JNI_FALSE;
    };
    let maneuver = index(maneuver);

    match with_session(handle, |s| s.navigator.click_step(leg, step, maneuver)) {
        Some(Ok(())) => JNI_TRUE,
        Some(Err(err)) => {
            warn!("clickStep: {err}");
            JNI_FALSE
        }
        None => JNI_FALSE,
    }
}

/// Maps to: RustBridge.toggleSubsteps(handle, leg, step) -> Boolean (new open state)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_toggleSubsteps(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
    leg: jint,
    step: jint,
) -> jboolean {
    let (Some(leg), Some(step)) = (index(leg), index(step)) else {
        return JNI_FALSE;
    };
    match with_session(handle, |s| s.navigator.toggle_substeps(leg, step)) {
        Some(Ok(open)) => to_jboolean(open),
        Some(Err(err)) => {
            warn!("toggleSubsteps: {err}");
            JNI_FALSE
        }
        None => JNI_FALSE,
    }
}

/// Maps to: RustBridge.openSubsteps(handle)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_openSubsteps(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if let Some(Err(err)) = with_session(handle, |s| s.navigator.open_substeps()) {
        warn!("openSubsteps: {err}");
    }
}

/// Maps to: RustBridge.closeSubsteps(handle)
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_closeSubsteps(
    _env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    if let Some(Err(err)) = with_session(handle, |s| s.navigator.close_substeps()) {
        warn!("closeSubsteps: {err}");
    }
}

/// Maps to: RustBridge.descriptors(handle) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_descriptors(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    json_result(&env, with_session(handle, |s| s.navigator.descriptors()))
}

/// Maps to: RustBridge.activeHeading(handle) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_activeHeading(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    let heading = with_session(handle, |s| s.navigator.active_heading()).flatten();
    json_result(&env, heading)
}

/// Maps to: RustBridge.state(handle) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_state(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    json_result(&env, with_session(handle, |s| s.navigator.state()))
}

/// Maps to: RustBridge.totals(handle) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_totals(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    json_result(&env, with_session(handle, |s| s.navigator.totals()))
}

/// Hand queued renderer commands to the map view.
/// Maps to: RustBridge.drainRendererCommands(handle) -> String?
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_wayfinder_app_RustBridge_drainRendererCommands(
    env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jstring {
    let commands = with_session(handle, |s| {
        s.navigator.sync_renderer(&mut s.renderer);
        s.renderer.take()
    });
    json_result(&env, commands)
}

fn with_session<T>(handle: jlong, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
    if handle == 0 {
        warn!("navigator handle is null");
        return None;
    }
    // SAFETY: non-zero handles come from createNavigator and stay valid
    // until destroyNavigator.
    let session = unsafe { &*(handle as *const Mutex<Session>) };
    match session.lock() {
        Ok(mut guard) => Some(f(&mut guard)),
        Err(_) => {
            warn!("navigator lock poisoned");
            None
        }
    }
}

fn index(value: jint) -> Option<usize> {
    usize::try_from(value).ok()
}

fn or_empty_object(json: &str) -> &str {
    if json.trim().is_empty() {
        "{}"
    } else {
        json
    }
}

fn to_jboolean(value: bool) -> jboolean {
    if value {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

fn read_string(env: &mut JNIEnv, value: &JString) -> Option<String> {
    match env.get_string(value) {
        Ok(s) => Some(s.into()),
        Err(err) => {
            warn!("failed to read Java string: {err}");
            None
        }
    }
}

fn to_jstring(env: &JNIEnv, value: &str) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(err) => {
            warn!("failed to create Java string: {err}");
            std::ptr::null_mut()
        }
    }
}

fn json_result<T: Serialize>(env: &JNIEnv, value: Option<T>) -> jstring {
    let Some(value) = value else {
        return std::ptr::null_mut();
    };
    match serde_json::to_string(&value) {
        Ok(json) => to_jstring(env, &json),
        Err(err) => {
            warn!("JSON serialize error: {err}");
            std::ptr::null_mut()
        }
    }
}
