use engine::api::{preview_teams, simulate_many, simulate_tournament, RunConfig};
use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use serde::Serialize;
use serde_json::json;

const VERSION: &str = concat!("tourney-ffi ", env!("CARGO_PKG_VERSION"));

fn ok(value: impl Serialize) -> String {
    match serde_json::to_value(value) {
        Ok(result) => json!({ "ok": true, "result": result }).to_string(),
        Err(e) => err(format!("serialize: {}", e)),
    }
}

fn err(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

fn parse_config(input: &str) -> Result<RunConfig, String> {
    serde_json::from_str(input).map_err(|e| err(format!("invalid_config: {}", e)))
}

/// Run one tournament from a JSON `RunConfig`; returns an `{ok, result|error}` envelope.
pub fn simulate_tournament_json(input: &str) -> String {
    let cfg = match parse_config(input) {
        Ok(c) => c,
        Err(envelope) => return envelope,
    };
    match simulate_tournament(cfg) {
        Ok(report) => ok(report),
        Err(e) => err(format!("{:#}", e)),
    }
}

pub fn preview_teams_json(input: &str) -> String {
    let cfg = match parse_config(input) {
        Ok(c) => c,
        Err(envelope) => return envelope,
    };
    match preview_teams(cfg) {
        Ok(preview) => ok(preview),
        Err(e) => err(format!("{:#}", e)),
    }
}

/// Like `simulate_tournament_json`, with an extra `samples` field (default 100).
pub fn simulate_many_json(input: &str) -> String {
    let mut root: serde_json::Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => return err(format!("invalid_config: {}", e)),
    };
    let samples = match root.get("samples") {
        None => 100,
        Some(v) => match v.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => n,
            None => return err(format!("invalid_config: samples must fit in u32, got {}", v)),
        },
    };
    if let Some(obj) = root.as_object_mut() {
        obj.remove("samples");
    }
    let cfg: RunConfig = match serde_json::from_value(root) {
        Ok(c) => c,
        Err(e) => return err(format!("invalid_config: {}", e)),
    };
    match simulate_many(cfg, samples) {
        Ok(stats) => ok(stats),
        Err(e) => err(format!("{:#}", e)),
    }
}

fn to_java(env: &JNIEnv, s: String) -> jstring {
    env.new_string(s)
        .map(|js| js.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

fn call_json(mut env: JNIEnv, json: JString, f: fn(&str) -> String) -> jstring {
    let out = match env.get_string(&json) {
        Ok(s) => f(&String::from(s)),
        Err(e) => err(e),
    };
    to_java(&env, out)
}

#[no_mangle]
pub extern "system" fn Java_com_tourney_Ffi_version(env: JNIEnv, _class: JClass) -> jstring {
    to_java(&env, VERSION.to_string())
}

#[no_mangle]
pub extern "system" fn Java_com_tourney_Ffi_simulateTournamentJson(
    env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    call_json(env, json, simulate_tournament_json)
}

#[no_mangle]
pub extern "system" fn Java_com_tourney_Ffi_simulateManyJson(
    env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    call_json(env, json, simulate_many_json)
}

#[no_mangle]
pub extern "system" fn Java_com_tourney_Ffi_previewTeamsJson(
    env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    call_json(env, json, preview_teams_json)
}
