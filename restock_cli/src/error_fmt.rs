//! Human-readable error descriptions and structured JSON error formatting.

use restock_core::error::{BuildError, MonitorError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingStore => {
                "What happened: No record store was provided to the monitor.\nLikely causes: The store was not wired into the builder.\nHow to fix: Pass a store via with_store(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the [sampling] section.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::NotRegistered => {
                "What happened: No product is registered.\nHow to fix: Put the product on the scale and run `restock register --name <NAME> --threshold <PCT>`.".to_string()
            }
            MonitorError::InvalidName => {
                "What happened: The product name is empty.\nHow to fix: Pass a non-blank --name.".to_string()
            }
            MonitorError::InvalidThreshold(p) => format!(
                "What happened: Threshold {p}% is out of range.\nHow to fix: Use a percentage between 0 and 100."
            ),
            MonitorError::NoWeight => {
                "What happened: The scale gave no usable weight.\nLikely causes: Scale unplugged, wrong serial port, or nothing on the scale.\nHow to fix: Check the [serial] section of the config and that the product is on the scale, then retry.".to_string()
            }
            MonitorError::Storage(detail) => format!(
                "What happened: Could not update the product record ({detail}).\nLikely causes: Missing permissions or a read-only filesystem.\nHow to fix: Check storage.record_path in the config."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.starts_with("read config") {
        return format!(
            "What happened: The config file could not be read.\nHow to fix: Check the --config path. Original: {msg}"
        );
    }

    if lower.contains("invalid configuration") || lower.contains("must be") {
        return format!(
            "What happened: Configuration is invalid.\nLikely causes: A malformed TOML value or an out-of-range setting.\nHow to fix: Edit the TOML config and try again. Original: {msg}"
        );
    }

    if lower.contains("sensor not detected") {
        return "What happened: No scale is connected.\nLikely causes: Cable unplugged or wrong serial.port in the config.\nHow to fix: Plug in the scale and check the port name.".to_string();
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per failure kind; anything unrecognized is 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::NotRegistered => 3,
            MonitorError::NoWeight => 4,
            MonitorError::InvalidName | MonitorError::InvalidThreshold(_) => 5,
            MonitorError::Storage(_) => 6,
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 5;
    }
    1
}

/// Stable machine name for the failure kind.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::NotRegistered => "NotRegistered",
            MonitorError::InvalidName => "InvalidName",
            MonitorError::InvalidThreshold(_) => "InvalidThreshold",
            MonitorError::NoWeight => "NoWeight",
            MonitorError::Storage(_) => "Storage",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "InvalidConfig";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "message": humanize(err),
        "exit_code": exit_code_for_error(err),
    })
    .to_string()
}
