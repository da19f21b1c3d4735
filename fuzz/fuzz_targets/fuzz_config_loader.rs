#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validate errors are fine; panics are not.
    if let Ok(cfg) = restock_config::load_toml(data) {
        if cfg.validate().is_ok() {
            let sampling = restock_core::MonitorCfg::from(&cfg);
            assert!(sampling.stable.samples >= 1);
        }
    }
});
