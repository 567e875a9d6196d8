// Formatting + console helpers shared across components.

/// Runtime ticks (100ns units, legacy media-server convention) to whole minutes.
pub fn format_runtime_ticks(ticks: Option<u64>) -> String {
    let Some(ticks) = ticks else {
        return String::new();
    };
    if ticks == 0 {
        return String::new();
    }
    let minutes = (ticks as f64 / 10_000_000.0 / 60.0).round() as u64;
    format!("{} min", minutes)
}

/// Seconds to a MM:SS clock for the seek badge readout.
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let m = total / 60;
    let s = total % 60;
    format!("{:02}:{:02}", m, s)
}

pub fn clog(msg: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_round_to_whole_minutes() {
        // 90 seconds of ticks rounds up to 2 minutes
        assert_eq!(format_runtime_ticks(Some(900_000_000)), "2 min");
        // 120 seconds exactly
        assert_eq!(format_runtime_ticks(Some(1_200_000_000)), "2 min");
        assert_eq!(format_runtime_ticks(Some(0)), "");
        assert_eq!(format_runtime_ticks(None), "");
    }

    #[test]
    fn clock_clamps_negative_to_zero() {
        assert_eq!(format_clock(-3.0), "00:00");
        assert_eq!(format_clock(65.4), "01:05");
        assert_eq!(format_clock(600.0), "10:00");
    }
}
