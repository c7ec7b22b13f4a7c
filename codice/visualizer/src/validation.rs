use super::config::FlowConfig;

const MAX_TRANSITION_MS: u64 = 10_000;

pub fn validate_config(config: &FlowConfig) -> Result<(), String> {
    // Validate window
    let window = &config.window;
    if !(window.width.is_finite() && window.width > 0.0)
        || !(window.height.is_finite() && window.height > 0.0)
    {
        return Err(format!(
            "Window size must be positive, got {}x{}",
            window.width, window.height
        ));
    }

    // Validate layout
    let layout = &config.layout;
    if layout.max_thread_slots == 0 {
        return Err("max_thread_slots must be at least 1".to_string());
    }
    if layout.thread_slots > layout.max_thread_slots {
        return Err(format!(
            "thread_slots ({}) exceeds max_thread_slots ({})",
            layout.thread_slots, layout.max_thread_slots
        ));
    }

    // Validate timing
    let timing = &config.timing;
    if !(timing.marker_size.is_finite() && timing.marker_size > 0.0) {
        return Err(format!("Invalid marker size: {}", timing.marker_size));
    }
    for (name, delay) in timing.delays() {
        if delay == 0 {
            return Err(format!("{name} must be greater than zero"));
        }
    }
    if timing.relay_transition_ms > MAX_TRANSITION_MS {
        return Err(format!(
            "relay_transition_ms ({}) is longer than {MAX_TRANSITION_MS} ms",
            timing.relay_transition_ms
        ));
    }

    Ok(())
}
