//! Console dashboard
//!
//! Renders a [`TelemetryView`] as a compact text block: status banner,
//! readings with alert flags, vehicle outputs and the latest alerts.

use drivesafe_core::TelemetryView;
use std::fmt::Write;
use std::io::{self, Write as IoWrite};

fn flag(alert: bool) -> &'static str {
    if alert {
        "!"
    } else {
        " "
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

/// Render the dashboard, showing at most `alert_rows` alerts
pub fn render(view: &TelemetryView, alert_rows: usize) -> String {
    let s = &view.snapshot;
    let indicators = s.indicators();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "[{}] {:<12} link: {}  frames: {}",
        s.timestamp.format("%H:%M:%S"),
        s.status.label(),
        if view.connected { "up" } else { "down" },
        view.updates
    );
    let _ = writeln!(
        out,
        "  alcohol{} {:>4} / 1023   distance{} {:>3} cm",
        flag(s.alcohol_alert()),
        s.alcohol,
        flag(s.distance_alert()),
        s.distance
    );
    let _ = writeln!(
        out,
        "  ir{} {:<7}  tilt{} {:<6}  motor {:>3} PWM  safety {:>3}%",
        flag(s.ir_obstacle),
        if s.ir_obstacle { "BLOCKED" } else { "CLEAR" },
        flag(s.tilt),
        if s.tilt { "TILTED" } else { "STABLE" },
        s.motor_speed,
        s.safety_score()
    );
    let _ = writeln!(
        out,
        "  outputs: red {}  green {}  buzzer {}",
        on_off(indicators.red_led),
        on_off(indicators.green_led),
        on_off(indicators.buzzer)
    );

    if view.alerts.is_empty() {
        let _ = writeln!(out, "  no alerts yet");
    } else {
        let _ = writeln!(out, "  alerts ({}):", view.alerts.len());
        for alert in view.alerts.iter().take(alert_rows) {
            let _ = writeln!(out, "    {}  {}", alert.time, alert.message);
        }
    }

    out
}

/// Prints the dashboard to stdout
pub struct ConsolePresenter {
    alert_rows: usize,
}

impl ConsolePresenter {
    pub fn new(alert_rows: usize) -> Self {
        Self { alert_rows }
    }

    pub fn present(&self, view: &TelemetryView) {
        let text = render(view, self.alert_rows);
        let mut stdout = io::stdout().lock();
        // A closed stdout is not worth stopping telemetry for
        let _ = writeln!(stdout, "{}", text);
        let _ = stdout.flush();
    }
}
