#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Text rendering of the device screens.
//!
//! Each screen maps to one render function through `RENDERERS`; screens
//! without an entry (including unrecognized identifiers) get a generic
//! fallback view instead of an error.

use disinfect_core::{DeviceSnapshot, RunStatus, Screen};
use serde::Serialize;

/// A front-panel button and the action it would send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub action: &'static str,
}

impl Button {
    fn new(label: impl Into<String>, action: &'static str) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// What the display shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenView {
    pub screen: String,
    pub title: String,
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_bar: Option<String>,
    pub buttons: Vec<Button>,
}

impl ScreenView {
    fn new(s: &DeviceSnapshot, title: &str) -> Self {
        Self {
            screen: s.menu_state.id().to_string(),
            title: title.to_string(),
            lines: Vec::new(),
            progress_bar: None,
            buttons: Vec::new(),
        }
    }

    fn line(mut self, l: impl Into<String>) -> Self {
        self.lines.push(l.into());
        self
    }

    fn button(mut self, label: impl Into<String>, action: &'static str) -> Self {
        self.buttons.push(Button::new(label, action));
        self
    }

    /// Plain-text form, one line per row.
    pub fn to_text(&self) -> String {
        let mut out = format!("== {} ==\n", self.title);
        for l in &self.lines {
            out.push_str(l);
            out.push('\n');
        }
        if let Some(bar) = &self.progress_bar {
            out.push_str(bar);
            out.push('\n');
        }
        if !self.buttons.is_empty() {
            let labels: Vec<String> = self.buttons.iter().map(|b| format!("[{}]", b.label)).collect();
            out.push_str(&labels.join(" "));
            out.push('\n');
        }
        out
    }
}

type RenderFn = fn(&DeviceSnapshot) -> ScreenView;

/// Dispatch table from recognized screen to its renderer.
static RENDERERS: [(Screen, RenderFn); 12] = [
    (Screen::Start, render_start),
    (Screen::MainMenu, render_main_menu),
    (Screen::Confirm14Days, render_confirm_14),
    (Screen::Confirm21Days, render_confirm_21),
    (Screen::CustomDaysInit, render_custom_days),
    (Screen::CustomDaysAdjust, render_custom_days),
    (Screen::CustomDaysConfirm, render_custom_confirm),
    (Screen::Running, render_running),
    (Screen::Completed, render_completed),
    (Screen::ErrorTankLow, render_error),
    (Screen::ProgramList, render_program_list),
    (Screen::Settings, render_settings),
];

/// Render the current screen of `snapshot`.
pub fn render(snapshot: &DeviceSnapshot) -> ScreenView {
    RENDERERS
        .iter()
        .find(|(screen, _)| *screen == snapshot.menu_state)
        .map_or_else(|| render_unrecognized(snapshot), |(_, f)| f(snapshot))
}

/// `[#####-----] 50%`. Percent above 100 is drawn as full.
pub fn render_progress_bar(percent: u8, width: usize) -> String {
    let pct = usize::from(percent.min(100));
    let filled = pct * width / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percent.min(100)
    )
}

const BAR_WIDTH: usize = 20;

fn tank_line(s: &DeviceSnapshot) -> String {
    format!("Tank: {}", if s.tank_level_ok { "OK" } else { "LOW" })
}

fn render_start(s: &DeviceSnapshot) -> ScreenView {
    ScreenView::new(s, "Disinfection unit")
        .line(format!("Selected: {}", s.program_name))
        .line(format!("Status: {}", s.run_status))
        .line(tank_line(s))
        .button("Menu", "navigate")
        .button("Start", "start_program")
}

fn render_main_menu(s: &DeviceSnapshot) -> ScreenView {
    let mut v = ScreenView::new(s, "Main menu");
    for item in s.menu_state.menu_items() {
        v = v.line(format!("-> {}", item.label));
    }
    v.button("Back", "navigate").button("Select", "navigate")
}

fn confirm(s: &DeviceSnapshot, days: u32) -> ScreenView {
    ScreenView::new(s, &format!("{days} day program"))
        .line(format!("Start the {days} day program?"))
        .button("+ Start", "start_program")
        .button("- Cancel", "navigate")
}

fn render_confirm_14(s: &DeviceSnapshot) -> ScreenView {
    confirm(s, 14)
}

fn render_confirm_21(s: &DeviceSnapshot) -> ScreenView {
    confirm(s, 21)
}

fn render_custom_days(s: &DeviceSnapshot) -> ScreenView {
    ScreenView::new(s, "Custom program")
        .line("Days:")
        .line(format!("< {} >", s.custom_days))
        .button("+", "set_custom_days")
        .button("-", "set_custom_days")
        .button("OK", "navigate")
}

fn render_custom_confirm(s: &DeviceSnapshot) -> ScreenView {
    ScreenView::new(s, "Custom program")
        .line(format!("Start {} day program?", s.custom_days))
        .button("+ Start", "start_program")
        .button("- Cancel", "navigate")
}

fn render_running(s: &DeviceSnapshot) -> ScreenView {
    let mut v = ScreenView::new(s, "Program active")
        .line(s.program_name.clone())
        .line(format!("Remaining: {}", s.remaining_time))
        .line(tank_line(s))
        .button("Stop", "stop_program");
    if s.run_status == RunStatus::Running {
        v.progress_bar = Some(render_progress_bar(s.progress_percent, BAR_WIDTH));
    }
    v
}

fn render_completed(s: &DeviceSnapshot) -> ScreenView {
    ScreenView::new(s, "Program completed")
        .line(s.program_name.clone())
        .line("Disinfection completed successfully.")
        .button("OK", "reset")
}

fn render_error(s: &DeviceSnapshot) -> ScreenView {
    ScreenView::new(s, "Error")
        .line("Tank level too low!")
        .line("Refill the tank and restart.")
        .line(tank_line(s))
        .button("OK", "reset")
}

fn render_program_list(s: &DeviceSnapshot) -> ScreenView {
    ScreenView::new(s, "Programs")
        .line(format!("Selected: {}", s.program_name))
        .line(format!("Custom days: {}", s.custom_days))
        .button("Select", "select_program")
        .button("Start", "start_program")
        .button("Back", "navigate")
}

fn render_settings(s: &DeviceSnapshot) -> ScreenView {
    ScreenView::new(s, "Settings")
        .line(format!("Brightness: {}%", s.brightness))
        .line(tank_line(s))
        .button("Brightness", "set_brightness")
        .button("Back", "navigate")
}

fn render_unrecognized(s: &DeviceSnapshot) -> ScreenView {
    ScreenView::new(s, "Unrecognized state")
        .line(format!("Screen '{}' is not implemented", s.menu_state))
        .button("Main menu", "navigate")
}
