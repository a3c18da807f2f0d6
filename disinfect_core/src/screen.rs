//! Menu/screen identifiers of both display variants.
//!
//! Screens change only through `DeviceState::navigate` or as side effects of
//! starting a run, a tank fault, or the monitor. A screen never moves on by itself.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Screen {
    /// Entry screen; sitting here idle arms the auto-start.
    #[default]
    Start,
    MainMenu,
    Confirm14Days,
    Confirm21Days,
    CustomDaysInit,
    CustomDaysAdjust,
    CustomDaysConfirm,
    Running,
    Completed,
    ErrorTankLow,
    /// Touchscreen program list.
    ProgramList,
    /// Touchscreen settings page.
    Settings,
    /// Any identifier the device does not know. Kept verbatim.
    Unrecognized(String),
}

/// Entry in the main menu: label and the screen it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub next: Screen,
}

pub static MAIN_MENU_ITEMS: [MenuItem; 3] = [
    MenuItem {
        label: "14 day program",
        next: Screen::Confirm14Days,
    },
    MenuItem {
        label: "21 day program",
        next: Screen::Confirm21Days,
    },
    MenuItem {
        label: "Custom program",
        next: Screen::CustomDaysInit,
    },
];

impl Screen {
    /// Canonical identifier.
    pub fn id(&self) -> &str {
        match self {
            Screen::Start => "START_SCREEN",
            Screen::MainMenu => "MAIN_MENU",
            Screen::Confirm14Days => "SETUP_14_DAYS_CONFIRM",
            Screen::Confirm21Days => "SETUP_21_DAYS_CONFIRM",
            Screen::CustomDaysInit => "SETUP_NEW_DAYS_INIT",
            Screen::CustomDaysAdjust => "SETUP_NEW_DAYS_ADJUST",
            Screen::CustomDaysConfirm => "SETUP_CONFIRMATION",
            Screen::Running => "PROGRAM_RUNNING",
            Screen::Completed => "PROGRAM_COMPLETED",
            Screen::ErrorTankLow => "ERROR_TANK_LOW",
            Screen::ProgramList => "PROGRAM_LIST",
            Screen::Settings => "SETTINGS",
            Screen::Unrecognized(id) => id.as_str(),
        }
    }

    /// Parse an identifier. Accepts the canonical ids and the touchscreen
    /// names (`main`, `program`, `settings`, `running`, `completed`, `error`).
    /// Never fails: unknown ids become `Unrecognized`.
    pub fn parse(id: &str) -> Self {
        match id.trim() {
            "START_SCREEN" | "start" => Screen::Start,
            "MAIN_MENU" | "main" => Screen::MainMenu,
            "SETUP_14_DAYS_CONFIRM" => Screen::Confirm14Days,
            "SETUP_21_DAYS_CONFIRM" => Screen::Confirm21Days,
            "SETUP_NEW_DAYS_INIT" => Screen::CustomDaysInit,
            "SETUP_NEW_DAYS_ADJUST" => Screen::CustomDaysAdjust,
            "SETUP_CONFIRMATION" => Screen::CustomDaysConfirm,
            "PROGRAM_RUNNING" | "running" => Screen::Running,
            "PROGRAM_COMPLETED" | "completed" => Screen::Completed,
            "ERROR_TANK_LOW" | "error" => Screen::ErrorTankLow,
            "PROGRAM_LIST" | "program" => Screen::ProgramList,
            "SETTINGS" | "settings" => Screen::Settings,
            _ => Screen::Unrecognized(id.to_string()),
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, Screen::Start)
    }

    /// Screens with no timer-driven exit; left only by explicit navigation or reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Screen::Completed | Screen::ErrorTankLow)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Screen::Unrecognized(_))
    }

    /// Menu items offered on this screen (only the main menu has any).
    pub fn menu_items(&self) -> &'static [MenuItem] {
        match self {
            Screen::MainMenu => &MAIN_MENU_ITEMS,
            _ => &[],
        }
    }
}

impl From<String> for Screen {
    fn from(s: String) -> Self {
        Screen::parse(&s)
    }
}

impl From<&str> for Screen {
    fn from(s: &str) -> Self {
        Screen::parse(s)
    }
}

impl From<Screen> for String {
    fn from(s: Screen) -> Self {
        match s {
            Screen::Unrecognized(id) => id,
            other => other.id().to_string(),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
