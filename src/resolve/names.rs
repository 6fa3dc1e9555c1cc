//! Kernel input vocabulary
//!
//! Event type names are a fixed table. Code names come from the evdev
//! crate's constant types, whose `Debug` output is the kernel name
//! (`KEY_A`, `REL_X`, ...); they are collected once per process.

use evdev::{
    AbsoluteAxisType, Key, LedType, MiscType, RelativeAxisType, SoundType, SwitchType,
    Synchronization,
};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_REL: u16 = 0x02;
pub const EV_ABS: u16 = 0x03;
pub const EV_MSC: u16 = 0x04;
pub const EV_SW: u16 = 0x05;
pub const EV_LED: u16 = 0x11;
pub const EV_SND: u16 = 0x12;
pub const EV_REP: u16 = 0x14;
pub const EV_FF: u16 = 0x15;
pub const EV_PWR: u16 = 0x16;
pub const EV_FF_STATUS: u16 = 0x17;
pub const EV_MAX: u16 = 0x1f;

pub const SYN_REPORT: u16 = 0x00;

const EVENT_TYPES: &[(&str, u16)] = &[
    ("EV_SYN", EV_SYN),
    ("EV_KEY", EV_KEY),
    ("EV_REL", EV_REL),
    ("EV_ABS", EV_ABS),
    ("EV_MSC", EV_MSC),
    ("EV_SW", EV_SW),
    ("EV_LED", EV_LED),
    ("EV_SND", EV_SND),
    ("EV_REP", EV_REP),
    ("EV_FF", EV_FF),
    ("EV_PWR", EV_PWR),
    ("EV_FF_STATUS", EV_FF_STATUS),
];

// Not modelled as constant types by evdev
const REPEAT_CODES: &[(&str, u16)] = &[("REP_DELAY", 0x00), ("REP_PERIOD", 0x01)];

// Kernel alias defines; evdev prints only one name per code
const KEY_ALIASES: &[(&str, u16)] = &[
    ("KEY_MIN_INTERESTING", 113),
    ("KEY_HANGUEL", 122),
    ("KEY_SCREENLOCK", 152),
    ("KEY_DIRECTION", 153),
    ("KEY_BRIGHTNESS_ZERO", 244),
    ("KEY_WIMAX", 246),
    ("BTN_MISC", 0x100),
    ("BTN_MOUSE", 0x110),
    ("BTN_JOYSTICK", 0x120),
    ("BTN_GAMEPAD", 0x130),
    ("BTN_SOUTH", 0x130),
    ("BTN_A", 0x130),
    ("BTN_EAST", 0x131),
    ("BTN_B", 0x131),
    ("BTN_NORTH", 0x133),
    ("BTN_X", 0x133),
    ("BTN_WEST", 0x134),
    ("BTN_Y", 0x134),
    ("BTN_DIGI", 0x140),
    ("BTN_WHEEL", 0x150),
    ("BTN_TRIGGER_HAPPY", 0x2c0),
];

const SW_ALIASES: &[(&str, u16)] = &[("SW_RADIO", 0x03)];

const FF_CODES: &[(&str, u16)] = &[
    ("FF_RUMBLE", 0x50),
    ("FF_PERIODIC", 0x51),
    ("FF_CONSTANT", 0x52),
    ("FF_SPRING", 0x53),
    ("FF_FRICTION", 0x54),
    ("FF_DAMPER", 0x55),
    ("FF_INERTIA", 0x56),
    ("FF_RAMP", 0x57),
    ("FF_SQUARE", 0x58),
    ("FF_TRIANGLE", 0x59),
    ("FF_SINE", 0x5a),
    ("FF_SAW_UP", 0x5b),
    ("FF_SAW_DOWN", 0x5c),
    ("FF_CUSTOM", 0x5d),
    ("FF_GAIN", 0x60),
    ("FF_AUTOCENTER", 0x61),
];

const FF_STATUS_CODES: &[(&str, u16)] = &[("FF_STATUS_STOPPED", 0x00), ("FF_STATUS_PLAYING", 0x01)];

/// Highest valid code for an event type, `None` if the type carries no codes.
pub fn max_code(event_type: u16) -> Option<u16> {
    match event_type {
        EV_SYN => Some(0x0f),
        EV_KEY => Some(0x2ff),
        EV_REL => Some(0x0f),
        EV_ABS => Some(0x3f),
        EV_MSC => Some(0x07),
        EV_SW => Some(0x10),
        EV_LED => Some(0x0f),
        EV_SND => Some(0x07),
        EV_REP => Some(0x01),
        EV_FF => Some(0x7f),
        EV_FF_STATUS => Some(0x01),
        _ => None,
    }
}

pub fn type_from_name(name: &str) -> Option<u16> {
    EVENT_TYPES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

pub fn code_from_name(event_type: u16, name: &str) -> Option<u16> {
    code_tables().get(&event_type)?.get(name).copied()
}

fn code_tables() -> &'static HashMap<u16, HashMap<String, u16>> {
    static TABLES: OnceLock<HashMap<u16, HashMap<String, u16>>> = OnceLock::new();
    TABLES.get_or_init(build_code_tables)
}

fn build_code_tables() -> HashMap<u16, HashMap<String, u16>> {
    let mut tables = HashMap::new();
    tables.insert(EV_SYN, named_codes(EV_SYN, "SYN_", |c| format!("{:?}", Synchronization(c))));
    tables.insert(EV_KEY, {
        let mut keys = named_codes(EV_KEY, "KEY_", |c| format!("{:?}", Key::new(c)));
        keys.extend(named_codes(EV_KEY, "BTN_", |c| format!("{:?}", Key::new(c))));
        keys.extend(static_codes(KEY_ALIASES));
        keys
    });
    tables.insert(EV_REL, named_codes(EV_REL, "REL_", |c| format!("{:?}", RelativeAxisType(c))));
    tables.insert(EV_ABS, named_codes(EV_ABS, "ABS_", |c| format!("{:?}", AbsoluteAxisType(c))));
    tables.insert(EV_MSC, named_codes(EV_MSC, "MSC_", |c| format!("{:?}", MiscType(c))));
    tables.insert(EV_SW, {
        let mut switches = named_codes(EV_SW, "SW_", |c| format!("{:?}", SwitchType(c)));
        switches.extend(static_codes(SW_ALIASES));
        switches
    });
    tables.insert(EV_LED, named_codes(EV_LED, "LED_", |c| format!("{:?}", LedType(c))));
    tables.insert(EV_SND, named_codes(EV_SND, "SND_", |c| format!("{:?}", SoundType(c))));
    tables.insert(EV_REP, static_codes(REPEAT_CODES));
    tables.insert(EV_FF, static_codes(FF_CODES));
    tables.insert(EV_FF_STATUS, static_codes(FF_STATUS_CODES));
    tables
}

/// Collect every code of a type whose evdev name carries the kernel prefix.
fn named_codes(
    event_type: u16,
    prefix: &str,
    name_of: impl Fn(u16) -> String,
) -> HashMap<String, u16> {
    let max = max_code(event_type).unwrap_or(0);
    (0..=max)
        .map(|code| (name_of(code), code))
        .filter(|(name, _)| name.starts_with(prefix))
        .collect()
}

fn static_codes(table: &[(&str, u16)]) -> HashMap<String, u16> {
    table.iter().map(|(n, c)| (n.to_string(), *c)).collect()
}
