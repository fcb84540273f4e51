use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Password and e-mail pair used to log into the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The gateway password, by default the last five characters of its serial.
    pub password: String,
    pub email: String,
}

impl Credentials {
    pub fn new(password: impl Into<String>, email: impl Into<String>) -> Self {
        Self { password: password.into(), email: email.into() }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(crate::DEFAULT_PASSWORD, crate::DEFAULT_EMAIL)
    }
}

/// Total energy storage capacity, in watt-hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity(pub f64);

impl Capacity {
    pub fn watt_hours(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A single meter as reported by `/api/meters/aggregates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meter {
    pub last_communication_time: Option<DateTime<FixedOffset>>,
    pub instant_power: f64,
    pub instant_reactive_power: f64,
    pub instant_apparent_power: f64,
    pub frequency: f64,
    pub energy_exported: f64,
    pub energy_imported: f64,
    pub instant_average_voltage: f64,
    pub instant_total_current: f64,
}

impl Meter {
    /// Positive when the meter imports power, negative when it exports.
    pub fn is_importing(&self) -> bool {
        self.instant_power > 0.0
    }
}

/// All meters reported by the gateway, keyed by meter name.
///
/// Gateways report `site`, `battery`, `load` and `solar`; some firmwares add
/// more (`busway`, `frequency`, `generator`), which are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetersAggregates(pub BTreeMap<String, Meter>);

impl MetersAggregates {
    pub const SITE: &'static str = "site";
    pub const BATTERY: &'static str = "battery";
    pub const LOAD: &'static str = "load";
    pub const SOLAR: &'static str = "solar";

    pub fn get(&self, name: &str) -> Option<&Meter> {
        self.0.get(name)
    }

    pub fn site(&self) -> Option<&Meter> {
        self.get(Self::SITE)
    }

    pub fn battery(&self) -> Option<&Meter> {
        self.get(Self::BATTERY)
    }

    pub fn load(&self) -> Option<&Meter> {
        self.get(Self::LOAD)
    }

    pub fn solar(&self) -> Option<&Meter> {
        self.get(Self::SOLAR)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MetersAggregates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, meter)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={} W", meter.instant_power)?;
        }
        Ok(())
    }
}
