//! Device models for mesh analysis.
//!
//! This module provides the closed set of supported two-terminal devices:
//! - Passive: Resistor, Capacitor (open at DC), Wire
//! - Sources: DC and AC voltage sources
//! - Nonlinear: Diode (two-state piecewise model)
//! - Instruments: Ammeter
//!
//! Each device reports its series resistance and its EMF along the
//! canonical terminal-1 → terminal-2 direction; the mesh solver signs both
//! by the loop's traversal direction.

mod diode;

pub use diode::{DiodeParams, DiodeState};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Device kind tag as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Resistor,
    DcSource,
    AcSource,
    Diode,
    Capacitor,
    Ammeter,
    Wire,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::Resistor => "resistor",
            DeviceKind::DcSource => "dc_source",
            DeviceKind::AcSource => "ac_source",
            DeviceKind::Diode => "diode",
            DeviceKind::Capacitor => "capacitor",
            DeviceKind::Ammeter => "ammeter",
            DeviceKind::Wire => "wire",
        };
        f.write_str(name)
    }
}

/// Flat `{kind, value}` form used for (de)serialization of [`Element`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ElementDef {
    kind: DeviceKind,
    #[serde(default)]
    value: f64,
}

/// A two-terminal circuit device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementDef", into = "ElementDef")]
pub enum Element {
    /// Resistance in ohms
    Resistor(f64),
    /// DC EMF in volts, driving current terminal-1 → terminal-2
    DcSource(f64),
    /// AC source; its value is used as a DC-equivalent EMF
    AcSource(f64),
    /// Diode, anode at terminal-1
    Diode,
    /// Capacitance in farads (open circuit at DC)
    Capacitor(f64),
    /// Near-ideal current meter
    Ammeter,
    /// Bare zero-resistance wire component
    Wire,
}

impl From<ElementDef> for Element {
    fn from(def: ElementDef) -> Self {
        Element::from_parts(def.kind, def.value)
    }
}

impl From<Element> for ElementDef {
    fn from(element: Element) -> Self {
        Self {
            kind: element.kind(),
            value: element.value(),
        }
    }
}

/// Parameters of the simplified device models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceParams {
    /// Series resistance of an ammeter (ohms)
    pub ammeter_resistance: f64,
    /// Diode two-state model
    pub diode: DiodeParams,
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            ammeter_resistance: 1e-3,
            diode: DiodeParams::default(),
        }
    }
}

impl Element {
    /// Build an element from its kind tag and scalar value.
    ///
    /// The value is dropped for devices that do not carry one.
    pub fn from_parts(kind: DeviceKind, value: f64) -> Self {
        match kind {
            DeviceKind::Resistor => Element::Resistor(value),
            DeviceKind::DcSource => Element::DcSource(value),
            DeviceKind::AcSource => Element::AcSource(value),
            DeviceKind::Diode => Element::Diode,
            DeviceKind::Capacitor => Element::Capacitor(value),
            DeviceKind::Ammeter => Element::Ammeter,
            DeviceKind::Wire => Element::Wire,
        }
    }

    /// Get the device kind tag.
    pub fn kind(&self) -> DeviceKind {
        match self {
            Element::Resistor(_) => DeviceKind::Resistor,
            Element::DcSource(_) => DeviceKind::DcSource,
            Element::AcSource(_) => DeviceKind::AcSource,
            Element::Diode => DeviceKind::Diode,
            Element::Capacitor(_) => DeviceKind::Capacitor,
            Element::Ammeter => DeviceKind::Ammeter,
            Element::Wire => DeviceKind::Wire,
        }
    }

    /// Get the scalar value (0 for devices without one).
    pub fn value(&self) -> f64 {
        match self {
            Element::Resistor(v)
            | Element::DcSource(v)
            | Element::AcSource(v)
            | Element::Capacitor(v) => *v,
            Element::Diode | Element::Ammeter | Element::Wire => 0.0,
        }
    }

    pub fn is_diode(&self) -> bool {
        matches!(self, Element::Diode)
    }

    /// Series resistance seen by a loop current through this device.
    ///
    /// `diode` is the current state of this device if it is a diode and is
    /// ignored otherwise.
    pub fn resistance(&self, params: &DeviceParams, diode: DiodeState) -> f64 {
        match self {
            Element::Resistor(r) => *r,
            Element::DcSource(_) | Element::AcSource(_) => 0.0,
            Element::Diode => params.diode.resistance(diode),
            Element::Capacitor(_) => params.diode.off_resistance,
            Element::Ammeter => params.ammeter_resistance,
            Element::Wire => 0.0,
        }
    }

    /// EMF along terminal-1 → terminal-2.
    ///
    /// A conducting diode contributes its barrier as a negative EMF.
    pub fn emf(&self, params: &DeviceParams, diode: DiodeState) -> f64 {
        match self {
            Element::DcSource(v) | Element::AcSource(v) => *v,
            Element::Diode => -params.diode.barrier(diode),
            Element::Resistor(_) | Element::Capacitor(_) | Element::Ammeter | Element::Wire => 0.0,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Resistor(r) => write!(f, "resistor {} Ω", r),
            Element::DcSource(v) => write!(f, "dc_source {} V", v),
            Element::AcSource(v) => write!(f, "ac_source {} V", v),
            Element::Capacitor(c) => write!(f, "capacitor {} F", c),
            Element::Diode | Element::Ammeter | Element::Wire => write!(f, "{}", self.kind()),
        }
    }
}
