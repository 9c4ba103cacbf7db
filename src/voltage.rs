//! Shared analog-voltage wiring between the simulation and control logic.
//!
//! A sensor owns the cell it measures into and a motor owns the cell it is
//! driven from; everything else (the microcontroller bridge, keyboard
//! controllers, tests) holds cheap clones of the same cell. Cells are
//! reference-counted single-threaded mutable scalars: both the simulation
//! and the control logic touch them, but always synchronously inside the
//! same tick, never concurrently.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A shared mutable voltage scalar.
///
/// Clones alias the same underlying value.
#[derive(Clone, Default)]
pub struct VoltageCell(Rc<Cell<f32>>);

impl VoltageCell {
    /// A new cell holding `volts`.
    pub fn new(volts: f32) -> Self {
        Self(Rc::new(Cell::new(volts)))
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    /// Overwrites the value.
    #[inline]
    pub fn set(&self, volts: f32) {
        self.0.set(volts);
    }

    /// Whether `other` aliases the same underlying scalar.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for VoltageCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VoltageCell").field(&self.get()).finish()
    }
}

/// Direction of a voltage line, from the control logic's point of view.
///
/// A sensor produces an `Input` line (the controller reads it); a motor
/// command is an `Output` line (the controller writes it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineDirection {
    Input,
    Output,
}

/// A named-slot wiring handle: a direction plus the shared scalar.
///
/// The line does not own the scalar; the sensor or actuator that produced
/// it does. Cloning a line clones the wiring, not the value.
#[derive(Clone, Debug)]
pub struct VoltageLine {
    /// Intrinsic direction of the underlying scalar.
    pub direction: LineDirection,
    /// The shared scalar itself.
    pub cell: VoltageCell,
}

impl VoltageLine {
    /// An input line (sensor reading) over `cell`.
    pub fn input(cell: VoltageCell) -> Self {
        Self {
            direction: LineDirection::Input,
            cell,
        }
    }

    /// An output line (actuator command) over `cell`.
    pub fn output(cell: VoltageCell) -> Self {
        Self {
            direction: LineDirection::Output,
            cell,
        }
    }
}
