//! The microcontroller I/O bridge.
//!
//! A fixed table of fourteen analog-style pins, each wired to a voltage
//! cell owned by some sensor or actuator in the scene. Control logic
//! written against the pin abstraction (read input pins, compute, write
//! output pins) runs identically against this bridge and against real
//! hardware; the simulation side keeps the same cells current from its
//! end every fixed step.
//!
//! The bridge holds wiring only, never the scalars themselves. Direction
//! mistakes (an output-typed line wired into an input slot or vice versa)
//! are caught when the wiring is assembled, not at runtime.

use tracing::{debug, warn};

use crate::body::Body;
use crate::error::Error;
use crate::scene::{Controller, StepContext};
use crate::voltage::{LineDirection, VoltageLine};

/// Number of pins on the bridge.
pub const PIN_COUNT: usize = 14;

/// Analog pin labels, bank A and bank B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pin {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    B0,
    B1,
    B2,
    B3,
    B4,
    B5,
}

impl Pin {
    /// All pins in table order.
    pub const ALL: [Pin; PIN_COUNT] = [
        Pin::A0,
        Pin::A1,
        Pin::A2,
        Pin::A3,
        Pin::A4,
        Pin::A5,
        Pin::A6,
        Pin::A7,
        Pin::B0,
        Pin::B1,
        Pin::B2,
        Pin::B3,
        Pin::B4,
        Pin::B5,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Pin::A0 => "A0",
            Pin::A1 => "A1",
            Pin::A2 => "A2",
            Pin::A3 => "A3",
            Pin::A4 => "A4",
            Pin::A5 => "A5",
            Pin::A6 => "A6",
            Pin::A7 => "A7",
            Pin::B0 => "B0",
            Pin::B1 => "B1",
            Pin::B2 => "B2",
            Pin::B3 => "B3",
            Pin::B4 => "B4",
            Pin::B5 => "B5",
        }
    }
}

/// The pin view a control program runs against.
pub struct Pins<'a> {
    slots: &'a [Option<VoltageLine>; PIN_COUNT],
}

impl Pins<'_> {
    /// Voltage on a pin. Unwired pins float at 0.0.
    pub fn read(&self, pin: Pin) -> f32 {
        self.slots[pin.index()]
            .as_ref()
            .map_or(0.0, |line| line.cell.get())
    }

    /// Drives an output pin. Writes to input or unwired pins are dropped.
    pub fn write(&mut self, pin: Pin, volts: f32) {
        match &self.slots[pin.index()] {
            Some(line) if line.direction == LineDirection::Output => line.cell.set(volts),
            Some(_) => warn!(pin = pin.name(), "control program wrote to an input pin"),
            None => warn!(pin = pin.name(), "control program wrote to an unwired pin"),
        }
    }
}

/// One tick of externally-written control logic.
///
/// Implemented for closures, so simple programs can be written inline:
///
/// ```
/// use sumosim::{ControlProgram, Pin, Pins};
///
/// let mut program = |pins: &mut Pins<'_>| {
///     let range = pins.read(Pin::A6);
///     pins.write(Pin::A0, if range < 0.2 { 0.0 } else { 4.0 });
/// };
/// let _: &mut dyn ControlProgram = &mut program;
/// ```
pub trait ControlProgram {
    fn tick(&mut self, pins: &mut Pins<'_>);
}

impl<F: FnMut(&mut Pins<'_>)> ControlProgram for F {
    fn tick(&mut self, pins: &mut Pins<'_>) {
        self(pins)
    }
}

/// The bridge: wiring table plus the control program it feeds.
///
/// Mounts as a scene object's controller. The program runs on its own
/// cadence: by default once per fixed step, or at a fixed control period
/// accumulated across steps when one is configured.
pub struct Microcontroller {
    slots: [Option<VoltageLine>; PIN_COUNT],
    program: Box<dyn ControlProgram>,
    tick_period: Option<f32>,
    accumulator: f32,
    started: bool,
}

impl Microcontroller {
    /// A bridge with no wiring running `program`.
    pub fn new(program: impl ControlProgram + 'static) -> Self {
        Self {
            slots: [const { None }; PIN_COUNT],
            program: Box::new(program),
            tick_period: None,
            accumulator: 0.0,
            started: false,
        }
    }

    /// Runs the program every `seconds` of simulated time instead of once
    /// per fixed step.
    pub fn with_tick_period(mut self, seconds: f32) -> Self {
        self.tick_period = Some(seconds);
        self
    }

    /// Wires `line` into `pin`, declared as `direction`.
    ///
    /// Fails if the pin is taken or if the declared direction does not
    /// match the line's intrinsic one: a sensor line cannot drive an
    /// output slot and a motor line cannot feed an input slot.
    pub fn wire(
        &mut self,
        pin: Pin,
        direction: LineDirection,
        line: VoltageLine,
    ) -> Result<(), Error> {
        if line.direction != direction {
            return Err(Error::DirectionMismatch {
                expected: direction,
                actual: line.direction,
            });
        }
        let slot = &mut self.slots[pin.index()];
        if slot.is_some() {
            return Err(Error::PinOccupied(pin.name()));
        }
        debug!(pin = pin.name(), ?direction, "wired voltage line");
        *slot = Some(line);
        Ok(())
    }

    /// Starts ticking the program. Until this is called the bridge is
    /// wired but inert.
    pub fn start(&mut self) {
        self.started = true;
    }

    /// Runs the program once against the current wiring.
    fn run_tick(&mut self) {
        let mut pins = Pins { slots: &self.slots };
        self.program.tick(&mut pins);
    }
}

impl Controller for Microcontroller {
    fn on_fixed_update(&mut self, ctx: &mut StepContext<'_>, _body: Option<&Body>) {
        if !self.started {
            return;
        }
        match self.tick_period {
            None => self.run_tick(),
            Some(period) => {
                self.accumulator += ctx.step_seconds;
                while self.accumulator >= period {
                    self.run_tick();
                    self.accumulator -= period;
                }
            }
        }
    }
}
