//! Status LED blinking over `embedded-hal` pins.
//!
//! Board bring-up (clocks, register protection, pin muxing) stays with the
//! board support crate; this module only needs a configured output pin and a
//! blocking delay.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::StatefulOutputPin;

/// Default time between two toggles.
pub const BLINK_HALF_PERIOD_MS: u32 = 500;

/// Which pin level lights the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Polarity {
    /// LED lights when the pin is high.
    ActiveHigh,
    /// LED lights when the pin is low, as with an LED tied to the supply.
    ActiveLow,
}

/// An LED on an output pin.
#[derive(Debug)]
pub struct Led<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: StatefulOutputPin> Led<P> {
    /// Take control of `pin` and switch the LED off.
    pub fn new(pin: P, polarity: Polarity) -> Result<Self, P::Error> {
        let mut led = Self { pin, polarity };
        led.off()?;
        Ok(led)
    }

    /// Light the LED.
    pub fn on(&mut self) -> Result<(), P::Error> {
        match self.polarity {
            Polarity::ActiveHigh => self.pin.set_high(),
            Polarity::ActiveLow => self.pin.set_low(),
        }
    }

    /// Switch the LED off.
    pub fn off(&mut self) -> Result<(), P::Error> {
        match self.polarity {
            Polarity::ActiveHigh => self.pin.set_low(),
            Polarity::ActiveLow => self.pin.set_high(),
        }
    }

    /// Invert the LED.
    pub fn toggle(&mut self) -> Result<(), P::Error> {
        self.pin.toggle()
    }

    /// Whether the LED is lit, judging by the driven pin level.
    pub fn is_on(&mut self) -> Result<bool, P::Error> {
        let high = self.pin.is_set_high()?;
        Ok(high == (self.polarity == Polarity::ActiveHigh))
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

/// Blinks an [`Led`] with a busy-waiting delay.
#[derive(Debug)]
pub struct Blinker<P, D> {
    led: Led<P>,
    delay: D,
    half_period_ms: u32,
}

impl<P: StatefulOutputPin, D: DelayNs> Blinker<P, D> {
    /// Create a blinker toggling every `half_period_ms`.
    pub fn new(led: Led<P>, delay: D, half_period_ms: u32) -> Self {
        Self {
            led,
            delay,
            half_period_ms,
        }
    }

    /// Switch the LED off and hold it off for one full period.
    pub fn start(&mut self) -> Result<(), P::Error> {
        self.led.off()?;
        self.delay.delay_ms(self.half_period_ms);
        self.delay.delay_ms(self.half_period_ms);
        Ok(())
    }

    /// Wait half a period, toggle, and report whether the LED is now lit.
    pub fn step(&mut self) -> Result<bool, P::Error> {
        self.delay.delay_ms(self.half_period_ms);
        self.led.toggle()?;
        self.led.is_on()
    }

    /// Blink forever. Only returns if the pin fails.
    pub fn run(mut self) -> Result<Infallible, P::Error> {
        self.start()?;
        loop {
            self.step()?;
        }
    }

    /// Give the LED and the delay back.
    pub fn release(self) -> (Led<P>, D) {
        (self.led, self.delay)
    }
}
