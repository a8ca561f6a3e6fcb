//! MAX31855 cold-junction compensated thermocouple-to-digital converter.
//!
//! The MAX31855 has no registers and no input data line; pulling chip
//! select low starts a read-only transfer in which the chip presents a
//! fixed 32-bit conversion frame, MSB first, one bit per clock pulse.
//! This driver bit-bangs that transfer over three GPIO lines (SCK, CS,
//! MISO) so it works on any platform with `embedded-hal` digital pins,
//! no SPI peripheral required.
//!
//! The transfer is software-timed, so the whole 32-pulse sequence runs
//! inside a `critical_section` to keep the clock duty cycle from being
//! stretched by preemption mid-frame.

pub mod frame;

use crate::max31855::frame::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

// Half period of the bit-banged clock. 1 us per phase gives ~500 kHz,
// comfortably inside the chip's 5 MHz limit.
const CLOCK_HALF_PERIOD_US: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Setting or reading one of the GPIO lines failed. Fatal at this
    /// layer; the stored conversion word is left unchanged.
    Pin,
    /// No sensitivity coefficients are known for this thermocouple type
    /// letter.
    UnknownThermocoupleType(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStatus {
    pub fault: bool,       // Any fault condition active
    pub open_circuit: bool, // Thermocouple open circuit
    pub gnd_short: bool,   // Thermocouple shorted to GND
    pub vcc_short: bool,   // Thermocouple shorted to VCC
}

impl FaultStatus {
    pub fn from_word(word: u32) -> Self {
        Self {
            fault: (word & FAULT_BIT) != 0,
            open_circuit: (word & OPEN_CIRCUIT_BIT) != 0,
            gnd_short: (word & GND_SHORT_BIT) != 0,
            vcc_short: (word & VCC_SHORT_BIT) != 0,
        }
    }

    pub fn has_fault(&self) -> bool {
        self.fault || self.open_circuit || self.gnd_short || self.vcc_short
    }
}

/// Thermocouple types with known sensitivity coefficients.
///
/// The coefficients are baked into each variant of the chip, so the type
/// given to [`Max31855::voltage`] must match the MAX31855 variant actually
/// fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermocoupleType {
    K,
    J,
    N,
    S,
    T,
    E,
    R,
}

impl ThermocoupleType {
    /// Look up a thermocouple type by its letter code.
    pub fn from_letter(code: char) -> Result<Self, Error> {
        match code {
            'K' => Ok(Self::K),
            'J' => Ok(Self::J),
            'N' => Ok(Self::N),
            'S' => Ok(Self::S),
            'T' => Ok(Self::T),
            'E' => Ok(Self::E),
            'R' => Ok(Self::R),
            _ => Err(Error::UnknownThermocoupleType(code)),
        }
    }

    /// Seebeck-like sensitivity pair in V/degC: (probe, cold junction).
    pub fn sensitivities(self) -> (f32, f32) {
        match self {
            Self::K => (41.276e-6, 40.73e-6),
            Self::J => (57.953e-6, 40.73e-6),
            Self::N => (36.256e-6, 27.171e-6),
            Self::S => (9.587e-6, 6.181e-6),
            Self::T => (52.18e-6, 41.56e-6),
            Self::E => (76.373e-6, 44.123e-6),
            Self::R => (10.506e-6, 6.158e-6),
        }
    }
}

/// Bit-banged MAX31855 driver over three GPIO lines.
pub struct Max31855<SCK, CS, MISO, D> {
    sck: SCK,
    cs: CS,
    miso: MISO,
    delay: D,
    word: u32,
}

impl<SCK, CS, MISO, D> Max31855<SCK, CS, MISO, D>
where
    SCK: OutputPin,
    CS: OutputPin,
    MISO: InputPin,
    D: DelayNs,
{
    /// Create a driver from the three interface pins and a delay provider.
    ///
    /// Chip select is driven high (inactive) immediately; the stored
    /// conversion word starts at zero until [`new_conversion`] is called.
    ///
    /// [`new_conversion`]: Max31855::new_conversion
    pub fn new(sck: SCK, mut cs: CS, miso: MISO, delay: D) -> Result<Self, Error> {
        cs.set_high().map_err(|_| Error::Pin)?;
        Ok(Self {
            sck,
            cs,
            miso,
            delay,
            word: 0,
        })
    }

    /// Clock a full 32-bit frame out of the chip and store it.
    ///
    /// Runs inside a critical section: the clock is software-timed, and a
    /// suspension mid-transfer would stretch one clock phase arbitrarily.
    /// Both clock phases get the same half-period delay for a near-50%
    /// duty cycle.
    ///
    /// On a pin error the previous conversion word is left unchanged.
    pub fn new_conversion(&mut self) -> Result<(), Error> {
        let word = critical_section::with(|_| {
            // Enable chip select; the chip now drives MISO with bit 31.
            self.cs.set_low().map_err(|_| Error::Pin)?;

            let mut word: u32 = 0;
            for _ in 0..32 {
                self.sck.set_high().map_err(|_| Error::Pin)?;
                self.delay.delay_us(CLOCK_HALF_PERIOD_US);
                let bit = self.miso.is_high().map_err(|_| Error::Pin)?;
                self.sck.set_low().map_err(|_| Error::Pin)?;
                self.delay.delay_us(CLOCK_HALF_PERIOD_US);
                word = (word << 1) | bit as u32;
            }

            self.cs.set_high().map_err(|_| Error::Pin)?;
            Ok(word)
        })?;

        self.word = word;
        Ok(())
    }

    /// The raw conversion word from the last completed transfer.
    pub fn raw(&self) -> u32 {
        self.word
    }

    /// Linearized thermocouple temperature in degrees Celsius for the
    /// current conversion.
    pub fn probe_temp(&self) -> f32 {
        sign_extend(probe_temp_field(self.word), PROBE_TEMP_BITS) as f32 * PROBE_TEMP_C_PER_LSB
    }

    /// Cold-junction temperature in degrees Celsius for the current
    /// conversion.
    pub fn cold_junction_temp(&self) -> f32 {
        sign_extend(cj_temp_field(self.word), CJ_TEMP_BITS) as f32 * CJ_TEMP_C_PER_LSB
    }

    /// Fault flags reported by the chip in the current conversion.
    ///
    /// These are decoded data, not driver errors; a conversion with a
    /// fault flag set still decodes.
    pub fn faults(&self) -> FaultStatus {
        FaultStatus::from_word(self.word)
    }

    /// Estimated thermocouple output voltage in volts for the given type
    /// letter, from the current conversion.
    ///
    /// Vout = s_probe * Tprobe - (s_probe - s_cj) * Tcoldjunction
    pub fn voltage(&self, code: char) -> Result<f32, Error> {
        let (s_probe, s_cj) = ThermocoupleType::from_letter(code)?.sensitivities();
        Ok(s_probe * self.probe_temp() - (s_probe - s_cj) * self.cold_junction_temp())
    }
}
