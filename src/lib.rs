#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod max31855;

pub use max31855::{Error, FaultStatus, Max31855, ThermocoupleType};

/// Log active fault flags for a sensor
#[cfg(feature = "defmt")]
pub fn log_faults(sensor_num: u8, faults: &FaultStatus) {
    if faults.open_circuit {
        defmt::warn!("Sensor {} - Open circuit fault", sensor_num);
    }
    if faults.gnd_short {
        defmt::warn!("Sensor {} - Short to GND fault", sensor_num);
    }
    if faults.vcc_short {
        defmt::warn!("Sensor {} - Short to VCC fault", sensor_num);
    }
    if faults.fault {
        defmt::warn!("Sensor {} - Fault condition active", sensor_num);
    }
}
