//! Unit addressing.
//!
//! Every page header names the receivers that should accept it. An address
//! is a 24-bit value made of a service id, a zone, a county and a unit,
//! emitted as six nibbles with the fields crossing nibble boundaries.
//!
//! | field      | bits | range   |
//! |------------|------|---------|
//! | service id | 3    | 0..=7   |
//! | zone       | 10   | 0..=1023 |
//! | county     | 5    | 0..=31  |
//! | unit       | 6    | 0..=63  |
//!
//! Installed units are configured with a bank of DIP switches that encodes
//! the same zone, county and unit plus a timezone; see [`SwitchBank`].

use crate::consts::ADDRESS_LEN;
use crate::error::{Error, Result};

/// Largest service id.
pub const MAX_SERVICE_ID: u8 = 0x07;
/// Largest zone number.
pub const MAX_ZONE: u16 = 0x3ff;
/// Largest county number.
pub const MAX_COUNTY: u8 = 0x1f;
/// Largest unit number.
pub const MAX_UNIT: u8 = 0x3f;

/// Service id carried by every switch-configured unit.
const ADDRESSED_SERVICE_ID: u8 = 1;

/// Destination of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    service_id: u8,
    zone: u16,
    county: u8,
    unit: u8,
}

impl Address {
    /// Builds an address, rejecting fields wider than their bit allocation.
    pub fn new(service_id: u8, zone: u16, county: u8, unit: u8) -> Result<Self> {
        if service_id > MAX_SERVICE_ID {
            return Err(Error::InvalidInput("service id exceeds 3 bits"));
        }
        if zone > MAX_ZONE {
            return Err(Error::InvalidInput("zone exceeds 10 bits"));
        }
        if county > MAX_COUNTY {
            return Err(Error::InvalidInput("county exceeds 5 bits"));
        }
        if unit > MAX_UNIT {
            return Err(Error::InvalidInput("unit exceeds 6 bits"));
        }
        Ok(Self {
            service_id,
            zone,
            county,
            unit,
        })
    }

    /// Address accepted by every unit.
    pub const fn all_units() -> Self {
        Self {
            service_id: 1,
            zone: 0,
            county: 0,
            unit: 0,
        }
    }

    /// Address accepted by no unit.
    pub const fn no_units() -> Self {
        Self {
            service_id: 0,
            zone: 0,
            county: 0,
            unit: 0,
        }
    }

    /// Decodes the address from an 8-hex-character switch bank string.
    ///
    /// See [`SwitchBank::parse`].
    pub fn from_switches(switches: &str) -> Result<Self> {
        Ok(SwitchBank::parse(switches)?.address())
    }

    /// Service id (3 bits).
    pub fn service_id(&self) -> u8 {
        self.service_id
    }

    /// Zone (10 bits).
    pub fn zone(&self) -> u16 {
        self.zone
    }

    /// County (5 bits).
    pub fn county(&self) -> u8 {
        self.county
    }

    /// Unit (6 bits).
    pub fn unit(&self) -> u8 {
        self.unit
    }

    /// Packs the address into six nibbles, most significant first.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        let service = self.service_id;
        let zone = self.zone;
        let county = self.county;
        let unit = self.unit;
        [
            (service << 1) | (zone >> 9) as u8,
            ((zone >> 5) & 0x0f) as u8,
            ((zone >> 1) & 0x0f) as u8,
            (((zone & 0x01) as u8) << 3) | (county >> 2),
            ((county & 0x03) << 2) | (unit >> 4),
            unit & 0x0f,
        ]
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::all_units()
    }
}

/// Decoded DIP switch bank of an installed unit.
///
/// The eight hex characters form a big-endian 32-bit value:
///
/// | bits   | field    |
/// |--------|----------|
/// | 0..6   | unit     |
/// | 6..11  | county   |
/// | 11..21 | zone     |
/// | 24..28 | timezone |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchBank {
    raw: u32,
}

impl SwitchBank {
    /// Parses exactly eight hex characters (either case).
    pub fn parse(switches: &str) -> Result<Self> {
        let mut raw = [0u8; 4];
        if switches.len() != 8 {
            return Err(Error::InvalidInput("switch bank must be 8 hex characters"));
        }
        hex::decode_to_slice(switches, &mut raw)
            .map_err(|_| Error::InvalidInput("switch bank must be 8 hex characters"))?;
        Ok(Self {
            raw: u32::from_be_bytes(raw),
        })
    }

    /// Raw switch value.
    pub fn raw(&self) -> u32 {
        self.raw
    }

    /// Address selected by the switches.
    ///
    /// A bank with every switch off answers to every page.
    pub fn address(&self) -> Address {
        if self.raw == 0 {
            return Address::all_units();
        }
        Address {
            service_id: ADDRESSED_SERVICE_ID,
            zone: ((self.raw >> 11) & u32::from(MAX_ZONE)) as u16,
            county: ((self.raw >> 6) & u32::from(MAX_COUNTY)) as u8,
            unit: (self.raw & u32::from(MAX_UNIT)) as u8,
        }
    }

    /// Timezone nibble selected by the switches.
    pub fn timezone(&self) -> u8 {
        ((self.raw >> 24) & 0x0f) as u8
    }
}
