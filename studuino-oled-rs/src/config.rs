//! Construction parameters for the display driver.

/// Default 7-bit I2C address of the controller.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// How many bytes of each page [`Ssd1307::synchronize`] sends.
///
/// [`Ssd1307::synchronize`]: crate::Ssd1307::synchronize
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageWrite {
    /// Send all `width` bytes of every page.
    #[default]
    Full,
    /// Send `width - 1` bytes per page, leaving the last column of every
    /// page untouched on the device. Matches existing captures of the
    /// MicroPython driver byte for byte.
    Legacy,
}

/// Configuration for the display driver.
///
/// Everything the driver needs is passed here explicitly; there is no
/// process-wide state, so several displays can coexist.
///
/// [`DisplayConfig::default()`] describes a 128×32 panel at `0x3C` with
/// the internal charge pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Width in pixels (1–128). Default: 128.
    pub width: u32,
    /// Height in pixels, a multiple of 8 up to 64. Default: 32.
    pub height: u32,
    /// 7-bit I2C address. Default: `0x3C`.
    ///
    /// Only [`Ssd1307::new_i2c`] reads this. A transport passed to
    /// [`Ssd1307::new`] already carries its own address.
    ///
    /// [`Ssd1307::new_i2c`]: crate::Ssd1307::new_i2c
    /// [`Ssd1307::new`]: crate::Ssd1307::new
    pub address: u8,
    /// Panel runs from an external VCC supply. Kept as device state only;
    /// it does not change the command sequence. Default: `false`.
    pub external_vcc: bool,
    /// Page write span used by `synchronize()`. Default: [`PageWrite::Full`].
    pub page_write: PageWrite,
    /// Refresh rate for the shared-display task in Hz. Default: 30.
    pub refresh_hz: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 32,
            address: DEFAULT_ADDRESS,
            external_vcc: false,
            page_write: PageWrite::Full,
            refresh_hz: 30,
        }
    }
}

impl DisplayConfig {
    /// Default configuration with a custom panel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Convert the refresh rate to a timer period in milliseconds.
    ///
    /// Formula: `1000 / refresh_hz`. A rate of 0 is treated as 1 Hz.
    pub fn refresh_period_ms(&self) -> u64 {
        1000 / u64::from(self.refresh_hz.max(1))
    }
}
