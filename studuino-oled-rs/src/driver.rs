//! SSD1307 controller driver.
//!
//! [`Ssd1307`] owns the frame buffer and a [`BusTransport`]. Construction
//! validates the geometry and runs the power-up sequence; afterwards the
//! caller draws into [`Ssd1307::surface_mut`] and pushes the result to the
//! panel with [`Ssd1307::synchronize`].

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_hal::i2c::I2c;

use crate::command::{
    POWER_UP_SEQUENCE, SET_COM_OUT_DIR, SET_CONTRAST, SET_DISP, SET_NORM_INV,
    SET_PAGE_HIGH_COL_ADDR, SET_PAGE_LOW_COL_ADDR, SET_PAGE_SADDR, SET_SEG_REMAP,
};
use crate::config::{DisplayConfig, PageWrite};
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::transport::{BusTransport, I2cTransport};

/// Panel power state as last commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Panel is lit and follows display RAM.
    On,
    /// Panel is in sleep mode. RAM contents are kept.
    Off,
}

/// Driver for an SSD1307 monochrome OLED panel.
///
/// # Lifecycle
///
/// 1. [`Ssd1307::new()`] / [`Ssd1307::new_i2c()`] validates geometry, sends
///    the power-up sequence, clears the panel and switches it on.
/// 2. Draw into the frame buffer via [`Ssd1307::surface_mut()`].
/// 3. [`Ssd1307::synchronize()`] transfers the whole frame buffer.
///
/// Methods take `&mut self`; share a display between tasks by wrapping it
/// in a mutex (see the `task` feature).
///
/// # Example
///
/// ```no_run
/// use studuino_oled_rs::{AxisLine, DisplayConfig, RectStyle, Ssd1307};
///
/// # fn example(i2c: impl embedded_hal::i2c::I2c) {
/// let mut oled = Ssd1307::new_i2c(i2c, DisplayConfig::new(128, 32)).unwrap();
/// oled.surface_mut().draw_rect(10, 10, 20, 5, RectStyle::Outline);
/// oled.surface_mut().draw_line(AxisLine::Horizontal { x: 0, y: 31, length: 128 });
/// oled.synchronize().unwrap();
/// # }
/// ```
pub struct Ssd1307<DI> {
    transport: DI,
    surface: Framebuffer,
    config: DisplayConfig,
    power: PowerState,
}

impl<I2C> Ssd1307<I2cTransport<I2C>>
where
    I2C: I2c,
{
    /// Construct and initialise a display on an I2C bus at `config.address`.
    ///
    /// # Errors
    ///
    /// See [`Ssd1307::new()`].
    pub fn new_i2c(i2c: I2C, config: DisplayConfig) -> Result<Self, Error<I2C::Error>> {
        Self::new(I2cTransport::new(i2c, config.address), config)
    }
}

impl<DI> Ssd1307<DI>
where
    DI: BusTransport,
{
    /// Construct and initialise a display.
    ///
    /// Sends the power-up sequence, clears the panel and turns it on.
    ///
    /// The bus address is owned by `transport`; `config.address` is only
    /// used by [`Ssd1307::new_i2c()`] and is not checked here.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidGeometry`] if the size is unsupported; no bus traffic
    ///   is generated in that case.
    /// * [`Error::Transport`] on the first failed bus write. The partially
    ///   initialised display is dropped.
    pub fn new(transport: DI, config: DisplayConfig) -> Result<Self, Error<DI::Error>> {
        let surface = Framebuffer::new(config.width, config.height).map_err(Error::geometry)?;

        let mut display = Self {
            transport,
            surface,
            config,
            power: PowerState::Off,
        };
        display.init()?;
        Ok(display)
    }

    fn init(&mut self) -> Result<(), Error<DI::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "OLED init: {}x{} external_vcc={}",
            self.config.width,
            self.config.height,
            self.config.external_vcc
        );

        for step in POWER_UP_SEQUENCE {
            self.transport.write_command(step.byte(self.config.height))?;
        }

        self.clear()?;
        self.power_on()?;

        #[cfg(feature = "defmt")]
        defmt::info!("OLED initialised");

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Power and presentation
    // -----------------------------------------------------------------------

    /// Put the panel to sleep (`0xAE`). The buffer and display RAM are kept.
    pub fn power_off(&mut self) -> Result<(), Error<DI::Error>> {
        self.transport.write_command(SET_DISP)?;
        self.power = PowerState::Off;

        #[cfg(feature = "defmt")]
        defmt::debug!("OLED power off");
        Ok(())
    }

    /// Wake the panel (`0xAF`).
    pub fn power_on(&mut self) -> Result<(), Error<DI::Error>> {
        self.transport.write_command(SET_DISP | 0x01)?;
        self.power = PowerState::On;

        #[cfg(feature = "defmt")]
        defmt::debug!("OLED power on");
        Ok(())
    }

    /// Set the contrast register. Every value is passed through as is.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error<DI::Error>> {
        self.transport.write_command(SET_CONTRAST)?;
        self.transport.write_command(contrast)?;
        Ok(())
    }

    /// Switch between normal and inverted pixels.
    pub fn set_invert(&mut self, invert: bool) -> Result<(), Error<DI::Error>> {
        self.transport.write_command(SET_NORM_INV | u8::from(invert))?;
        Ok(())
    }

    /// Mirror the panel in both axes (rotate by 180°).
    ///
    /// Only the scan direction changes; the buffer layout does not.
    pub fn set_rotation(&mut self, rotate: bool) -> Result<(), Error<DI::Error>> {
        let rotate = u8::from(rotate);
        self.transport.write_command(SET_COM_OUT_DIR | (rotate << 3))?;
        self.transport.write_command(SET_SEG_REMAP | (1 - rotate))?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Frame transfer
    // -----------------------------------------------------------------------

    /// Transfer the whole frame buffer to the panel.
    ///
    /// For every page: page start address `0xB0 | page`, column start low
    /// `0x00` and high `0x10`, then one data write. The span of each data
    /// write follows [`DisplayConfig::page_write`].
    pub fn synchronize(&mut self) -> Result<(), Error<DI::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("OLED synchronize: {} pages", self.surface.page_count());

        for (page, bytes) in self.surface.pages().enumerate() {
            self.transport.write_command(SET_PAGE_SADDR | page as u8)?;
            self.transport.write_command(SET_PAGE_LOW_COL_ADDR)?;
            self.transport.write_command(SET_PAGE_HIGH_COL_ADDR)?;

            let span = match self.config.page_write {
                PageWrite::Full => bytes,
                PageWrite::Legacy => &bytes[..bytes.len() - 1],
            };
            self.transport.write_data(span)?;
        }
        Ok(())
    }

    /// Blank the frame buffer and transfer it.
    ///
    /// Shorthand for `surface_mut().fill(BinaryColor::Off)` followed by
    /// [`synchronize()`](Self::synchronize).
    pub fn clear(&mut self) -> Result<(), Error<DI::Error>> {
        self.surface.fill(BinaryColor::Off);
        self.synchronize()
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The frame buffer.
    pub fn surface(&self) -> &Framebuffer {
        &self.surface
    }

    /// The frame buffer, for drawing. No bus traffic until
    /// [`synchronize()`](Self::synchronize).
    pub fn surface_mut(&mut self) -> &mut Framebuffer {
        &mut self.surface
    }

    /// Configuration the display was built with.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Last commanded power state.
    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// Consume the driver and give back the transport.
    pub fn release(self) -> DI {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::{AxisLine, RectStyle};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Write {
        Command(u8),
        Data(Vec<u8>),
    }

    /// Records every write. Fails the write with index `fail_at`, if set.
    #[derive(Default)]
    struct Recorder {
        writes: Vec<Write>,
        fail_at: Option<usize>,
    }

    #[derive(Debug, PartialEq, Eq)]
    struct BusFault;

    impl Recorder {
        fn failing_at(index: usize) -> Self {
            Self {
                fail_at: Some(index),
                ..Self::default()
            }
        }

        fn push(&mut self, write: Write) -> Result<(), BusFault> {
            if self.fail_at == Some(self.writes.len()) {
                return Err(BusFault);
            }
            self.writes.push(write);
            Ok(())
        }
    }

    impl BusTransport for Recorder {
        type Error = BusFault;

        fn write_command(&mut self, command: u8) -> Result<(), BusFault> {
            self.push(Write::Command(command))
        }

        fn write_data(&mut self, data: &[u8]) -> Result<(), BusFault> {
            self.push(Write::Data(data.to_vec()))
        }
    }

    fn commands(bytes: &[u8]) -> Vec<Write> {
        bytes.iter().map(|&b| Write::Command(b)).collect()
    }

    fn expected_sync(fb: &Framebuffer, page_write: PageWrite) -> Vec<Write> {
        let mut writes = Vec::new();
        for (page, bytes) in fb.pages().enumerate() {
            writes.extend(commands(&[0xB0 | page as u8, 0x00, 0x10]));
            let span = match page_write {
                PageWrite::Full => bytes,
                PageWrite::Legacy => &bytes[..bytes.len() - 1],
            };
            writes.push(Write::Data(span.to_vec()));
        }
        writes
    }

    /// Build a 128×32 display and forget the initialisation traffic.
    fn display(page_write: PageWrite) -> Ssd1307<Recorder> {
        let config = DisplayConfig {
            page_write,
            ..DisplayConfig::default()
        };
        let mut oled = Ssd1307::new(Recorder::default(), config).unwrap();
        oled.transport.writes.clear();
        oled
    }

    const POWER_UP_32: [u8; 22] = [
        0xAE, 0x20, 0x10, 0xD5, 0xA1, 0xA8, 0x1F, 0xD3, 0x23, 0x40, 0xA1, 0xC0, 0xDA, 0x12,
        0x81, 0x80, 0xD9, 0x51, 0xDB, 0x20, 0xA4, 0xA6,
    ];

    #[test]
    fn construction_sends_power_up_clear_and_display_on() {
        let oled = Ssd1307::new(Recorder::default(), DisplayConfig::new(128, 32)).unwrap();
        assert_eq!(oled.power_state(), PowerState::On);
        assert!(oled.surface().as_bytes().iter().all(|&b| b == 0));

        let blank = Framebuffer::new(128, 32).unwrap();
        let mut expected = commands(&POWER_UP_32);
        expected.extend(expected_sync(&blank, PageWrite::Full));
        expected.push(Write::Command(0xAF));

        assert_eq!(oled.release().writes, expected);
    }

    #[test]
    fn new_i2c_writes_to_configured_address() {
        use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

        const ADDR: u8 = 0x3D;
        let mut expectations: Vec<I2cTransaction> = POWER_UP_SEQUENCE
            .iter()
            .map(|step| I2cTransaction::write(ADDR, vec![0x00, step.byte(8)]))
            .collect();
        for command in [0xB0, 0x00, 0x10] {
            expectations.push(I2cTransaction::write(ADDR, vec![0x00, command]));
        }
        expectations.extend([
            I2cTransaction::transaction_start(ADDR),
            I2cTransaction::write(ADDR, vec![0x40]),
            I2cTransaction::write(ADDR, vec![0x00; 8]),
            I2cTransaction::transaction_end(ADDR),
            I2cTransaction::write(ADDR, vec![0x00, 0xAF]),
        ]);

        let config = DisplayConfig {
            address: ADDR,
            ..DisplayConfig::new(8, 8)
        };
        let oled = Ssd1307::new_i2c(I2cMock::new(&expectations), config).unwrap();
        assert_eq!(oled.config().address, ADDR);

        let transport = oled.release();
        assert_eq!(transport.address(), ADDR);
        transport.release().done();
    }

    #[test]
    fn mux_ratio_follows_height() {
        let oled = Ssd1307::new(Recorder::default(), DisplayConfig::new(128, 64)).unwrap();
        let writes = oled.release().writes;
        assert_eq!(writes[5], Write::Command(0xA8));
        assert_eq!(writes[6], Write::Command(63));
    }

    #[test]
    fn invalid_geometry_is_rejected_before_any_traffic() {
        let mut recorder = Recorder::default();
        {
            let result = Ssd1307::new(&mut recorder, DisplayConfig::new(128, 30));
            assert!(matches!(
                result,
                Err(Error::InvalidGeometry {
                    width: 128,
                    height: 30
                })
            ));
        }
        assert!(recorder.writes.is_empty());
    }

    #[test]
    fn construction_failure_propagates_transport_error() {
        let result = Ssd1307::new(Recorder::failing_at(3), DisplayConfig::default());
        assert!(matches!(result, Err(Error::Transport(BusFault))));
    }

    #[test]
    fn synchronize_writes_every_page() {
        let mut oled = display(PageWrite::Full);
        oled.surface_mut().draw_rect(0, 0, 128, 32, RectStyle::Outline);
        oled.synchronize().unwrap();

        let writes = &oled.transport.writes;
        assert_eq!(writes.len(), 4 * 4);
        for page in 0..4u8 {
            let chunk = &writes[page as usize * 4..page as usize * 4 + 4];
            assert_eq!(chunk[..3], commands(&[0xB0 | page, 0x00, 0x10])[..]);
            match &chunk[3] {
                Write::Data(bytes) => assert_eq!(bytes.len(), 128),
                other => panic!("expected data write, got {other:?}"),
            }
        }
        assert_eq!(*writes, expected_sync(oled.surface(), PageWrite::Full));
    }

    #[test]
    fn legacy_page_write_drops_last_column() {
        let mut oled = display(PageWrite::Legacy);
        oled.surface_mut().fill(BinaryColor::On);
        oled.synchronize().unwrap();

        let data: Vec<&Vec<u8>> = oled
            .transport
            .writes
            .iter()
            .filter_map(|w| match w {
                Write::Data(bytes) => Some(bytes),
                Write::Command(_) => None,
            })
            .collect();
        assert_eq!(data.len(), 4);
        assert!(data.iter().all(|bytes| bytes.len() == 127));
        assert_eq!(
            oled.transport.writes,
            expected_sync(oled.surface(), PageWrite::Legacy)
        );
    }

    #[test]
    fn synchronize_is_repeatable() {
        let mut oled = display(PageWrite::Full);
        oled.surface_mut().draw_line(AxisLine::Vertical {
            x: 7,
            y: 0,
            length: 32,
        });

        oled.synchronize().unwrap();
        let first = core::mem::take(&mut oled.transport.writes);
        oled.synchronize().unwrap();

        assert_eq!(first, oled.transport.writes);
    }

    #[test]
    fn synchronize_stops_at_first_failure() {
        let mut oled = display(PageWrite::Full);
        oled.transport.fail_at = Some(5);

        assert_eq!(oled.synchronize(), Err(Error::Transport(BusFault)));
        assert_eq!(oled.transport.writes.len(), 5);
    }

    #[test]
    fn drawing_generates_no_traffic() {
        let mut oled = display(PageWrite::Full);
        oled.surface_mut().fill(BinaryColor::On);
        oled.surface_mut().set_pixel(3, 3, BinaryColor::Off);
        oled.surface_mut().draw_rect(10, 10, 20, 5, RectStyle::Filled);
        assert!(oled.transport.writes.is_empty());
    }

    #[test]
    fn clear_blanks_buffer_and_transfers_it() {
        let mut oled = display(PageWrite::Full);
        oled.surface_mut().fill(BinaryColor::On);
        oled.clear().unwrap();

        assert!(oled.surface().as_bytes().iter().all(|&b| b == 0));
        let blank = Framebuffer::new(128, 32).unwrap();
        assert_eq!(oled.transport.writes, expected_sync(&blank, PageWrite::Full));
    }

    #[test]
    fn power_off_then_on() {
        let mut oled = display(PageWrite::Full);
        oled.power_off().unwrap();
        assert_eq!(oled.power_state(), PowerState::Off);
        oled.power_on().unwrap();
        assert_eq!(oled.power_state(), PowerState::On);

        assert_eq!(oled.transport.writes, commands(&[0xAE, 0xAF]));
    }

    #[test]
    fn power_commands_are_idempotent() {
        let mut oled = display(PageWrite::Full);
        oled.power_off().unwrap();
        oled.power_off().unwrap();
        assert_eq!(oled.power_state(), PowerState::Off);
        assert_eq!(oled.transport.writes, commands(&[0xAE, 0xAE]));
    }

    #[test]
    fn contrast_is_two_command_writes() {
        let mut oled = display(PageWrite::Full);
        oled.set_contrast(0xFF).unwrap();
        oled.set_contrast(0x00).unwrap();
        assert_eq!(oled.transport.writes, commands(&[0x81, 0xFF, 0x81, 0x00]));
    }

    #[test]
    fn invert_sets_low_bit() {
        let mut oled = display(PageWrite::Full);
        oled.set_invert(true).unwrap();
        oled.set_invert(false).unwrap();
        assert_eq!(oled.transport.writes, commands(&[0xA7, 0xA6]));
    }

    #[test]
    fn rotation_flips_scan_direction_and_remap() {
        let mut oled = display(PageWrite::Full);
        let before = oled.surface().clone();

        oled.set_rotation(true).unwrap();
        oled.set_rotation(false).unwrap();

        assert_eq!(oled.transport.writes, commands(&[0xC8, 0xA0, 0xC0, 0xA1]));
        assert_eq!(*oled.surface(), before);
    }

    #[test]
    fn failed_power_off_keeps_state() {
        let mut oled = display(PageWrite::Full);
        oled.transport.fail_at = Some(0);
        assert_eq!(oled.power_off(), Err(Error::Transport(BusFault)));
        assert_eq!(oled.power_state(), PowerState::On);
    }
}
