//! Progress bar example
//!
//! Standalone hardware demonstration that exercises [`Ssd1307`] directly.
//! Renders 4 horizontal progress bars with a frame around each and cycles
//! their values automatically, then blinks the panel through invert and
//! power commands once per sweep.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes           |
//! |-----------|------------|-----------------|
//! | I2C0 SDA  | GP20       |                 |
//! | I2C0 SCL  | GP21       |                 |
//! | OLED VCC  | 3V3        |                 |
//! | OLED GND  | GND        |                 |
//!
//! # Progress Bar Geometry (128×32 panel)
//!
//! | Property        | Value                                          |
//! |-----------------|------------------------------------------------|
//! | Bar row height  | 8 px (4 bars × 8 = 32 px = full display)       |
//! | Bar fill height | 6 px (1 px frame top and bottom per row)       |
//! | Bar pixel width | `value * 126 / 127`                            |
//! | Value range     | 0–127                                          |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use studuino_oled_rs::{DisplayConfig, RectStyle, Ssd1307};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Hardware pin assignments, change here for hardware revisions
// I2C bus is used exclusively by the OLED display in this example
// ---------------------------------------------------------------------------
// I2C_SDA → GP20 (p.PIN_20)
// I2C_SCL → GP21 (p.PIN_21)
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Progress bar example starting");

    // --- I2C bus (GP20 = SDA, GP21 = SCL), blocking ---
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_21, p.PIN_20, i2c::Config::default());

    let mut oled = match Ssd1307::new_i2c(i2c, DisplayConfig::new(128, 32)) {
        Ok(oled) => oled,
        Err(e) => defmt::panic!("OLED init failed: {}", e),
    };
    info!("OLED initialised");

    // Bar values 0–127, initialised offset so bars are visually distinct.
    let mut values: [u8; 4] = [0, 32, 64, 96];

    loop {
        let fb = oled.surface_mut();
        fb.fill(BinaryColor::Off);

        for (i, &v) in values.iter().enumerate() {
            let y = (i as i32) * 8;
            fb.draw_rect(0, y, 128, 8, RectStyle::Outline);

            let bar_width = (v as u32) * 126 / 127;
            Rectangle::new(Point::new(1, y + 1), Size::new(bar_width, 6))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(fb)
                .ok();
        }

        if let Err(e) = oled.synchronize() {
            warn!("Synchronize failed: {}", e);
        }

        // Increment all bars, wrapping at 127.
        for v in values.iter_mut() {
            *v = (*v + 1) % 128;
        }

        // Flash the panel once per sweep of the first bar.
        if values[0] == 0 {
            oled.set_invert(true).ok();
            Timer::after(Duration::from_millis(200)).await;
            oled.set_invert(false).ok();
            oled.power_off().ok();
            Timer::after(Duration::from_millis(200)).await;
            oled.power_on().ok();
        }

        Timer::after(Duration::from_millis(33)).await; // ~30 Hz
    }
}
