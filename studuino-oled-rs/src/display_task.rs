//! Shared-display refresh task.
//!
//! The driver mutates its state without locking, so a display used from
//! several tasks lives behind an Embassy mutex. Drawing tasks lock it,
//! draw into [`Ssd1307::surface_mut`] and release it; [`refresh_task`]
//! pushes the frame buffer to the panel at the configured rate.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};

use crate::driver::Ssd1307;
use crate::transport::BusTransport;

/// A display shared between tasks.
pub type SharedDisplay<DI> = Mutex<CriticalSectionRawMutex, Ssd1307<DI>>;

/// Periodic refresh loop.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// should create a thin, concrete task wrapper that calls this function,
/// since Embassy tasks cannot be generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(display: &'static SharedDisplay<I2cTransport<MyI2c>>) {
///     refresh_task(display).await;
/// }
/// ```
///
/// The period comes from [`DisplayConfig::refresh_period_ms`], read once at
/// start. The mutex is held for the duration of one transfer.
///
/// # Errors
///
/// A failed transfer is logged and retried on the next tick.
///
/// [`DisplayConfig::refresh_period_ms`]: crate::DisplayConfig::refresh_period_ms
pub async fn refresh_task<DI>(display: &'static SharedDisplay<DI>) -> !
where
    DI: BusTransport,
    DI::Error: core::fmt::Debug,
{
    let period_ms = display.lock().await.config().refresh_period_ms();
    let period = Duration::from_millis(period_ms);

    #[cfg(feature = "defmt")]
    defmt::info!("OLED refresh every {} ms", period_ms);

    loop {
        Timer::after(period).await;
        refresh(&mut *display.lock().await);
    }
}

/// One refresh tick: push the frame buffer and log a failure.
fn refresh<DI>(display: &mut Ssd1307<DI>) -> bool
where
    DI: BusTransport,
    DI::Error: core::fmt::Debug,
{
    match display.synchronize() {
        Ok(()) => true,
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("OLED synchronize failed: {}", defmt::Debug2Format(&_e));
            false
        }
    }
}
