//! Wi-Fi station and access-point helpers.
//!
//! [`WifiManager`] wraps two WLAN interfaces supplied by the platform (one
//! in station mode, one in access-point mode) and a status LED. Connection
//! failures are retried a bounded number of times, with no delay and no
//! backoff; anything more elaborate belongs to the caller.

use core::net::Ipv4Addr;

use embedded_hal::digital::OutputPin;
use heapless::String;

use crate::error::{bounded, CapacityExceeded, NetError};

/// Maximum SSID length in bytes (802.11).
pub const SSID_CAPACITY: usize = 32;

/// Maximum WPA passphrase length in bytes.
pub const PASSWORD_CAPACITY: usize = 64;

/// Station and access-point credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiCredentials {
    /// Network name.
    pub ssid: String<SSID_CAPACITY>,
    /// Passphrase. Empty for open networks.
    pub password: String<PASSWORD_CAPACITY>,
}

impl WifiCredentials {
    /// Build credentials from string slices.
    ///
    /// # Errors
    /// [`CapacityExceeded`] if either value is too long.
    pub fn new(ssid: &str, password: &str) -> Result<Self, CapacityExceeded> {
        Ok(Self {
            ssid: bounded(ssid)?,
            password: bounded(password)?,
        })
    }
}

/// IPv4 interface settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpConfig {
    /// Interface address.
    pub address: Ipv4Addr,
    /// Subnet mask.
    pub netmask: Ipv4Addr,
    /// Default gateway.
    pub gateway: Ipv4Addr,
    /// DNS server.
    pub dns: Ipv4Addr,
}

/// Access-point authentication mode, numbered as the platform expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AuthMode {
    /// No authentication.
    Open = 0,
    /// WEP shared key.
    Wep = 1,
    /// WPA personal.
    WpaPsk = 2,
    /// WPA2 personal.
    Wpa2Psk = 3,
    /// WPA or WPA2 personal, client's choice.
    WpaWpa2Psk = 4,
}

/// One WLAN interface of the platform networking stack.
pub trait Wlan {
    /// Error reported by the platform.
    type Error;

    /// Enable or disable the interface.
    fn set_active(&mut self, active: bool) -> Result<(), Self::Error>;

    /// Try once to join `ssid`. `Ok(false)` means the attempt was refused.
    fn connect(&mut self, ssid: &str, password: &str) -> Result<bool, Self::Error>;

    /// Leave the current network.
    fn disconnect(&mut self) -> Result<(), Self::Error>;

    /// Current IPv4 settings.
    fn ifconfig(&mut self) -> Result<IpConfig, Self::Error>;

    /// Apply static IPv4 settings.
    fn set_ifconfig(&mut self, config: &IpConfig) -> Result<(), Self::Error>;

    /// Configure the interface as an access point.
    fn configure_ap(
        &mut self,
        ssid: &str,
        auth: AuthMode,
        password: &str,
    ) -> Result<(), Self::Error>;
}

/// Station / access-point manager with a network status LED.
///
/// The LED is lit while a station connection or an access point is up.
/// LED pin errors are ignored; the LED is informational only.
pub struct WifiManager<W, LED> {
    station: W,
    access_point: W,
    led: LED,
    credentials: WifiCredentials,
    station_opened: bool,
    ap_opened: bool,
}

impl<W, LED> WifiManager<W, LED>
where
    W: Wlan,
    LED: OutputPin,
{
    /// Create a manager with empty stored credentials.
    ///
    /// # Arguments
    /// * `station` — interface used for [`connect`](Self::connect)
    /// * `access_point` — interface used for [`start_ap`](Self::start_ap)
    /// * `led` — network status LED
    pub fn new(station: W, access_point: W, led: LED) -> Self {
        Self {
            station,
            access_point,
            led,
            credentials: WifiCredentials::default(),
            station_opened: false,
            ap_opened: false,
        }
    }

    /// Replace the stored credentials used when `connect` or `start_ap`
    /// are called without explicit values.
    pub fn configure(&mut self, credentials: WifiCredentials) {
        self.credentials = credentials;
    }

    /// Stored credentials.
    pub fn credentials(&self) -> &WifiCredentials {
        &self.credentials
    }

    /// Join a network as a station.
    ///
    /// Omitted values fall back to the stored credentials; `attempts`
    /// defaults to 1. The station is activated, then `connect` is called
    /// until it succeeds or `attempts` calls have been refused.
    ///
    /// # Errors
    /// * [`NetError::AttemptsExhausted`] after `attempts` refusals. The
    ///   station is deactivated and the LED switched off.
    /// * [`NetError::Transport`] if the platform reports an error; no
    ///   further attempts are made.
    pub fn connect(
        &mut self,
        ssid: Option<&str>,
        password: Option<&str>,
        attempts: Option<u32>,
    ) -> Result<(), NetError<W::Error>> {
        let ssid = ssid.unwrap_or(self.credentials.ssid.as_str());
        let password = password.unwrap_or(self.credentials.password.as_str());
        let attempts = attempts.unwrap_or(1);

        self.station.set_active(true).map_err(NetError::Transport)?;
        self.station_opened = true;

        let mut refused = 0;
        while refused < attempts {
            if self
                .station
                .connect(ssid, password)
                .map_err(NetError::Transport)?
            {
                break;
            }
            refused += 1;

            #[cfg(feature = "defmt")]
            defmt::warn!("Wi-Fi attempt {}/{} refused", refused, attempts);
        }

        if refused < attempts {
            #[cfg(feature = "defmt")]
            defmt::info!("Wi-Fi connected");

            self.set_led(true);
            Ok(())
        } else {
            self.station.set_active(false).map_err(NetError::Transport)?;
            self.set_led(false);
            Err(NetError::AttemptsExhausted)
        }
    }

    /// Leave the network and deactivate the station, if it was opened.
    /// The LED is switched off either way.
    pub fn disconnect(&mut self) -> Result<(), NetError<W::Error>> {
        if self.station_opened {
            self.station.disconnect().map_err(NetError::Transport)?;
            self.station.set_active(false).map_err(NetError::Transport)?;
        }
        self.set_led(false);
        Ok(())
    }

    /// Read or apply IPv4 settings.
    ///
    /// The station is used if it has been opened, otherwise the access
    /// point if it has been started. With `Some(config)` the settings are
    /// applied and `Ok(None)` is returned; with `None` the current settings
    /// are returned. `Ok(None)` also means neither interface is in use.
    pub fn ifconfig(
        &mut self,
        config: Option<IpConfig>,
    ) -> Result<Option<IpConfig>, NetError<W::Error>> {
        let wlan = if self.station_opened {
            &mut self.station
        } else if self.ap_opened {
            &mut self.access_point
        } else {
            return Ok(None);
        };

        match config {
            Some(config) => {
                wlan.set_ifconfig(&config).map_err(NetError::Transport)?;
                Ok(None)
            }
            None => wlan.ifconfig().map(Some).map_err(NetError::Transport),
        }
    }

    /// Start an access point with WPA2-PSK.
    ///
    /// Omitted values fall back to the stored credentials.
    pub fn start_ap(
        &mut self,
        ssid: Option<&str>,
        password: Option<&str>,
    ) -> Result<(), NetError<W::Error>> {
        let ssid = ssid.unwrap_or(self.credentials.ssid.as_str());
        let password = password.unwrap_or(self.credentials.password.as_str());

        self.access_point
            .set_active(true)
            .map_err(NetError::Transport)?;
        self.ap_opened = true;
        self.access_point
            .configure_ap(ssid, AuthMode::Wpa2Psk, password)
            .map_err(NetError::Transport)?;

        #[cfg(feature = "defmt")]
        defmt::info!("Access point started");

        self.set_led(true);
        Ok(())
    }

    /// Deactivate the access point, if it was started. The LED is switched
    /// off either way.
    pub fn stop_ap(&mut self) -> Result<(), NetError<W::Error>> {
        if self.ap_opened {
            self.access_point
                .set_active(false)
                .map_err(NetError::Transport)?;
        }
        self.set_led(false);
        Ok(())
    }

    /// Give back the interfaces and the LED pin.
    pub fn release(self) -> (W, W, LED) {
        (self.station, self.access_point, self.led)
    }

    fn set_led(&mut self, on: bool) {
        let _ = if on {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Active(bool),
        Connect(std::string::String, std::string::String),
        Disconnect,
        Ifconfig,
        SetIfconfig(IpConfig),
        ConfigureAp(std::string::String, AuthMode, std::string::String),
    }

    #[derive(Debug, PartialEq, Eq)]
    struct RadioFault;

    /// Records calls; `connect` answers from `accept` in order, then `false`.
    #[derive(Default)]
    struct FakeWlan {
        calls: Vec<Call>,
        accept: Vec<bool>,
        fault_on_connect: bool,
    }

    impl FakeWlan {
        fn accepting(accept: &[bool]) -> Self {
            Self {
                accept: accept.iter().rev().copied().collect(),
                ..Self::default()
            }
        }
    }

    const CONFIG: IpConfig = IpConfig {
        address: Ipv4Addr::new(192, 168, 4, 2),
        netmask: Ipv4Addr::new(255, 255, 255, 0),
        gateway: Ipv4Addr::new(192, 168, 4, 1),
        dns: Ipv4Addr::new(8, 8, 8, 8),
    };

    impl Wlan for FakeWlan {
        type Error = RadioFault;

        fn set_active(&mut self, active: bool) -> Result<(), RadioFault> {
            self.calls.push(Call::Active(active));
            Ok(())
        }

        fn connect(&mut self, ssid: &str, password: &str) -> Result<bool, RadioFault> {
            self.calls.push(Call::Connect(ssid.into(), password.into()));
            if self.fault_on_connect {
                return Err(RadioFault);
            }
            Ok(self.accept.pop().unwrap_or(false))
        }

        fn disconnect(&mut self) -> Result<(), RadioFault> {
            self.calls.push(Call::Disconnect);
            Ok(())
        }

        fn ifconfig(&mut self) -> Result<IpConfig, RadioFault> {
            self.calls.push(Call::Ifconfig);
            Ok(CONFIG)
        }

        fn set_ifconfig(&mut self, config: &IpConfig) -> Result<(), RadioFault> {
            self.calls.push(Call::SetIfconfig(*config));
            Ok(())
        }

        fn configure_ap(
            &mut self,
            ssid: &str,
            auth: AuthMode,
            password: &str,
        ) -> Result<(), RadioFault> {
            self.calls
                .push(Call::ConfigureAp(ssid.into(), auth, password.into()));
            Ok(())
        }
    }

    fn led(states: &[PinState]) -> PinMock {
        let expectations: Vec<PinTransaction> =
            states.iter().map(|&s| PinTransaction::set(s)).collect();
        PinMock::new(&expectations)
    }

    fn finish(manager: WifiManager<FakeWlan, PinMock>) -> (Vec<Call>, Vec<Call>) {
        let (station, ap, mut led) = manager.release();
        led.done();
        (station.calls, ap.calls)
    }

    #[test]
    fn connect_uses_stored_credentials() {
        let mut wifi = WifiManager::new(
            FakeWlan::accepting(&[true]),
            FakeWlan::default(),
            led(&[PinState::High]),
        );
        wifi.configure(WifiCredentials::new("home", "secret").unwrap());

        wifi.connect(None, None, None).unwrap();

        let (station, ap) = finish(wifi);
        assert_eq!(
            station,
            [Call::Active(true), Call::Connect("home".into(), "secret".into())]
        );
        assert!(ap.is_empty());
    }

    #[test]
    fn connect_retries_until_accepted() {
        let mut wifi = WifiManager::new(
            FakeWlan::accepting(&[false, false, true]),
            FakeWlan::default(),
            led(&[PinState::High]),
        );

        wifi.connect(Some("lab"), Some("pw"), Some(5)).unwrap();

        let (station, _) = finish(wifi);
        let connects = station
            .iter()
            .filter(|c| matches!(c, Call::Connect(..)))
            .count();
        assert_eq!(connects, 3);
    }

    #[test]
    fn connect_gives_up_after_attempts() {
        let mut wifi = WifiManager::new(
            FakeWlan::accepting(&[false, false, false, true]),
            FakeWlan::default(),
            led(&[PinState::Low]),
        );

        assert_eq!(
            wifi.connect(Some("lab"), Some("pw"), Some(3)),
            Err(NetError::AttemptsExhausted)
        );

        let (station, _) = finish(wifi);
        let connect = Call::Connect("lab".into(), "pw".into());
        assert_eq!(
            station,
            [
                Call::Active(true),
                connect.clone(),
                connect.clone(),
                connect,
                Call::Active(false),
            ]
        );
    }

    #[test]
    fn zero_attempts_never_connects() {
        let mut wifi = WifiManager::new(
            FakeWlan::accepting(&[true]),
            FakeWlan::default(),
            led(&[PinState::Low]),
        );

        assert_eq!(
            wifi.connect(Some("lab"), Some("pw"), Some(0)),
            Err(NetError::AttemptsExhausted)
        );

        let (station, _) = finish(wifi);
        assert_eq!(station, [Call::Active(true), Call::Active(false)]);
    }

    #[test]
    fn platform_fault_aborts_without_retry() {
        let station = FakeWlan {
            fault_on_connect: true,
            ..FakeWlan::default()
        };
        let mut wifi = WifiManager::new(station, FakeWlan::default(), led(&[]));

        assert_eq!(
            wifi.connect(Some("lab"), None, Some(4)),
            Err(NetError::Transport(RadioFault))
        );

        let (station, _) = finish(wifi);
        assert_eq!(station.len(), 2);
    }

    #[test]
    fn disconnect_without_station_only_turns_led_off() {
        let mut wifi = WifiManager::new(
            FakeWlan::default(),
            FakeWlan::default(),
            led(&[PinState::Low]),
        );
        wifi.disconnect().unwrap();

        let (station, ap) = finish(wifi);
        assert!(station.is_empty());
        assert!(ap.is_empty());
    }

    #[test]
    fn disconnect_after_connect() {
        let mut wifi = WifiManager::new(
            FakeWlan::accepting(&[true]),
            FakeWlan::default(),
            led(&[PinState::High, PinState::Low]),
        );
        wifi.connect(Some("lab"), Some("pw"), None).unwrap();
        wifi.disconnect().unwrap();

        let (station, _) = finish(wifi);
        assert_eq!(station[2..], [Call::Disconnect, Call::Active(false)]);
    }

    #[test]
    fn ifconfig_prefers_station_then_access_point() {
        let mut wifi = WifiManager::new(
            FakeWlan::accepting(&[true]),
            FakeWlan::default(),
            led(&[PinState::High, PinState::High]),
        );

        assert_eq!(wifi.ifconfig(None), Ok(None));

        wifi.start_ap(Some("board"), Some("password1")).unwrap();
        assert_eq!(wifi.ifconfig(None), Ok(Some(CONFIG)));

        wifi.connect(Some("lab"), Some("pw"), None).unwrap();
        assert_eq!(wifi.ifconfig(Some(CONFIG)), Ok(None));

        let (station, ap) = finish(wifi);
        assert_eq!(station.last(), Some(&Call::SetIfconfig(CONFIG)));
        assert_eq!(ap.last(), Some(&Call::Ifconfig));
    }

    #[test]
    fn access_point_uses_wpa2_and_stored_credentials() {
        let mut wifi = WifiManager::new(
            FakeWlan::default(),
            FakeWlan::default(),
            led(&[PinState::High, PinState::Low]),
        );
        wifi.configure(WifiCredentials::new("board", "password1").unwrap());

        wifi.start_ap(None, None).unwrap();
        wifi.stop_ap().unwrap();

        let (_, ap) = finish(wifi);
        assert_eq!(
            ap,
            [
                Call::Active(true),
                Call::ConfigureAp("board".into(), AuthMode::Wpa2Psk, "password1".into()),
                Call::Active(false),
            ]
        );
        assert_eq!(AuthMode::Wpa2Psk as u8, 3);
    }

    #[test]
    fn credentials_reject_long_ssid() {
        let ssid = "x".repeat(SSID_CAPACITY + 1);
        assert_eq!(
            WifiCredentials::new(&ssid, ""),
            Err(CapacityExceeded)
        );
    }
}
