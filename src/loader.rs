//! Runtime loading and lifecycle of the two vendor backend modules.
//!
//! The primary camera module is mandatory: any failure while opening the
//! module, resolving its factory, or instantiating the backend aborts
//! preparation with every partially-acquired resource released. The thermal
//! extension is optional: the same staged load runs, but failure merely
//! leaves the device without thermal settings.
//!
//! All `unsafe` in the crate lives here, at the factory ABI boundary.

use std::path::Path;

use libloading::Library;
use tracing::{debug, info, warn};

use crate::backend::{
    BoxedBackend, BoxedThermal, CameraBackend, PrimaryFactory, StorageCallback, ThermalBackend,
    ThermalFactory, PRIMARY_FACTORY_SYMBOL, THERMAL_FACTORY_SYMBOL,
};
use crate::config::Config;
use crate::error::{CamError, Result};

const THERMAL_BAUD: u32 = 921_600;
const THERMAL_DATA_LINES: u32 = 16;

/// A live primary backend. Field order keeps the instance ahead of the
/// library so it drops first; injected instances carry no library.
struct LoadedPrimary {
    instance: BoxedBackend,
    _lib: Option<Library>,
}

struct LoadedThermal {
    instance: BoxedThermal,
    _lib: Option<Library>,
}

/// Owns the backend modules and their instances exclusively.
pub struct BackendLoader {
    primary: Option<LoadedPrimary>,
    thermal: Option<LoadedThermal>,
    preloaded: bool,
}

impl BackendLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            primary: None,
            thermal: None,
            preloaded: false,
        }
    }

    /// Install already-built instances, bypassing module loading. The load
    /// entry points then skip the platform loader but still run the
    /// configure/subscribe and probe stages against the given instances.
    #[must_use]
    pub fn with_instances(primary: BoxedBackend, thermal: Option<BoxedThermal>) -> Self {
        Self {
            primary: Some(LoadedPrimary {
                instance: primary,
                _lib: None,
            }),
            thermal: thermal.map(|instance| LoadedThermal {
                instance,
                _lib: None,
            }),
            preloaded: true,
        }
    }

    /// Load, instantiate, configure, and subscribe the primary backend.
    pub fn load_primary(&mut self, config: &Config, callback: StorageCallback) -> Result<()> {
        if self.preloaded {
            debug!("using injected primary backend instance");
        } else {
            // Clean teardown first so re-preparation never leaks the
            // previous generation.
            self.close();
            let (instance, lib) = Self::instantiate_primary(&config.primary_module)?;
            self.primary = Some(LoadedPrimary {
                instance,
                _lib: Some(lib),
            });
        }

        let Some(loaded) = self.primary.as_mut() else {
            return Err(CamError::BackendInit {
                module: config.primary_module.display().to_string(),
            });
        };

        let options = config.open_options();
        if let Err(err) = loaded.instance.open(&options) {
            warn!(%err, "primary backend open failed, pipeline may be degraded");
        }
        loaded.instance.subscribe_storage_information(callback);
        info!(module = %config.primary_module.display(), "primary backend ready");
        Ok(())
    }

    fn instantiate_primary(path: &Path) -> Result<(BoxedBackend, Library)> {
        let display = path.display().to_string();
        let lib = unsafe { Library::new(path) }.map_err(|err| CamError::ModuleLoad {
            path: display.clone(),
            reason: err.to_string(),
        })?;
        let factory =
            unsafe { lib.get::<PrimaryFactory>(PRIMARY_FACTORY_SYMBOL) }.map_err(|_| {
                CamError::SymbolMissing {
                    symbol: symbol_name(PRIMARY_FACTORY_SYMBOL),
                    module: display.clone(),
                }
            })?;
        let raw = unsafe { factory() };
        drop(factory);
        if raw.is_null() {
            return Err(CamError::BackendInit { module: display });
        }
        let instance = unsafe { Box::from_raw(raw) };
        Ok((instance, lib))
    }

    /// Load and probe the optional thermal extension. Returns false on any
    /// failure, releasing whatever was acquired; never fatal.
    pub fn load_thermal(&mut self, config: &Config) -> bool {
        if self.preloaded {
            let Some(loaded) = self.thermal.as_mut() else {
                debug!("no thermal backend injected");
                return false;
            };
            if Self::probe_thermal(loaded.instance.as_mut()) {
                return true;
            }
            self.thermal = None;
            return false;
        }

        // Named to avoid tracing's macro-scoped `field::display` import,
        // which shadows a local called `display`.
        let module_display = config.thermal_module.display().to_string();
        let lib = match unsafe { Library::new(&config.thermal_module) } {
            Ok(lib) => lib,
            Err(err) => {
                info!(module = %module_display, %err, "thermal module unavailable, continuing without it");
                return false;
            }
        };
        let raw = {
            let factory = match unsafe { lib.get::<ThermalFactory>(THERMAL_FACTORY_SYMBOL) } {
                Ok(factory) => factory,
                Err(_) => {
                    warn!(module = %module_display, "thermal module lacks its factory symbol");
                    return false;
                }
            };
            unsafe { factory() }
        };
        if raw.is_null() {
            warn!(module = %module_display, "thermal factory returned no instance");
            return false;
        }
        let mut instance = unsafe { Box::from_raw(raw) };
        if !Self::probe_thermal(instance.as_mut()) {
            return false;
        }
        self.thermal = Some(LoadedThermal {
            instance,
            _lib: Some(lib),
        });
        true
    }

    /// Serial bring-up plus identification. Any failed stage disqualifies
    /// the sensor.
    fn probe_thermal(thermal: &mut dyn ThermalBackend) -> bool {
        if let Err(err) = thermal.initialize(THERMAL_BAUD, THERMAL_DATA_LINES) {
            warn!(%err, "thermal serial link bring-up failed");
            return false;
        }
        match thermal.serial_number() {
            Ok(serial) => info!(serial, "thermal sensor present"),
            Err(err) => {
                warn!(%err, "thermal serial number query failed");
                return false;
            }
        }
        match thermal.part_number() {
            Ok(part) => info!(part = %part, "thermal sensor identified"),
            Err(err) => {
                warn!(%err, "thermal part number query failed");
                return false;
            }
        }
        true
    }

    /// Release both instances and their modules. Safe to call at any time,
    /// including when nothing is loaded.
    pub fn close(&mut self) {
        if let Some(mut loaded) = self.primary.take() {
            loaded.instance.close();
            debug!("primary backend released");
        }
        if self.thermal.take().is_some() {
            debug!("thermal backend released");
        }
    }

    #[must_use]
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    #[must_use]
    pub fn has_thermal(&self) -> bool {
        self.thermal.is_some()
    }

    pub fn primary_mut(&mut self) -> Option<&mut dyn CameraBackend> {
        self.primary
            .as_mut()
            .map(|loaded| loaded.instance.as_mut() as &mut dyn CameraBackend)
    }

    pub fn thermal_mut(&mut self) -> Option<&mut dyn ThermalBackend> {
        self.thermal
            .as_mut()
            .map(|loaded| loaded.instance.as_mut() as &mut dyn ThermalBackend)
    }
}

impl Default for BackendLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn symbol_name(symbol: &[u8]) -> String {
    String::from_utf8_lossy(symbol.strip_suffix(b"\0").unwrap_or(symbol)).into_owned()
}
