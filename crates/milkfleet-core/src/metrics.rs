// ── Derived fleet metrics ──
//
// Pure input → output functions over fetched device snapshots. Nothing here
// touches the network or the sync layer; views call these on the snapshot
// they already hold. `FleetMetrics::compute` does one pass so the dashboard
// alert badge and the tamper-review list share a single computation.

use crate::model::Device;

/// Tank-level color band. Boundaries are inclusive at 50 and 25:
/// exactly 50 is Ok, exactly 25 is Warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityBand {
    Ok,
    Warning,
    Critical,
}

impl CapacityBand {
    pub fn for_percent(percent: f64) -> Self {
        if percent >= 50.0 {
            Self::Ok
        } else if percent >= 25.0 {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

/// Number of devices currently online.
pub fn online_count(devices: &[Device]) -> usize {
    devices.iter().filter(|d| d.is_online()).count()
}

/// Devices flagged as tampered by the backend. Same predicate feeds the
/// alert badge count and the tamper-review page.
pub fn tampered_devices(devices: &[Device]) -> Vec<&Device> {
    devices.iter().filter(|d| d.is_tampered).collect()
}

/// Remaining capacity clamped to `[0, 100]`, or `None` when the device
/// doesn't report a level.
pub fn capacity_percent(device: &Device) -> Option<f64> {
    device.capacity.map(|c| c.clamp(0.0, 100.0))
}

/// Capacity band for a device, if it reports a level.
pub fn capacity_band(device: &Device) -> Option<CapacityBand> {
    capacity_percent(device).map(CapacityBand::for_percent)
}

/// Fleet uptime as a rounded percentage. `None` for an empty fleet --
/// renderers show a neutral placeholder instead of NaN or Infinity.
pub fn uptime_percent(devices: &[Device]) -> Option<u8> {
    let total = devices.len();
    if total == 0 {
        return None;
    }
    let online = online_count(devices);
    // Integer round-half-up; online <= total keeps this within 0..=100.
    u8::try_from((online * 100 + total / 2) / total).ok()
}

/// All dashboard aggregates, computed in a single pass over the snapshot.
#[derive(Debug, Clone)]
pub struct FleetMetrics {
    pub total: usize,
    pub online: usize,
    pub tampered: Vec<Device>,
    pub uptime_percent: Option<u8>,
}

impl FleetMetrics {
    pub fn compute(devices: &[Device]) -> Self {
        let mut online = 0;
        let mut tampered = Vec::new();
        for device in devices {
            if device.is_online() {
                online += 1;
            }
            if device.is_tampered {
                tampered.push(device.clone());
            }
        }
        let total = devices.len();
        let uptime_percent = if total == 0 {
            None
        } else {
            u8::try_from((online * 100 + total / 2) / total).ok()
        };
        Self {
            total,
            online,
            tampered,
            uptime_percent,
        }
    }

    /// Alert badge count -- same source of truth as the tamper list.
    pub fn alert_count(&self) -> usize {
        self.tampered.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::DeviceStatus;
    use pretty_assertions::assert_eq;

    fn device(id: &str, status: DeviceStatus, tampered: bool, capacity: Option<f64>) -> Device {
        Device {
            id: id.into(),
            name: format!("ATM {id}"),
            status,
            is_tampered: tampered,
            last_updated: None,
            capacity,
            temperature: None,
        }
    }

    #[test]
    fn online_count_is_bounded_by_length() {
        let fleet = vec![
            device("a", DeviceStatus::Online, false, None),
            device("b", DeviceStatus::Online, false, None),
            device("c", DeviceStatus::Offline, false, None),
        ];
        assert!(online_count(&fleet) <= fleet.len());
        assert_eq!(online_count(&fleet), 2);
    }

    #[test]
    fn tampered_devices_is_a_subset() {
        let fleet = vec![
            device("a", DeviceStatus::Online, true, None),
            device("b", DeviceStatus::Offline, false, None),
        ];
        let tampered = tampered_devices(&fleet);
        assert_eq!(tampered.len(), 1);
        assert!(tampered.iter().all(|t| fleet.iter().any(|d| d.id == t.id)));
    }

    #[test]
    fn online_and_tampered_are_independent_flags() {
        let fleet = vec![device("a", DeviceStatus::Online, true, None)];
        assert_eq!(online_count(&fleet), 1);
        assert_eq!(tampered_devices(&fleet).len(), 1);
    }

    #[test]
    fn capacity_percent_is_clamped() {
        let over = device("a", DeviceStatus::Online, false, Some(130.0));
        let under = device("b", DeviceStatus::Online, false, Some(-10.0));
        assert_eq!(capacity_percent(&over), Some(100.0));
        assert_eq!(capacity_percent(&under), Some(0.0));
        assert_eq!(
            capacity_percent(&device("c", DeviceStatus::Online, false, None)),
            None
        );
    }

    #[test]
    fn capacity_band_boundaries_are_inclusive() {
        // Exactly 50 is Ok, not Warning.
        assert_eq!(CapacityBand::for_percent(50.0), CapacityBand::Ok);
        assert_eq!(CapacityBand::for_percent(49.99), CapacityBand::Warning);
        // Exactly 25 is Warning, not Critical.
        assert_eq!(CapacityBand::for_percent(25.0), CapacityBand::Warning);
        assert_eq!(CapacityBand::for_percent(24.99), CapacityBand::Critical);
        assert_eq!(CapacityBand::for_percent(0.0), CapacityBand::Critical);
        assert_eq!(CapacityBand::for_percent(100.0), CapacityBand::Ok);
    }

    #[test]
    fn capacity_band_is_monotonic_in_raw_capacity() {
        let mut last = CapacityBand::Critical;
        for raw in 0..=100 {
            let band = CapacityBand::for_percent(f64::from(raw));
            // Bands only improve as capacity rises.
            let rank = |b: CapacityBand| match b {
                CapacityBand::Critical => 0,
                CapacityBand::Warning => 1,
                CapacityBand::Ok => 2,
            };
            assert!(rank(band) >= rank(last));
            last = band;
        }
    }

    #[test]
    fn uptime_guards_empty_fleet() {
        assert_eq!(uptime_percent(&[]), None);
        let metrics = FleetMetrics::compute(&[]);
        assert_eq!(metrics.uptime_percent, None);
        assert_eq!(metrics.alert_count(), 0);
    }

    #[test]
    fn uptime_rounds() {
        let fleet = vec![
            device("a", DeviceStatus::Online, false, None),
            device("b", DeviceStatus::Online, false, None),
            device("c", DeviceStatus::Offline, false, None),
        ];
        // 2/3 = 66.67 -> 67
        assert_eq!(uptime_percent(&fleet), Some(67));
    }

    #[test]
    fn dashboard_scenario_two_devices() {
        let fleet = vec![
            device("D1", DeviceStatus::Online, false, Some(80.0)),
            device("D2", DeviceStatus::Offline, true, Some(10.0)),
        ];

        let metrics = FleetMetrics::compute(&fleet);
        assert_eq!(metrics.online, 1);
        assert_eq!(metrics.alert_count(), 1);
        assert_eq!(metrics.tampered[0].id, "D2");
        assert_eq!(metrics.uptime_percent, Some(50));
        assert_eq!(capacity_band(&fleet[1]), Some(CapacityBand::Critical));
        assert_eq!(capacity_band(&fleet[0]), Some(CapacityBand::Ok));
    }

    #[test]
    fn compute_matches_standalone_functions() {
        let fleet = vec![
            device("a", DeviceStatus::Online, true, Some(55.0)),
            device("b", DeviceStatus::Offline, false, Some(20.0)),
            device("c", DeviceStatus::Online, false, None),
        ];
        let metrics = FleetMetrics::compute(&fleet);
        assert_eq!(metrics.online, online_count(&fleet));
        assert_eq!(metrics.alert_count(), tampered_devices(&fleet).len());
        assert_eq!(metrics.uptime_percent, uptime_percent(&fleet));
    }
}
