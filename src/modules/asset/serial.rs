//! OLE-automation serial dates, used to stamp generated asset names.

use std::sync::Mutex;
use time::macros::datetime;
use time::{OffsetDateTime, PrimitiveDateTime};

const OLE_EPOCH: PrimitiveDateTime = datetime!(1899-12-30 0:00);
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days since 1899-12-30, at millisecond precision.
pub fn to_serial_date(at: OffsetDateTime) -> f64 {
    let epoch = OLE_EPOCH.assume_utc();
    let millis = (at - epoch).whole_milliseconds();
    millis as f64 / MILLIS_PER_DAY
}

/// Shortest round-trip decimal form with `.` swapped for `-`, so the value
/// can sit inside a resource name.
pub fn format_serial(serial: f64) -> String {
    serial.to_string().replace('.', "-")
}

/// Hands out serial dates that never repeat within the process, even when
/// two assets are named within the same millisecond.
#[derive(Debug, Default)]
pub struct SerialClock {
    last: Mutex<f64>,
}

impl SerialClock {
    pub fn next(&self) -> String {
        self.next_at(OffsetDateTime::now_utc())
    }

    pub fn next_at(&self, at: OffsetDateTime) -> String {
        let mut serial = to_serial_date(at);

        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if serial <= *last {
            // smallest representable step above the previous stamp
            serial = f64::from_bits(last.to_bits() + 1);
        }
        *last = serial;

        format_serial(serial)
    }
}
