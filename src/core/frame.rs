use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Number of numeric fields carried by every frame on the wire.
pub const FIELD_COUNT: usize = 7;

/// One measurement channel of the MPU6050 sample, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    AccelX,
    AccelY,
    AccelZ,
    Temperature,
    GyroX,
    GyroY,
    GyroZ,
}

impl Channel {
    /// All channels in the order they appear on the wire.
    pub const ALL: [Channel; FIELD_COUNT] = [
        Channel::AccelX,
        Channel::AccelY,
        Channel::AccelZ,
        Channel::Temperature,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
    ];

    /// Zero-based position of this channel within a wire frame.
    pub fn index(self) -> usize {
        match self {
            Channel::AccelX => 0,
            Channel::AccelY => 1,
            Channel::AccelZ => 2,
            Channel::Temperature => 3,
            Channel::GyroX => 4,
            Channel::GyroY => 5,
            Channel::GyroZ => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::AccelX => "accel_x",
            Channel::AccelY => "accel_y",
            Channel::AccelZ => "accel_z",
            Channel::Temperature => "temperature",
            Channel::GyroX => "gyro_x",
            Channel::GyroY => "gyro_y",
            Channel::GyroZ => "gyro_z",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Channel::AccelX | Channel::AccelY | Channel::AccelZ => "g",
            Channel::Temperature => "°C",
            Channel::GyroX | Channel::GyroY | Channel::GyroZ => "deg/s",
        }
    }

    /// Nominal display range for plotting consumers.
    pub fn display_range(self) -> (f64, f64) {
        match self {
            Channel::AccelX | Channel::AccelY | Channel::AccelZ => (-2.5, 2.5),
            Channel::Temperature => (20.0, 50.0),
            Channel::GyroX | Channel::GyroY | Channel::GyroZ => (-300.0, 300.0),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded sample. Only the decoder constructs these from wire data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Acceleration (g)
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,

    /// Die temperature (°C)
    pub temperature: f64,

    /// Angular rate (deg/s)
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
}

impl Frame {
    /// Build a frame from values in wire order.
    pub fn from_fields(fields: [f64; FIELD_COUNT]) -> Self {
        let [accel_x, accel_y, accel_z, temperature, gyro_x, gyro_y, gyro_z] = fields;
        Self {
            accel_x,
            accel_y,
            accel_z,
            temperature,
            gyro_x,
            gyro_y,
            gyro_z,
        }
    }

    /// Values in wire order.
    pub fn fields(&self) -> [f64; FIELD_COUNT] {
        [
            self.accel_x,
            self.accel_y,
            self.accel_z,
            self.temperature,
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
        ]
    }

    pub fn get(&self, channel: Channel) -> f64 {
        self.fields()[channel.index()]
    }

    pub fn accel(&self) -> (f64, f64, f64) {
        (self.accel_x, self.accel_y, self.accel_z)
    }

    pub fn gyro(&self) -> (f64, f64, f64) {
        (self.gyro_x, self.gyro_y, self.gyro_z)
    }

    /// Fixed-width console row, prefixed by a 1-based frame number.
    pub fn format_row(&self, number: u64) -> String {
        format!(
            "{:<8} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2}",
            number,
            self.accel_x,
            self.accel_y,
            self.accel_z,
            self.temperature,
            self.gyro_x,
            self.gyro_y,
            self.gyro_z
        )
    }

    /// Header line matching [`Frame::format_row`].
    pub fn table_header() -> String {
        format!(
            "{:<8} {:<8}{:<8}{:<8}{:<8}{:<8}{:<8}{:<8}",
            "Frame", "Ax", "Ay", "Az", "Temp", "Gx", "Gy", "Gz"
        )
    }
}

/// A frame tagged with the time elapsed since its session was opened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedFrame {
    pub timestamp: Duration,
    pub frame: Frame,
}

impl TimedFrame {
    pub fn new(timestamp: Duration, frame: Frame) -> Self {
        Self { timestamp, frame }
    }

    /// Timestamp in fractional seconds, the unit plotting consumers use.
    pub fn seconds(&self) -> f64 {
        self.timestamp.as_secs_f64()
    }
}
