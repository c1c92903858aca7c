use crate::core::{Channel, TimedFrame};
use serde::{Deserialize, Serialize};

/// Columnar copy of recent history: one sequence per channel, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelWindow {
    /// Seconds since the session opened
    pub timestamps: Vec<f64>,
    pub accel_x: Vec<f64>,
    pub accel_y: Vec<f64>,
    pub accel_z: Vec<f64>,
    pub temperature: Vec<f64>,
    pub gyro_x: Vec<f64>,
    pub gyro_y: Vec<f64>,
    pub gyro_z: Vec<f64>,
}

impl ChannelWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(capacity),
            accel_x: Vec::with_capacity(capacity),
            accel_y: Vec::with_capacity(capacity),
            accel_z: Vec::with_capacity(capacity),
            temperature: Vec::with_capacity(capacity),
            gyro_x: Vec::with_capacity(capacity),
            gyro_y: Vec::with_capacity(capacity),
            gyro_z: Vec::with_capacity(capacity),
        }
    }

    pub fn from_frames<'a, I>(frames: I) -> Self
    where
        I: IntoIterator<Item = &'a TimedFrame>,
        I::IntoIter: ExactSizeIterator,
    {
        let frames = frames.into_iter();
        let mut window = Self::with_capacity(frames.len());
        for timed in frames {
            window.push(timed);
        }
        window
    }

    fn push(&mut self, timed: &TimedFrame) {
        let f = &timed.frame;
        self.timestamps.push(timed.seconds());
        self.accel_x.push(f.accel_x);
        self.accel_y.push(f.accel_y);
        self.accel_z.push(f.accel_z);
        self.temperature.push(f.temperature);
        self.gyro_x.push(f.gyro_x);
        self.gyro_y.push(f.gyro_y);
        self.gyro_z.push(f.gyro_z);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn channel(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::AccelX => &self.accel_x,
            Channel::AccelY => &self.accel_y,
            Channel::AccelZ => &self.accel_z,
            Channel::Temperature => &self.temperature,
            Channel::GyroX => &self.gyro_x,
            Channel::GyroY => &self.gyro_y,
            Channel::GyroZ => &self.gyro_z,
        }
    }

    /// First and last timestamp, for setting a plot's x-axis.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        Some((*self.timestamps.first()?, *self.timestamps.last()?))
    }
}
