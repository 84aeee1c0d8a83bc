use serde::{Deserialize, Serialize};

/// Planar wind vector in grid units (x grows east, y grows south).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    pub x: f64,
    pub y: f64,
}

impl Wind {
    pub const CALM: Wind = Wind { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle_rad` (0 points east).
    #[must_use]
    pub fn from_angle(angle_rad: f64) -> Self {
        Self {
            x: angle_rad.cos(),
            y: angle_rad.sin(),
        }
    }

    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Unit vector in the same direction, or calm for a zero vector.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let m = self.magnitude();
        if m <= f64::EPSILON {
            Self::CALM
        } else {
            self.scaled(1.0 / m)
        }
    }

    /// Same direction with the magnitude limited to `max`.
    #[must_use]
    pub fn clamped(&self, max: f64) -> Self {
        let m = self.magnitude();
        if m > max {
            self.scaled(max / m)
        } else {
            *self
        }
    }

    #[inline]
    #[must_use]
    pub fn dot(&self, other: Wind) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

/// One global weather sample, replaced wholesale every weather tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Ambient temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    pub wind_speed: f64,
    /// Unit vector the wind blows toward.
    pub wind_direction: Wind,
    /// Precipitation in mm/day.
    pub precipitation: f64,
    pub storm: bool,
    pub fog: bool,
}

impl WeatherSample {
    /// Global wind as a vector.
    #[must_use]
    pub fn wind(&self) -> Wind {
        self.wind_direction.scaled(self.wind_speed)
    }

    /// Dry, still, storm-free sample at the given temperature and humidity.
    #[must_use]
    pub fn calm(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
            wind_speed: 0.0,
            wind_direction: Wind::new(1.0, 0.0),
            precipitation: 0.0,
            storm: false,
            fog: false,
        }
    }
}

impl Default for WeatherSample {
    fn default() -> Self {
        Self::calm(20.0, 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_calm_stays_calm() {
        assert_eq!(Wind::CALM.normalized(), Wind::CALM);
    }

    #[test]
    fn test_clamped_preserves_direction() {
        let w = Wind::new(30.0, 40.0).clamped(10.0);
        assert!((w.magnitude() - 10.0).abs() < 1e-9);
        assert!((w.x / w.y - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_sample_wind_vector() {
        let mut sample = WeatherSample::calm(10.0, 40.0);
        sample.wind_speed = 5.0;
        sample.wind_direction = Wind::from_angle(std::f64::consts::FRAC_PI_2);
        let w = sample.wind();
        assert!(w.x.abs() < 1e-9);
        assert!((w.y - 5.0).abs() < 1e-9);
    }
}
