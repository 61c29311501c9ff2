/// Geographic bounding box in degrees.
///
/// A box built with [`GeoBounds::empty`] starts inverted (min = +inf,
/// max = -inf) and only becomes usable once a finite coordinate has been
/// folded in; callers check [`GeoBounds::is_valid`] before projecting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl GeoBounds {
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    pub fn empty() -> Self {
        Self {
            lon_min: f64::INFINITY,
            lon_max: f64::NEG_INFINITY,
            lat_min: f64::INFINITY,
            lat_max: f64::NEG_INFINITY,
        }
    }

    /// Grow the box to cover `(lon, lat)`. Non-finite pairs are ignored.
    pub fn extend(&mut self, lon: f64, lat: f64) {
        if !lon.is_finite() || !lat.is_finite() {
            return;
        }
        self.lon_min = self.lon_min.min(lon);
        self.lon_max = self.lon_max.max(lon);
        self.lat_min = self.lat_min.min(lat);
        self.lat_max = self.lat_max.max(lat);
    }

    /// True once at least one finite coordinate has been observed.
    pub fn is_valid(&self) -> bool {
        self.lon_min.is_finite()
            && self.lon_max.is_finite()
            && self.lat_min.is_finite()
            && self.lat_max.is_finite()
            && self.lon_min <= self.lon_max
            && self.lat_min <= self.lat_max
    }

    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}
