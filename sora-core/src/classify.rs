//! Intensity tiers derived from weather metrics
//!
//! Every function here is pure. Thresholds are strict `>`, so a value sitting
//! exactly on a boundary falls to the lower tier.

macro_rules! tier {
    (
        $(#[$meta:meta])*
        $name:ident {
            $low:ident => $low_name:literal,
            $mid:ident => $mid_name:literal,
            $high:ident => $high_name:literal
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $low,
            #[default]
            $mid,
            $high,
        }

        impl $name {
            pub const ALL: [$name; 3] = [$name::$low, $name::$mid, $name::$high];

            /// Lowercase tier name
            pub fn name(self) -> &'static str {
                match self {
                    $name::$low => $low_name,
                    $name::$mid => $mid_name,
                    $name::$high => $high_name,
                }
            }

            /// Parse a tier name case-insensitively. Unknown names map to the middle tier.
            pub fn from_name(name: &str) -> Self {
                Self::ALL
                    .into_iter()
                    .find(|tier| tier.name().eq_ignore_ascii_case(name.trim()))
                    .unwrap_or_default()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

tier!(
    /// Rain tier, driven by humidity and wind
    RainIntensity { Light => "light", Medium => "medium", Heavy => "heavy" }
);

tier!(
    /// How many clouds spawn, driven by humidity
    CloudDensity { Light => "light", Medium => "medium", Dense => "dense" }
);

tier!(
    /// How fast clouds drift, driven by wind
    CloudSpeed { Slow => "slow", Medium => "medium", Fast => "fast" }
);

tier!(
    /// Sunshine tier, driven by temperature
    SunIntensity { Gentle => "gentle", Medium => "medium", Strong => "strong" }
);

pub fn rain_intensity(humidity: f64, wind_speed: f64) -> RainIntensity {
    if humidity > 80.0 && wind_speed > 5.0 {
        RainIntensity::Heavy
    } else if humidity > 60.0 || wind_speed > 3.0 {
        RainIntensity::Medium
    } else {
        RainIntensity::Light
    }
}

pub fn cloud_density(humidity: f64) -> CloudDensity {
    if humidity > 75.0 {
        CloudDensity::Dense
    } else if humidity > 50.0 {
        CloudDensity::Medium
    } else {
        CloudDensity::Light
    }
}

pub fn cloud_speed(wind_speed: f64) -> CloudSpeed {
    if wind_speed > 8.0 {
        CloudSpeed::Fast
    } else if wind_speed > 4.0 {
        CloudSpeed::Medium
    } else {
        CloudSpeed::Slow
    }
}

pub fn sun_intensity(temperature: f64) -> SunIntensity {
    if temperature > 25.0 {
        SunIntensity::Strong
    } else if temperature > 15.0 {
        SunIntensity::Medium
    } else {
        SunIntensity::Gentle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rain_intensity_heavy_needs_both() {
        assert_eq!(rain_intensity(81.0, 5.1), RainIntensity::Heavy);
        assert_eq!(rain_intensity(81.0, 5.0), RainIntensity::Medium);
        assert_eq!(rain_intensity(80.0, 9.0), RainIntensity::Medium);
        assert_eq!(rain_intensity(80.0, 5.0), RainIntensity::Medium);
    }

    #[test]
    fn test_rain_intensity_medium_needs_either() {
        assert_eq!(rain_intensity(61.0, 0.0), RainIntensity::Medium);
        assert_eq!(rain_intensity(0.0, 3.1), RainIntensity::Medium);
        assert_eq!(rain_intensity(60.0, 3.0), RainIntensity::Light);
        assert_eq!(rain_intensity(75.0, 3.2), RainIntensity::Medium);
    }

    #[test]
    fn test_rain_intensity_partition() {
        // heavy iff h > 80 && w > 5, light iff h <= 60 && w <= 3
        for h in (0..=100).step_by(5) {
            for w in 0..=12 {
                let (h, w) = (h as f64, w as f64);
                let expected = if h > 80.0 && w > 5.0 {
                    RainIntensity::Heavy
                } else if h <= 60.0 && w <= 3.0 {
                    RainIntensity::Light
                } else {
                    RainIntensity::Medium
                };
                assert_eq!(rain_intensity(h, w), expected, "h={h} w={w}");
            }
        }
    }

    #[test]
    fn test_cloud_density_boundaries() {
        assert_eq!(cloud_density(50.0), CloudDensity::Light);
        assert_eq!(cloud_density(51.0), CloudDensity::Medium);
        assert_eq!(cloud_density(75.0), CloudDensity::Medium);
        assert_eq!(cloud_density(76.0), CloudDensity::Dense);
    }

    #[test]
    fn test_cloud_speed_boundaries() {
        assert_eq!(cloud_speed(4.0), CloudSpeed::Slow);
        assert_eq!(cloud_speed(4.5), CloudSpeed::Medium);
        assert_eq!(cloud_speed(8.0), CloudSpeed::Medium);
        assert_eq!(cloud_speed(8.1), CloudSpeed::Fast);
    }

    #[test]
    fn test_sun_intensity_boundaries() {
        assert_eq!(sun_intensity(15.0), SunIntensity::Gentle);
        assert_eq!(sun_intensity(16.0), SunIntensity::Medium);
        assert_eq!(sun_intensity(25.0), SunIntensity::Medium);
        assert_eq!(sun_intensity(26.0), SunIntensity::Strong);
    }

    #[test]
    fn test_from_name_falls_back_to_medium() {
        assert_eq!(RainIntensity::from_name("Heavy"), RainIntensity::Heavy);
        assert_eq!(RainIntensity::from_name(" light "), RainIntensity::Light);
        assert_eq!(RainIntensity::from_name("torrential"), RainIntensity::Medium);
        assert_eq!(CloudDensity::from_name("DENSE"), CloudDensity::Dense);
        assert_eq!(CloudSpeed::from_name(""), CloudSpeed::Medium);
        assert_eq!(SunIntensity::from_name("strong"), SunIntensity::Strong);
    }
}
