//! PM2.5 correction formulas.
//!
//! PurpleAir sensors read high in some conditions; each published correction
//! maps a raw reading (and, for US EPA, relative humidity) onto a
//! reference-monitor estimate. Each method is a pure function, so adding a
//! method means one enum variant plus one function here.

use serde::Serialize;
use std::fmt;

/// The closed set of supported correction methods.
///
/// `Cf1` applies no formula but selects the channel-A CF=1 field when
/// querying, as do [`Correction::Lrapa`] and [`Correction::Woodsmoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Correction {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "US EPA")]
    UsEpa,
    #[serde(rename = "Woodsmoke")]
    Woodsmoke,
    #[serde(rename = "AQ&U")]
    AqAndU,
    #[serde(rename = "LRAPA")]
    Lrapa,
    #[serde(rename = "CF=1")]
    Cf1,
}

impl Correction {
    /// Parses a method name case-insensitively. Unrecognized names map to
    /// [`Correction::None`] (raw pass-through) rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "us epa" | "us_epa" => Correction::UsEpa,
            "woodsmoke" => Correction::Woodsmoke,
            "aq&u" | "aq and u" | "aq_and_u" | "aq u" => Correction::AqAndU,
            "lrapa" => Correction::Lrapa,
            "cf=1" | "cf1" => Correction::Cf1,
            _ => Correction::None,
        }
    }

    /// The upstream PM2.5 field this method is calibrated against.
    pub fn pm25_field(&self) -> &'static str {
        match self {
            Correction::Lrapa | Correction::Woodsmoke | Correction::Cf1 => "pm2.5_cf_1",
            _ => "pm2.5",
        }
    }

    /// Applies the correction to a raw concentration.
    ///
    /// US EPA needs relative humidity; without it the raw value passes
    /// through unchanged.
    pub fn apply(&self, pm: f64, humidity: Option<f64>) -> f64 {
        match self {
            Correction::None | Correction::Cf1 => pm,
            Correction::UsEpa => match humidity {
                Some(rh) => us_epa(pm, rh),
                None => pm,
            },
            Correction::Woodsmoke => woodsmoke(pm),
            Correction::AqAndU => aq_and_u(pm),
            Correction::Lrapa => lrapa(pm),
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Correction::None => "none",
            Correction::UsEpa => "US EPA",
            Correction::Woodsmoke => "Woodsmoke",
            Correction::AqAndU => "AQ&U",
            Correction::Lrapa => "LRAPA",
            Correction::Cf1 => "CF=1",
        };
        f.write_str(name)
    }
}

/// EPA's piecewise PurpleAir correction, blended across segment edges.
/// Floored at zero.
fn us_epa(pm: f64, rh: f64) -> f64 {
    let c = if pm < 30.0 {
        0.524 * pm - 0.0862 * rh + 5.75
    } else if pm < 50.0 {
        let t = pm / 20.0 - 1.5;
        (0.786 * t + 0.524 * (1.0 - t)) * pm - 0.0862 * rh + 5.75
    } else if pm < 210.0 {
        0.786 * pm - 0.0862 * rh + 5.75
    } else if pm < 260.0 {
        let t = pm / 50.0 - 4.2;
        (0.69 * t + 0.786 * (1.0 - t)) * pm - 0.0862 * rh * (1.0 - t)
            + 2.966 * t
            + 5.75 * (1.0 - t)
            + 8.84e-4 * pm * pm * t
    } else {
        2.966 + 0.69 * pm + 8.84e-4 * pm * pm
    };
    c.max(0.0)
}

fn woodsmoke(pm: f64) -> f64 {
    0.55 * pm + 0.53
}

fn aq_and_u(pm: f64) -> f64 {
    0.778 * pm + 2.65
}

fn lrapa(pm: f64) -> f64 {
    (0.5 * pm - 0.66).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(Correction::from_name("US EPA"), Correction::UsEpa);
        assert_eq!(Correction::from_name("us epa"), Correction::UsEpa);
        assert_eq!(Correction::from_name("LRAPA"), Correction::Lrapa);
        assert_eq!(Correction::from_name("lrapa"), Correction::Lrapa);
        assert_eq!(Correction::from_name("aq&u"), Correction::AqAndU);
        assert_eq!(Correction::from_name("CF=1"), Correction::Cf1);
        assert_eq!(Correction::from_name("none"), Correction::None);
    }

    #[test]
    fn test_from_name_unrecognized_falls_back_to_none() {
        assert_eq!(Correction::from_name("bogus"), Correction::None);
        assert_eq!(Correction::from_name(""), Correction::None);
    }

    #[test]
    fn test_pm25_field_selection() {
        assert_eq!(Correction::Lrapa.pm25_field(), "pm2.5_cf_1");
        assert_eq!(Correction::Woodsmoke.pm25_field(), "pm2.5_cf_1");
        assert_eq!(Correction::Cf1.pm25_field(), "pm2.5_cf_1");
        assert_eq!(Correction::UsEpa.pm25_field(), "pm2.5");
        assert_eq!(Correction::AqAndU.pm25_field(), "pm2.5");
        assert_eq!(Correction::None.pm25_field(), "pm2.5");
    }

    #[test]
    fn test_none_passes_through() {
        assert_eq!(Correction::None.apply(17.3, Some(40.0)), 17.3);
        assert_eq!(Correction::Cf1.apply(17.3, None), 17.3);
    }

    #[test]
    fn test_us_epa_low_segment() {
        // 0.524*25 - 0.0862*50 + 5.75 = 14.54
        let c = Correction::UsEpa.apply(25.0, Some(50.0));
        assert!((c - 14.54).abs() < 1e-9, "got {c}");
    }

    #[test]
    fn test_us_epa_without_humidity_passes_through() {
        assert_eq!(Correction::UsEpa.apply(25.0, None), 25.0);
    }

    #[test]
    fn test_us_epa_mid_segment() {
        // 0.786*100 - 0.0862*30 + 5.75
        let c = Correction::UsEpa.apply(100.0, Some(30.0));
        assert!((c - (0.786 * 100.0 - 0.0862 * 30.0 + 5.75)).abs() < 1e-9);
    }

    #[test]
    fn test_us_epa_blend_continuous_at_30() {
        // At pm=30 the blend factor is 0, so both branches agree.
        let below = Correction::UsEpa.apply(29.999999, Some(50.0));
        let at = Correction::UsEpa.apply(30.0, Some(50.0));
        assert!((below - at).abs() < 1e-4);
    }

    #[test]
    fn test_us_epa_high_segment_ignores_humidity() {
        let a = Correction::UsEpa.apply(300.0, Some(10.0));
        let b = Correction::UsEpa.apply(300.0, Some(90.0));
        assert_eq!(a, b);
        assert!((a - (2.966 + 0.69 * 300.0 + 8.84e-4 * 300.0 * 300.0)).abs() < 1e-9);
    }

    #[test]
    fn test_us_epa_never_negative() {
        // Low pm with very high humidity would go negative unclamped.
        let c = Correction::UsEpa.apply(0.5, Some(99.0));
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_lrapa_clamped_at_zero() {
        assert_eq!(Correction::Lrapa.apply(1.0, None), 0.0);
        assert!((Correction::Lrapa.apply(10.0, None) - 4.34).abs() < 1e-9);
    }

    #[test]
    fn test_woodsmoke_and_aqu_unclamped() {
        assert!((Correction::Woodsmoke.apply(10.0, None) - 6.03).abs() < 1e-9);
        assert!((Correction::AqAndU.apply(10.0, None) - 10.43).abs() < 1e-9);
    }

    #[test]
    fn test_apply_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                Correction::UsEpa.apply(42.0, Some(55.0)),
                Correction::UsEpa.apply(42.0, Some(55.0))
            );
        }
    }
}
