//! Grade contexts, disciplines, and the context-to-scale mapping
//!
//! A regional grade context (US, France, Australia) combined with a climbing
//! discipline determines which grade scale a climb's difficulty is recorded
//! in. The mapping is static and loaded once; everything here is a table
//! lookup with no numeric computation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A regional grading context
///
/// Determines which grade scales apply to climbs in a region. Parsed from
/// the two-letter country code stored on area records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeContext {
    /// United States (YDS routes, V-scale boulders)
    #[serde(rename = "US")]
    Us,
    /// France (French routes, Fontainebleau boulders)
    #[serde(rename = "FR")]
    Fr,
    /// Australia (Ewbank routes, V-scale boulders)
    #[serde(rename = "AU")]
    Au,
}

impl FromStr for GradeContext {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "US" => Ok(GradeContext::Us),
            "FR" => Ok(GradeContext::Fr),
            "AU" => Ok(GradeContext::Au),
            other => Err(anyhow::anyhow!("Unknown grade context '{}'", other)),
        }
    }
}

impl fmt::Display for GradeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            GradeContext::Us => "US",
            GradeContext::Fr => "FR",
            GradeContext::Au => "AU",
        };
        write!(f, "{}", code)
    }
}

/// A climbing discipline
///
/// The style/category a climb is done in. Discipline selects the grade scale
/// within a context: boulders and routes use different scales everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Sport,
    Trad,
    Bouldering,
    /// Top rope
    Tr,
    Aid,
    Alpine,
    Mixed,
    Snow,
    Ice,
    #[serde(rename = "deepwatersolo")]
    DeepWaterSolo,
}

/// Identifier of a grade scale
///
/// Names a grading system without carrying any of its tables. Score
/// computation and parsing live in the external scale resolver; this crate
/// only keys raw grade values and resolver calls by these identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeScaleId {
    /// Yosemite Decimal System (5.9, 5.10a, ...)
    Yds,
    /// Hueco V-scale for boulders (V0, V5, ...)
    VScale,
    /// French sport scale (6a, 7c+, ...)
    French,
    /// Fontainebleau boulder scale
    Font,
    /// Australian Ewbank scale (18, 24, ...)
    Ewbank,
    /// Aid climbing scale (A0-A5)
    Aid,
    /// Water ice scale (WI2, WI6, ...)
    Wi,
}

/// Looks up the grade scale for a (context, discipline) pair
///
/// This is the static mapping table. Pairs outside the table (for example
/// deep-water solo in the US context) have no defined scale and yield `None`;
/// callers degrade to "no result" rather than failing.
pub fn scale_for(context: GradeContext, discipline: Discipline) -> Option<GradeScaleId> {
    use Discipline::*;
    use GradeContext::*;

    match (context, discipline) {
        (Us, Bouldering) => Some(GradeScaleId::VScale),
        (Us, DeepWaterSolo) => None,
        (Us, _) => Some(GradeScaleId::Yds),

        (Fr, Bouldering) => Some(GradeScaleId::Font),
        (Fr, DeepWaterSolo) => None,
        (Fr, _) => Some(GradeScaleId::French),

        (Au, Trad | Sport | Tr | DeepWaterSolo) => Some(GradeScaleId::Ewbank),
        (Au, Bouldering) => Some(GradeScaleId::VScale),
        (Au, Alpine | Mixed | Snow) => Some(GradeScaleId::Yds),
        (Au, Aid) => Some(GradeScaleId::Aid),
        (Au, Ice) => Some(GradeScaleId::Wi),
    }
}

/// Raw grade values recorded for a climb, keyed by scale
///
/// A climb record stores the grade as entered per scale; which one is shown
/// depends on the context and discipline. Owned by the climb record, read-only
/// here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub french: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ewbank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wi: Option<String>,
}

impl GradeValues {
    /// Returns the raw grade recorded in the given scale, if any
    pub fn get(&self, scale: GradeScaleId) -> Option<&str> {
        let value = match scale {
            GradeScaleId::Yds => &self.yds,
            GradeScaleId::VScale => &self.vscale,
            GradeScaleId::French => &self.french,
            GradeScaleId::Font => &self.font,
            GradeScaleId::Ewbank => &self.ewbank,
            GradeScaleId::Aid => &self.aid,
            GradeScaleId::Wi => &self.wi,
        };
        value.as_deref()
    }
}

/// Discipline flags for a climb
///
/// Supplied by the climb record; a climb can belong to several disciplines
/// at once (for example trad and alpine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisciplineFlags {
    pub sport: bool,
    pub trad: bool,
    pub bouldering: bool,
    pub tr: bool,
    pub aid: bool,
    pub alpine: bool,
    pub mixed: bool,
    pub snow: bool,
    pub ice: bool,
    pub deepwatersolo: bool,
}

/// A difficulty score returned by a scale resolver
///
/// Grades like "5.10" resolve to a range covering 5.10a-5.10d; exact grades
/// resolve to a single value. Negative values mean the input did not parse
/// against the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// A single point on the scale
    Value(f64),
    /// An inclusive low/high range on the scale
    Range(f64, f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_us_route_discipline_maps_to_yds() {
        for discipline in [
            Discipline::Trad,
            Discipline::Sport,
            Discipline::Tr,
            Discipline::Alpine,
            Discipline::Mixed,
            Discipline::Aid,
            Discipline::Snow,
            Discipline::Ice,
        ] {
            assert_eq!(
                scale_for(GradeContext::Us, discipline),
                Some(GradeScaleId::Yds)
            );
        }
    }

    #[test]
    fn test_bouldering_scale_per_context() {
        assert_eq!(
            scale_for(GradeContext::Us, Discipline::Bouldering),
            Some(GradeScaleId::VScale)
        );
        assert_eq!(
            scale_for(GradeContext::Fr, Discipline::Bouldering),
            Some(GradeScaleId::Font)
        );
        assert_eq!(
            scale_for(GradeContext::Au, Discipline::Bouldering),
            Some(GradeScaleId::VScale)
        );
    }

    #[test]
    fn test_australian_specialty_scales() {
        assert_eq!(
            scale_for(GradeContext::Au, Discipline::Sport),
            Some(GradeScaleId::Ewbank)
        );
        assert_eq!(
            scale_for(GradeContext::Au, Discipline::DeepWaterSolo),
            Some(GradeScaleId::Ewbank)
        );
        assert_eq!(
            scale_for(GradeContext::Au, Discipline::Aid),
            Some(GradeScaleId::Aid)
        );
        assert_eq!(
            scale_for(GradeContext::Au, Discipline::Ice),
            Some(GradeScaleId::Wi)
        );
        assert_eq!(
            scale_for(GradeContext::Au, Discipline::Alpine),
            Some(GradeScaleId::Yds)
        );
    }

    #[test]
    fn test_deep_water_solo_undefined_outside_australia() {
        assert_eq!(scale_for(GradeContext::Us, Discipline::DeepWaterSolo), None);
        assert_eq!(scale_for(GradeContext::Fr, Discipline::DeepWaterSolo), None);
    }

    #[test]
    fn test_context_parses_from_country_code() {
        assert_eq!("US".parse::<GradeContext>().unwrap(), GradeContext::Us);
        assert_eq!("fr".parse::<GradeContext>().unwrap(), GradeContext::Fr);
        assert!("UK".parse::<GradeContext>().is_err());
        assert!("".parse::<GradeContext>().is_err());
    }

    #[test]
    fn test_grade_values_lookup() {
        let values = GradeValues {
            yds: Some("5.10a".to_string()),
            vscale: Some("V4".to_string()),
            ..Default::default()
        };
        assert_eq!(values.get(GradeScaleId::Yds), Some("5.10a"));
        assert_eq!(values.get(GradeScaleId::VScale), Some("V4"));
        assert_eq!(values.get(GradeScaleId::French), None);
    }

    #[test]
    fn test_grade_values_deserialize_from_climb_record() {
        let json = r#"{"yds":"5.11c","french":"6c+"}"#;
        let values: GradeValues = serde_json::from_str(json).unwrap();
        assert_eq!(values.get(GradeScaleId::Yds), Some("5.11c"));
        assert_eq!(values.get(GradeScaleId::French), Some("6c+"));
        assert_eq!(values.get(GradeScaleId::Ewbank), None);
    }

    #[test]
    fn test_discipline_flags_default_to_false() {
        let flags: DisciplineFlags = serde_json::from_str(r#"{"sport":true}"#).unwrap();
        assert!(flags.sport);
        assert!(!flags.bouldering);
        assert!(!flags.deepwatersolo);
    }
}
