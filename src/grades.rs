//! Grade formatting and validation
//!
//! Formats stored grade values for display and validates user-entered grade
//! strings. Scale selection is a lookup through the static context mapping;
//! scoring is delegated to the external [`ScaleResolver`]. An unmapped
//! (context, discipline) pair degrades to "no result" instead of failing.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::scales::{scale_for, Discipline, DisciplineFlags, GradeContext, GradeValues, Score};
use crate::traits::ScaleResolver;

/// Error message for a grade string the resolver rejects
const INVALID_GRADE: &str = "Invalid grade";
/// Error message for a required grade that was left empty
const MISSING_GRADE: &str = "Missing grade";
/// Error message for a bulk edit list containing rows with recorded errors
const FORMAT_ERROR: &str = "Format error";

/// Check function of a validation rule
///
/// Takes the user's input and returns an error message, or `None` when the
/// input is acceptable.
pub type RuleFn = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A named validation rule descriptor
///
/// Handed to form-rendering code, which runs `check` against the field value
/// and displays the returned message.
pub struct ValidationRule {
    name: &'static str,
    check: RuleFn,
}

impl ValidationRule {
    /// Name of the check, used as the rule key by form code
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the rule against an input value
    pub fn check(&self, input: &str) -> Option<String> {
        (self.check)(input)
    }
}

/// A validation rule over a whole list of editable climb rows
pub struct BulkValidationRule {
    check: Box<dyn Fn(&[EditableClimb]) -> Option<String> + Send + Sync>,
}

impl BulkValidationRule {
    /// Runs the rule against the full edit list
    pub fn check(&self, climbs: &[EditableClimb]) -> Option<String> {
        (self.check)(climbs)
    }
}

/// One editable row in a bulk climb editor
///
/// Carries the editable fields plus the per-field error messages the form
/// has recorded so far (`None` meaning the field is currently clean).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditableClimb {
    pub climb_id: Option<String>,
    pub name: Option<String>,
    pub grade: Option<String>,
    pub errors: HashMap<String, Option<String>>,
}

/// A climb's grade in its regional context
///
/// Holds the context, the raw per-scale grade values recorded for the climb,
/// and the climb's discipline flags. Formatting picks the right scale and
/// returns the raw value; validation delegates scoring to the resolver.
pub struct Grade {
    context: GradeContext,
    values: GradeValues,
    disciplines: DisciplineFlags,
    is_boulder: bool,
    resolver: Arc<dyn ScaleResolver>,
}

impl Grade {
    /// Creates a grade view for a climb
    ///
    /// # Arguments
    /// - `resolver` - External scale resolver used for names and scoring
    /// - `context` - Regional grading context of the climb's area
    /// - `values` - Raw grade values recorded on the climb, keyed by scale
    /// - `disciplines` - Discipline flags of the climb
    /// - `is_boulder` - Whether the climb record itself is marked a boulder
    pub fn new(
        resolver: Arc<dyn ScaleResolver>,
        context: GradeContext,
        values: GradeValues,
        disciplines: DisciplineFlags,
        is_boulder: bool,
    ) -> Self {
        Grade {
            context,
            values,
            disciplines,
            is_boulder,
            resolver,
        }
    }

    /// Whether the bouldering scale applies
    ///
    /// The explicit boulder flag wins first, then the bouldering discipline.
    pub fn is_bouldering(&self) -> bool {
        self.is_boulder || self.disciplines.bouldering
    }

    /// Whether a route scale applies (sport, trad, top rope, or aid)
    pub fn is_trad_sport_tr(&self) -> bool {
        self.disciplines.sport || self.disciplines.trad || self.disciplines.tr || self.disciplines.aid
    }

    /// Formats the grade for display
    ///
    /// Selects the bouldering scale when the climb is a boulder, otherwise
    /// the route scale, and returns the raw value recorded in that scale.
    /// Returns `None` when no discipline applies, the pair has no mapped
    /// scale, or no value was recorded.
    pub fn formatted(&self) -> Option<&str> {
        if self.is_bouldering() {
            return self.bouldering_value();
        }
        if self.is_trad_sport_tr() {
            return self.route_value();
        }
        None
    }

    fn bouldering_value(&self) -> Option<&str> {
        let scale = scale_for(self.context, Discipline::Bouldering)?;
        self.values.get(scale)
    }

    fn route_value(&self) -> Option<&str> {
        let scale = scale_for(self.context, Discipline::Sport)?;
        self.values.get(scale)
    }

    /// Display name of the context's bouldering scale, or empty string
    pub fn bouldering_scale_name(&self) -> String {
        scale_for(self.context, Discipline::Bouldering)
            .and_then(|scale| self.resolver.scale_name(scale))
            .unwrap_or_default()
    }

    /// Display name of the context's route scale, uppercased, or empty string
    pub fn route_scale_name(&self) -> String {
        scale_for(self.context, Discipline::Sport)
            .and_then(|scale| self.resolver.scale_name(scale))
            .map(|name| name.to_uppercase())
            .unwrap_or_default()
    }

    /// Validation rule for a bouldering grade field
    ///
    /// An empty input is acceptable (routes under development may have no
    /// grade yet). A range score is acceptable; a negative or unresolvable
    /// score is an error.
    pub fn bouldering_validation_rule(&self) -> ValidationRule {
        grade_rule(self.resolver.clone(), self.context, Discipline::Bouldering)
    }

    /// Validation rule for a route grade field
    ///
    /// # Arguments
    /// - `discipline` - Which route discipline's scale to validate against
    ///   (sport, trad, or top rope)
    pub fn route_validation_rule(&self, discipline: Discipline) -> ValidationRule {
        grade_rule(self.resolver.clone(), self.context, discipline)
    }
}

/// Builds the shared "isValidGrade" rule for a context and discipline
///
/// Empty input is acceptable. Scoring goes through the resolver: a range is
/// acceptable, a non-negative value is acceptable, anything else is an
/// invalid grade. An unmapped (context, discipline) pair is unresolvable and
/// therefore invalid.
fn grade_rule(
    resolver: Arc<dyn ScaleResolver>,
    context: GradeContext,
    discipline: Discipline,
) -> ValidationRule {
    ValidationRule {
        name: "isValidGrade",
        check: Box::new(move |input: &str| {
            if input.is_empty() {
                return None;
            }
            let score = scale_for(context, discipline)
                .and_then(|scale| resolver.score(scale, input));
            match score {
                Some(Score::Range(_, _)) => None,
                Some(Score::Value(v)) if v >= 0.0 => None,
                _ => Some(INVALID_GRADE.to_string()),
            }
        }),
    }
}

/// Context-bound convenience wrapper for form validation
///
/// Produces validation-rule descriptors without needing a full climb record,
/// for forms that create climbs or edit them in bulk.
pub struct GradeHelper {
    context: GradeContext,
    is_boulder: bool,
    resolver: Arc<dyn ScaleResolver>,
}

impl GradeHelper {
    /// Creates a helper bound to a context
    ///
    /// # Arguments
    /// - `resolver` - External scale resolver used for scoring
    /// - `context` - Regional grading context of the area being edited
    /// - `is_boulder` - Whether the form edits boulder problems
    pub fn new(resolver: Arc<dyn ScaleResolver>, context: GradeContext, is_boulder: bool) -> Self {
        GradeHelper {
            context,
            is_boulder,
            resolver,
        }
    }

    /// Rule over a bulk edit list
    ///
    /// The list is acceptable when no row has a recorded field error.
    pub fn bulk_validation_rule(&self) -> BulkValidationRule {
        BulkValidationRule {
            check: Box::new(|climbs: &[EditableClimb]| {
                let clean = climbs
                    .iter()
                    .all(|climb| climb.errors.values().all(|e| e.is_none()));
                if clean {
                    None
                } else {
                    Some(FORMAT_ERROR.to_string())
                }
            }),
        }
    }

    /// Validation rule for a required grade field
    ///
    /// Unlike [`Grade::bouldering_validation_rule`], an empty input is an
    /// error here. The bouldering scale is used only when no discipline was
    /// given and the helper is boulder-bound; otherwise the trad scale.
    pub fn validation_rule(&self, discipline: Option<Discipline>) -> ValidationRule {
        let selected = if discipline.is_none() && self.is_boulder {
            Discipline::Bouldering
        } else {
            Discipline::Trad
        };
        let resolver = self.resolver.clone();
        let context = self.context;
        ValidationRule {
            name: "isValidGrade",
            check: Box::new(move |input: &str| {
                if input.is_empty() {
                    return Some(MISSING_GRADE.to_string());
                }
                let score = scale_for(context, selected)
                    .and_then(|scale| resolver.score(scale, input));
                match score {
                    Some(Score::Range(_, _)) => None,
                    Some(Score::Value(v)) if v >= 0.0 => None,
                    _ => Some(INVALID_GRADE.to_string()),
                }
            }),
        }
    }

    /// Validates a grade string directly
    ///
    /// Runs the same rule as [`GradeHelper::validation_rule`]; any rule error
    /// collapses to a single "Invalid grade" message.
    pub fn validate(&self, grade: &str, discipline: Option<Discipline>) -> Option<String> {
        let rule = self.validation_rule(discipline);
        rule.check(grade).map(|_| INVALID_GRADE.to_string())
    }
}
