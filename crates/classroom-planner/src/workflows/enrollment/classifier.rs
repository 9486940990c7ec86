use super::domain::{ClassPlacement, Level};
use chrono::{Months, NaiveDate};

/// Length of a year used for age arithmetic.
pub const DAYS_PER_YEAR: f64 = 365.25;

pub fn age_in_years(date_of_birth: NaiveDate, as_of: NaiveDate) -> f64 {
    (as_of - date_of_birth).num_days() as f64 / DAYS_PER_YEAR
}

/// Places a child in the classroom matching their age on `as_of`.
///
/// Bands are half-open: `[0, 1)` Infants, `[1, 2)` Wobblers, `[2, 3)` Older
/// Toddlers, `[3, 5)` Preschool. A child aged five or older has graduated.
pub fn classify(date_of_birth: NaiveDate, as_of: NaiveDate) -> ClassPlacement {
    classify_age(age_in_years(date_of_birth, as_of))
}

pub fn classify_age(age: f64) -> ClassPlacement {
    if age < 0.0 {
        return ClassPlacement::NotYetBorn;
    }

    Level::ordered()
        .into_iter()
        .find(|level| age < f64::from(level.age_ceiling_years()))
        .map_or(ClassPlacement::Graduated, ClassPlacement::Class)
}

/// True once the child is too old for `level` on `as_of`.
pub fn has_aged_out(date_of_birth: NaiveDate, level: Level, as_of: NaiveDate) -> bool {
    age_in_years(date_of_birth, as_of) >= f64::from(level.age_ceiling_years())
}

/// Calendar date on which a child becomes eligible to leave `level`.
pub fn promotion_date(date_of_birth: NaiveDate, level: Level) -> NaiveDate {
    date_of_birth
        .checked_add_months(Months::new(12 * level.age_ceiling_years()))
        .unwrap_or(NaiveDate::MAX)
}
