//! Helper modules importable by generated generators.
//!
//! Generated code reaches these only through the `import` lines of the
//! function shell built by the compiler: `random`, `time`, `uuid`, `fake`.

use rhai::plugin::*;
use rhai::Module;

const MAX_DIGITS: rhai::INT = 1024;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[export_module]
pub mod random_api {
    use rand::seq::SliceRandom;
    use rand::Rng;
    use rhai::{Array, Dynamic, EvalAltResult, FLOAT, INT};

    use super::MAX_DIGITS;

    /// Uniform integer in `min..=max`
    #[rhai_fn(return_raw)]
    pub fn int(min: INT, max: INT) -> Result<INT, Box<EvalAltResult>> {
        if min > max {
            return Err(format!("random::int: min {} exceeds max {}", min, max).into());
        }
        Ok(rand::thread_rng().gen_range(min..=max))
    }

    /// Uniform float in `min..=max`
    #[rhai_fn(name = "float", return_raw)]
    pub fn float_range(min: FLOAT, max: FLOAT) -> Result<FLOAT, Box<EvalAltResult>> {
        // the span must be finite for the sampler as well as ordered
        if !(min <= max) || !(max - min).is_finite() {
            return Err(format!("random::float: invalid range {}..{}", min, max).into());
        }
        Ok(rand::thread_rng().gen_range(min..=max))
    }

    #[rhai_fn(name = "float", return_raw)]
    pub fn float_int_range(min: INT, max: INT) -> Result<FLOAT, Box<EvalAltResult>> {
        float_range(min as FLOAT, max as FLOAT)
    }

    #[rhai_fn(name = "bool")]
    pub fn coin_flip() -> bool {
        rand::thread_rng().gen_bool(0.5)
    }

    /// Random element of a non-empty array
    #[rhai_fn(return_raw)]
    pub fn choice(items: Array) -> Result<Dynamic, Box<EvalAltResult>> {
        items
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| "random::choice: array is empty".into())
    }

    /// String of `count` random decimal digits
    #[rhai_fn(return_raw)]
    pub fn digits(count: INT) -> Result<String, Box<EvalAltResult>> {
        if !(0..=MAX_DIGITS).contains(&count) {
            return Err(format!("random::digits: count must be within 0..={}", MAX_DIGITS).into());
        }
        let mut rng = rand::thread_rng();
        Ok((0..count)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect())
    }
}

#[export_module]
pub mod time_api {
    use chrono::{Duration, Utc};
    use rand::Rng;
    use rhai::{EvalAltResult, INT};

    use super::DATE_FORMAT;

    /// Current instant, RFC 3339 in UTC
    pub fn now() -> String {
        Utc::now().to_rfc3339()
    }

    pub fn today() -> String {
        Utc::now().date_naive().format(DATE_FORMAT).to_string()
    }

    /// Calendar date `days` from today (negative for the past)
    #[rhai_fn(return_raw)]
    pub fn days_from_now(days: INT) -> Result<String, Box<EvalAltResult>> {
        Duration::try_days(days)
            .and_then(|offset| Utc::now().date_naive().checked_add_signed(offset))
            .map(|date| date.format(DATE_FORMAT).to_string())
            .ok_or_else(|| format!("time::days_from_now: {} days is out of range", days).into())
    }

    /// Unix timestamp in seconds
    pub fn timestamp() -> INT {
        Utc::now().timestamp()
    }

    /// Random instant within the past `days`, RFC 3339
    #[rhai_fn(return_raw)]
    pub fn recent(days: INT) -> Result<String, Box<EvalAltResult>> {
        if days < 0 {
            return Err("time::recent: days must not be negative".into());
        }
        let window = days
            .checked_mul(86_400)
            .ok_or_else(|| format!("time::recent: {} days is out of range", days))?;
        let back = rand::thread_rng().gen_range(0..=window);
        Duration::try_seconds(back)
            .and_then(|offset| Utc::now().checked_sub_signed(offset))
            .map(|instant| instant.to_rfc3339())
            .ok_or_else(|| format!("time::recent: {} days is out of range", days).into())
    }
}

#[export_module]
pub mod uuid_api {
    pub fn v4() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[export_module]
pub mod fake_api {
    use fake::faker::address::en::{CityName, CountryName, StreetName};
    use fake::faker::company::en::CompanyName;
    use fake::faker::internet::en::{SafeEmail, Username};
    use fake::faker::lorem::en::{Paragraph, Sentence, Word};
    use fake::faker::name::en::{FirstName, LastName, Name};
    use fake::faker::phone_number::en::PhoneNumber;
    use fake::Fake;

    pub fn name() -> String {
        Name().fake()
    }

    pub fn first_name() -> String {
        FirstName().fake()
    }

    pub fn last_name() -> String {
        LastName().fake()
    }

    pub fn username() -> String {
        Username().fake()
    }

    pub fn email() -> String {
        SafeEmail().fake()
    }

    pub fn phone() -> String {
        PhoneNumber().fake()
    }

    pub fn city() -> String {
        CityName().fake()
    }

    pub fn country() -> String {
        CountryName().fake()
    }

    pub fn street() -> String {
        StreetName().fake()
    }

    pub fn word() -> String {
        Word().fake()
    }

    pub fn sentence() -> String {
        Sentence(3..10).fake()
    }

    pub fn paragraph() -> String {
        Paragraph(1..3).fake()
    }

    pub fn company() -> String {
        CompanyName().fake()
    }
}

/// Import paths and their modules, in the order the function shell imports them
pub fn modules() -> Vec<(&'static str, Module)> {
    vec![
        ("random", exported_module!(random_api)),
        ("time", exported_module!(time_api)),
        ("uuid", exported_module!(uuid_api)),
        ("fake", exported_module!(fake_api)),
    ]
}
